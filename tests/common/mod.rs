//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::VecDeque;

use chordmark::app::{App, Prompter};
use chordmark::config::AppConfig;
use chordmark::host::{HostError, MemoryContextStore, MemoryLocationStore};
use chordmark::keymap::{
    parse_chord, parse_key_string, Candidate, CandidateDisplay, InputSource, KeyChord, Keystroke,
};
use chordmark::persist::ProfileStore;

pub type TestApp = App<MemoryLocationStore, MemoryContextStore>;

pub fn chord(text: &str) -> KeyChord {
    parse_chord(text).expect("valid chord")
}

/// App backed by in-memory host stores and a profile file in `dir`
pub fn test_app(dir: &tempfile::TempDir) -> TestApp {
    test_app_with(dir, AppConfig::default())
}

pub fn test_app_with(dir: &tempfile::TempDir, config: AppConfig) -> TestApp {
    let mut locations = MemoryLocationStore::new();
    locations.set_current("/home/user");
    test_app_from(dir, config, locations, MemoryContextStore::new(["main", "notes"]))
}

/// App over host stores prepared by the test, e.g. to model a restart
pub fn test_app_from(
    dir: &tempfile::TempDir,
    config: AppConfig,
    locations: MemoryLocationStore,
    contexts: MemoryContextStore,
) -> TestApp {
    App::new(
        ProfileStore::new(dir.path().join("profiles.yaml")),
        locations,
        contexts,
        config,
    )
}

/// Keystrokes fed from a fixed list
pub struct ScriptedInput {
    keys: VecDeque<Keystroke>,
}

impl ScriptedInput {
    pub fn new(keys: &[&str]) -> Self {
        Self {
            keys: keys
                .iter()
                .map(|k| parse_key_string(k).expect("valid key"))
                .collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_one(&mut self, _prompt: &str) -> Result<Keystroke, HostError> {
        self.keys
            .pop_front()
            .ok_or_else(|| HostError::Unavailable("script exhausted".into()))
    }
}

/// Display that remembers whether it is showing anything
#[derive(Default)]
pub struct RecordingDisplay {
    pub shows: usize,
    pub hides: usize,
    pub visible: bool,
    pub last: Vec<Candidate>,
}

impl CandidateDisplay for RecordingDisplay {
    fn show(&mut self, _prefix: &[Keystroke], candidates: &[Candidate]) {
        self.shows += 1;
        self.visible = true;
        self.last = candidates.to_vec();
    }

    fn hide(&mut self) {
        self.hides += 1;
        self.visible = false;
    }
}

/// Canned answers, consumed in order
#[derive(Default)]
pub struct ScriptedPrompter {
    choices: VecDeque<Option<usize>>,
    answers: VecDeque<Option<String>>,
    pub seen_items: Vec<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn choosing(mut self, choice: Option<usize>) -> Self {
        self.choices.push_back(choice);
        self
    }

    pub fn answering(mut self, answer: &str) -> Self {
        self.answers.push_back(Some(answer.to_string()));
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn choose(&mut self, _prompt: &str, items: &[String]) -> Result<Option<usize>, HostError> {
        self.seen_items.push(items.to_vec());
        Ok(self.choices.pop_front().flatten())
    }

    fn ask(&mut self, _prompt: &str) -> Result<Option<String>, HostError> {
        Ok(self.answers.pop_front().flatten())
    }
}
