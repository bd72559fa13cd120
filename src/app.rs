//! Application context: the live binding tree and everything it talks to
//!
//! `App` owns the tree, the action registry, the profile store and the two
//! host stores. Every user-facing operation goes through it, so the tree is
//! only mutated here and only between reads.

use serde::Serialize;
use thiserror::Error;

use crate::actions::{ActionError, ActionRegistry};
use crate::config::AppConfig;
use crate::host::{ContextStore, Host, HostError, LocationStore};
use crate::keymap::{
    BindingNode, BindingTree, CandidateDisplay, ConflictError, IncrementalKeyReader, InputSource,
    KeyChord, ReadError, PREFIX_KIND,
};
use crate::persist::{deserialize_tree, serialize_tree, ProfileStore, SkippedRecord, StoreError};

/// Kind used when the user does not pick one
pub const DEFAULT_KIND: &str = "bookmark";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("cancelled")]
    Cancelled,
    #[error(transparent)]
    Host(HostError),
    #[error("{0} is not bound")]
    NotBound(KeyChord),
    #[error("nothing is bound yet")]
    NothingBound,
    #[error(transparent)]
    Conflict(#[from] ConflictError),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("{chord} was unbound but cleanup failed: {source}")]
    CleanupFailed {
        chord: KeyChord,
        #[source]
        source: ActionError,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ReadError> for AppError {
    fn from(e: ReadError) -> Self {
        match e {
            ReadError::Cancelled => AppError::Cancelled,
            ReadError::Input(e) => AppError::Host(e),
        }
    }
}

/// Line-oriented questions asked during interactive operations
pub trait Prompter {
    /// Pick one of `items`; `None` when the user backs out
    fn choose(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>, HostError>;

    /// Free-text answer; `None` when the user backs out
    fn ask(&mut self, prompt: &str) -> Result<Option<String>, HostError>;
}

/// One binding, flattened for listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    pub keys: String,
    pub kind: String,
    pub name: String,
}

impl EntrySummary {
    fn new(chord: &KeyChord, node: &BindingNode) -> Self {
        Self {
            keys: chord.to_string(),
            kind: node.kind().to_string(),
            name: node.name().to_string(),
        }
    }

    /// Single line for choosers and plain listings
    pub fn line(&self) -> String {
        format!("{:<16} {:<9} {}", self.keys, self.kind, self.name)
    }
}

pub struct App<L, C> {
    tree: BindingTree,
    registry: ActionRegistry,
    store: ProfileStore,
    locations: L,
    contexts: C,
    config: AppConfig,
    reader: IncrementalKeyReader,
}

impl<L: LocationStore, C: ContextStore> App<L, C> {
    /// Empty tree with the built-in action kinds
    pub fn new(store: ProfileStore, locations: L, contexts: C, config: AppConfig) -> Self {
        let reader = IncrementalKeyReader::new(config.cancel_keystroke());
        Self {
            tree: BindingTree::new(),
            registry: ActionRegistry::with_builtins(),
            store,
            locations,
            contexts,
            config,
            reader,
        }
    }

    pub fn tree(&self) -> &BindingTree {
        &self.tree
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// For registering extension kinds before the first load
    pub fn registry_mut(&mut self) -> &mut ActionRegistry {
        &mut self.registry
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn locations(&self) -> &L {
        &self.locations
    }

    pub fn contexts(&self) -> &C {
        &self.contexts
    }

    pub fn locations_mut(&mut self) -> &mut L {
        &mut self.locations
    }

    pub fn contexts_mut(&mut self) -> &mut C {
        &mut self.contexts
    }

    /// Load the default profile. Never fails: problems come back as a notice
    /// for the user and the app starts with whatever loaded.
    pub fn startup(&mut self) -> Option<String> {
        let name = self.config.default_profile.clone();
        match self.load_profile(&name) {
            Ok(skipped) if skipped.is_empty() => {
                tracing::info!("Loaded profile {:?} ({} nodes)", name, self.tree.len());
                None
            }
            Ok(skipped) => Some(format!(
                "profile {:?} loaded with {} binding(s) skipped; see the log for details",
                name,
                skipped.len()
            )),
            Err(AppError::Store(StoreError::ProfileNotFound(_))) => {
                tracing::info!("No saved profile {:?}, starting empty", name);
                Some(format!("no saved profile {:?}; starting with no bindings", name))
            }
            Err(e) => {
                tracing::warn!("Failed to load profile {:?}: {}", name, e);
                Some(format!("could not load profile {:?}: {}", name, e))
            }
        }
    }

    /// Read a chord against the live tree
    pub fn read_chord(
        &self,
        input: &mut dyn InputSource,
        display: &mut dyn CandidateDisplay,
    ) -> Result<KeyChord, AppError> {
        Ok(self.reader.read("chord", &self.tree, input, display)?)
    }

    /// Bind `chord` to a new node of `kind`.
    ///
    /// Nothing is created in the host stores unless the insert is known to
    /// succeed. A replaced leaf gets its kind's removal hook.
    pub fn bind(&mut self, chord: &KeyChord, kind: &str, name: &str) -> Result<(), AppError> {
        let Self {
            tree,
            registry,
            locations,
            contexts,
            ..
        } = self;

        if !registry.contains(kind) {
            return Err(ActionError::UnknownKind(kind.to_string()).into());
        }
        tree.check_insert(chord, kind != PREFIX_KIND)?;

        let mut host = Host::new(locations, contexts);
        let node = registry.create(kind, chord, name, &mut host)?;
        let new_leaf = node.as_leaf().cloned();
        let replaced = tree.insert(chord, node)?;
        tracing::info!("Bound {} to {} {:?}", chord, kind, name);

        if let Some(old) = replaced {
            // A rebind of the same kind can take over the same host entry
            let same_target = matches!(
                (&old, &new_leaf),
                (BindingNode::Leaf(old), Some(new)) if old.kind == new.kind && old.data == new.data
            );
            if !same_target {
                if let Err(e) = registry.on_remove_all(chord, &old, &mut host) {
                    tracing::warn!("Cleanup of replaced binding at {} failed: {}", chord, e);
                }
            }
        }
        Ok(())
    }

    /// Read a chord, pick a kind if asked to, ask for a name, then bind
    pub fn bind_interactive(
        &mut self,
        input: &mut dyn InputSource,
        display: &mut dyn CandidateDisplay,
        prompter: &mut dyn Prompter,
        choose_kind: bool,
    ) -> Result<KeyChord, AppError> {
        let chord = self.read_chord(input, display)?;

        let kind = if choose_kind {
            let kinds: Vec<(String, String)> = self
                .registry
                .describe_kinds()
                .into_iter()
                .map(|(kind, desc)| (kind.to_string(), desc.to_string()))
                .collect();
            let items: Vec<String> = kinds.iter().map(|(_, desc)| desc.clone()).collect();
            let index = prompter
                .choose(&format!("kind for {}", chord.display_string()), &items)
                .map_err(AppError::Host)?
                .ok_or(AppError::Cancelled)?;
            kinds
                .into_iter()
                .nth(index)
                .map(|(kind, _)| kind)
                .ok_or(AppError::Cancelled)?
        } else {
            DEFAULT_KIND.to_string()
        };

        let name = prompter
            .ask(&format!("name for {} {}", kind, chord.display_string()))
            .map_err(AppError::Host)?
            .ok_or(AppError::Cancelled)?;

        self.bind(&chord, &kind, name.trim())?;
        Ok(chord)
    }

    /// Remove the node at `chord` and clean up after every leaf below it.
    /// Ancestor prefixes are kept.
    pub fn unbind(&mut self, chord: &KeyChord) -> Result<BindingNode, AppError> {
        let Self {
            tree,
            registry,
            locations,
            contexts,
            ..
        } = self;

        let removed = tree
            .remove(chord)
            .ok_or_else(|| AppError::NotBound(chord.clone()))?;
        tracing::info!("Unbound {} ({} {:?})", chord, removed.kind(), removed.name());

        let mut host = Host::new(locations, contexts);
        registry
            .on_remove_all(chord, &removed, &mut host)
            .map_err(|source| AppError::CleanupFailed {
                chord: chord.clone(),
                source,
            })?;
        Ok(removed)
    }

    /// Choose any binding from the list and unbind it
    pub fn unbind_interactive(
        &mut self,
        prompter: &mut dyn Prompter,
    ) -> Result<KeyChord, AppError> {
        let chords: Vec<KeyChord> = self.tree.enumerate().into_iter().map(|(c, _)| c).collect();
        let chord = self.choose_chord(prompter, "unbind", chords)?;
        self.unbind(&chord)?;
        Ok(chord)
    }

    /// Run the action bound at `chord`
    pub fn visit(&mut self, chord: &KeyChord) -> Result<(), AppError> {
        let Self {
            tree,
            registry,
            locations,
            contexts,
            ..
        } = self;

        let node = tree
            .get(chord.keys())
            .ok_or_else(|| AppError::NotBound(chord.clone()))?;
        let mut host = Host::new(locations, contexts);
        registry.execute(node, &mut host)?;
        Ok(())
    }

    /// Choose a leaf from the list and run it
    pub fn visit_interactive(&mut self, prompter: &mut dyn Prompter) -> Result<KeyChord, AppError> {
        let chords: Vec<KeyChord> = self.tree.leaves().into_iter().map(|(c, _)| c).collect();
        let chord = self.choose_chord(prompter, "visit", chords)?;
        self.visit(&chord)?;
        Ok(chord)
    }

    fn choose_chord(
        &self,
        prompter: &mut dyn Prompter,
        prompt: &str,
        chords: Vec<KeyChord>,
    ) -> Result<KeyChord, AppError> {
        if chords.is_empty() {
            return Err(AppError::NothingBound);
        }
        let items: Vec<String> = chords
            .iter()
            .filter_map(|chord| {
                let node = self.tree.get(chord.keys())?;
                Some(EntrySummary::new(chord, node).line())
            })
            .collect();
        let index = prompter
            .choose(prompt, &items)
            .map_err(AppError::Host)?
            .ok_or(AppError::Cancelled)?;
        chords.into_iter().nth(index).ok_or(AppError::Cancelled)
    }

    /// Save the live tree as profile `name`, returning the record count
    pub fn save_profile(&self, name: &str) -> Result<usize, AppError> {
        let records = serialize_tree(&self.tree, &self.registry);
        let count = records.len();
        self.store.save(name, records)?;
        Ok(count)
    }

    /// Replace the live tree with profile `name`. The tree is untouched if
    /// the profile cannot be read; records that fail to decode are skipped
    /// and returned.
    pub fn load_profile(&mut self, name: &str) -> Result<Vec<SkippedRecord>, AppError> {
        let profile = self.store.load(name)?;
        let decoded = deserialize_tree(&profile.records, &self.registry);
        self.tree = decoded.tree;
        Ok(decoded.skipped)
    }

    /// Autosave the default profile. Must run before the process exits.
    pub fn shutdown(&self) -> Result<(), AppError> {
        if !self.config.autosave {
            tracing::debug!("Autosave disabled, not saving on exit");
            return Ok(());
        }
        let count = self.save_profile(&self.config.default_profile)?;
        tracing::info!(
            "Saved {} bindings to profile {:?} on exit",
            count,
            self.config.default_profile
        );
        Ok(())
    }

    /// Run `body`, then [`shutdown`](Self::shutdown) whether or not it
    /// succeeded. The body's error wins; a save failure after it is logged.
    pub fn run_session<T, E>(&mut self, body: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E>
    where
        E: From<AppError>,
    {
        let outcome = body(self);
        let saved = self.shutdown();
        match (outcome, saved) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e.into()),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(save_error)) => {
                tracing::error!("Failed to save profile on exit: {}", save_error);
                Err(e)
            }
        }
    }

    /// Every node in enumeration order
    pub fn entries(&self) -> Vec<(KeyChord, &BindingNode)> {
        self.tree.enumerate()
    }

    pub fn summaries(&self) -> Vec<EntrySummary> {
        self.entries()
            .iter()
            .map(|(chord, node)| EntrySummary::new(chord, node))
            .collect()
    }
}
