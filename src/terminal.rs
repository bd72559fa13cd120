//! Line-mode terminal front end
//!
//! Chord input switches the terminal into raw mode one keystroke at a time;
//! everything else (command lines, names, list choices) is read as plain
//! lines. The candidate popup is a single line drawn under the prompt.

use std::io::{self, BufRead, Write};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{cursor, queue};

use crate::app::Prompter;
use crate::host::HostError;
use crate::keymap::{keystroke_from_crossterm, Candidate, CandidateDisplay, InputSource, Keystroke};

/// Raw mode for as long as the guard lives
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!("Failed to leave raw mode: {}", e);
        }
    }
}

/// Keystrokes from the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn read_one(&mut self, prompt: &str) -> Result<Keystroke, HostError> {
        let _raw = RawMode::enable()?;
        let mut out = io::stdout();
        queue!(
            out,
            Print("\r"),
            Clear(ClearType::CurrentLine),
            SetAttribute(Attribute::Bold),
            Print(prompt),
            SetAttribute(Attribute::Reset),
            Print(" ")
        )?;
        out.flush()?;

        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match keystroke_from_crossterm(&key) {
                    Some(stroke) => return Ok(stroke),
                    None => tracing::trace!("Ignoring unmapped key {:?}", key.code),
                }
            }
        }
    }
}

/// Completion line shown under the prompt
#[derive(Debug, Default)]
pub struct TerminalPopup {
    visible: bool,
}

impl TerminalPopup {
    fn render(candidates: &[Candidate], width: usize) -> String {
        let mut line = String::new();
        for candidate in candidates {
            let marker = if candidate.is_prefix { "+" } else { "" };
            let item = format!("{} {}{}", candidate.key.display_string(), marker, candidate.description);
            let needed = if line.is_empty() { item.chars().count() } else { item.chars().count() + 3 };
            if line.chars().count() + needed > width {
                line.push_str(" …");
                break;
            }
            if !line.is_empty() {
                line.push_str(" · ");
            }
            line.push_str(&item);
        }
        if line.is_empty() {
            line.push_str("(no bindings)");
        }
        line
    }

    fn draw_below(text: &str) -> io::Result<()> {
        let mut out = io::stdout();
        queue!(
            out,
            Print("\r\n"),
            Clear(ClearType::CurrentLine),
            SetAttribute(Attribute::Dim),
            Print(text),
            SetAttribute(Attribute::Reset),
            cursor::MoveToPreviousLine(1)
        )?;
        out.flush()
    }
}

impl CandidateDisplay for TerminalPopup {
    fn show(&mut self, _prefix: &[Keystroke], candidates: &[Candidate]) {
        let width = terminal::size().map(|(w, _)| w as usize).unwrap_or(80);
        let text = Self::render(candidates, width.saturating_sub(2));
        if let Err(e) = Self::draw_below(&text) {
            tracing::warn!("Failed to draw candidates: {}", e);
        }
        self.visible = true;
    }

    fn hide(&mut self) {
        if !self.visible {
            return;
        }
        if let Err(e) = Self::draw_below("") {
            tracing::warn!("Failed to clear candidates: {}", e);
        }
        println!();
        self.visible = false;
    }
}

/// Questions answered on stdin, one line each
#[derive(Debug, Default)]
pub struct LinePrompter;

/// Read one line; `None` at end of input
pub fn read_line(prompt: &str) -> Result<Option<String>, HostError> {
    let mut out = io::stdout();
    write!(out, "{} ", prompt)?;
    out.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

impl Prompter for LinePrompter {
    fn choose(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>, HostError> {
        for (i, item) in items.iter().enumerate() {
            println!("{:>3}  {}", i + 1, item);
        }
        loop {
            let Some(answer) = read_line(&format!("{} [1-{}, empty to cancel]:", prompt, items.len()))?
            else {
                return Ok(None);
            };
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=items.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => println!("not a choice: {}", answer),
            }
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>, HostError> {
        read_line(&format!("{}:", prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::parse_key_string;

    fn candidate(key: &str, description: &str, is_prefix: bool) -> Candidate {
        Candidate {
            key: parse_key_string(key).unwrap(),
            description: description.to_string(),
            is_prefix,
        }
    }

    #[test]
    fn test_render_marks_prefixes() {
        let line = TerminalPopup::render(
            &[candidate("g", "goto", true), candidate("h", "home", false)],
            80,
        );
        assert_eq!(line, "g +goto · h home");
    }

    #[test]
    fn test_render_truncates() {
        let many: Vec<_> = (b'a'..=b'z')
            .map(|c| candidate(&(c as char).to_string(), "a long description", false))
            .collect();
        let line = TerminalPopup::render(&many, 40);
        assert!(line.ends_with('…'));
        assert!(line.chars().count() <= 42);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(TerminalPopup::render(&[], 80), "(no bindings)");
    }
}
