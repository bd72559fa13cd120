//! Text parsing for keystrokes and chords
//!
//! Accepts the canonical form written by `Display` plus the usual aliases
//! (`control`, `option`, `cmd`, `esc`, `return`, ...).

use thiserror::Error;

use super::chord::KeyChord;
use super::types::{KeyCode, Keystroke, Modifiers};

/// Errors that can occur when parsing key text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key")]
    Empty,
    #[error("multiple keys in binding: {0}")]
    MultipleKeys(String),
    #[error("no key found in binding: {0}")]
    MissingKey(String),
    #[error("unknown key: {0}")]
    UnknownKey(String),
    #[error("a chord needs at least one key")]
    EmptyChord,
}

/// Parse a key string like "ctrl+shift+s" into a Keystroke
pub fn parse_key_string(key_str: &str) -> Result<Keystroke, KeyParseError> {
    let key_str = key_str.trim();
    if key_str.is_empty() {
        return Err(KeyParseError::Empty);
    }

    let mut mods = Modifiers::NONE;
    let mut key_part = None;

    for part in key_str.split('+') {
        match part.to_lowercase().as_str() {
            "cmd" => mods = mods | Modifiers::cmd(),
            "ctrl" | "control" => mods = mods | Modifiers::CTRL,
            "shift" => mods = mods | Modifiers::SHIFT,
            "alt" | "option" | "opt" => mods = mods | Modifiers::ALT,
            "meta" | "super" | "win" => mods = mods | Modifiers::META,
            _ => {
                if key_part.is_some() {
                    return Err(KeyParseError::MultipleKeys(key_str.to_string()));
                }
                key_part = Some(parse_key_code(part)?);
            }
        }
    }

    let key = key_part.ok_or_else(|| KeyParseError::MissingKey(key_str.to_string()))?;

    Ok(Keystroke::new(key, mods))
}

/// Parse a whitespace-separated chord like "ctrl+x g h"
pub fn parse_chord(text: &str) -> Result<KeyChord, KeyParseError> {
    let keys = text
        .split_whitespace()
        .map(parse_key_string)
        .collect::<Result<Vec<_>, _>>()?;
    KeyChord::new(keys).ok_or(KeyParseError::EmptyChord)
}

/// Parse a key code from string
fn parse_key_code(key: &str) -> Result<KeyCode, KeyParseError> {
    // Single character, case preserved
    let mut chars = key.chars();
    if let Some(c) = chars.next() {
        if chars.next().is_none() {
            return Ok(KeyCode::Char(c));
        }
    }

    if let Some(c) = parse_escaped_char(key) {
        return Ok(KeyCode::Char(c));
    }

    let lower = key.to_lowercase();
    match lower.as_str() {
        "plus" => Ok(KeyCode::Char('+')),

        "enter" | "return" | "ret" => Ok(KeyCode::Enter),
        "escape" | "esc" => Ok(KeyCode::Escape),
        "tab" => Ok(KeyCode::Tab),
        "backspace" | "back" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "space" | "spc" => Ok(KeyCode::Space),

        "up" | "arrowup" => Ok(KeyCode::Up),
        "down" | "arrowdown" => Ok(KeyCode::Down),
        "left" | "arrowleft" => Ok(KeyCode::Left),
        "right" | "arrowright" => Ok(KeyCode::Right),

        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdown" | "pgdn" => Ok(KeyCode::PageDown),
        "insert" | "ins" => Ok(KeyCode::Insert),

        "numpad0" | "num0" => Ok(KeyCode::Numpad0),
        "numpad1" | "num1" => Ok(KeyCode::Numpad1),
        "numpad2" | "num2" => Ok(KeyCode::Numpad2),
        "numpad3" | "num3" => Ok(KeyCode::Numpad3),
        "numpad4" | "num4" => Ok(KeyCode::Numpad4),
        "numpad5" | "num5" => Ok(KeyCode::Numpad5),
        "numpad6" | "num6" => Ok(KeyCode::Numpad6),
        "numpad7" | "num7" => Ok(KeyCode::Numpad7),
        "numpad8" | "num8" => Ok(KeyCode::Numpad8),
        "numpad9" | "num9" => Ok(KeyCode::Numpad9),
        "numpad_add" | "numadd" | "numplus" => Ok(KeyCode::NumpadAdd),
        "numpad_subtract" | "numsub" | "numminus" => Ok(KeyCode::NumpadSubtract),
        "numpad_multiply" | "nummul" => Ok(KeyCode::NumpadMultiply),
        "numpad_divide" | "numdiv" => Ok(KeyCode::NumpadDivide),
        "numpad_enter" | "numenter" => Ok(KeyCode::NumpadEnter),
        "numpad_decimal" | "numdot" => Ok(KeyCode::NumpadDecimal),

        other => parse_function_key(other).ok_or_else(|| KeyParseError::UnknownKey(key.to_string())),
    }
}

/// `f1` through `f24`
fn parse_function_key(key: &str) -> Option<KeyCode> {
    let n: u8 = key.strip_prefix('f')?.parse().ok()?;
    (1..=24).contains(&n).then_some(KeyCode::F(n))
}

/// `U00A0` style escapes for whitespace and control characters
fn parse_escaped_char(key: &str) -> Option<char> {
    let hex = key.strip_prefix('U').or_else(|| key.strip_prefix('u'))?;
    if hex.len() < 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    char::from_u32(u32::from_str_radix(hex, 16).ok()?)
}
