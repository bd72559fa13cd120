//! Core input-unit types: Keystroke, Modifiers, KeyCode
//!
//! `Display` renders the canonical text form that is written to profile
//! files and parsed back by [`super::parse::parse_key_string`]. The
//! canonical form never contains whitespace, which keeps chord identifiers
//! built from it unambiguous.

use std::fmt;

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win/Super elsewhere

    /// Create modifiers from individual flags
    pub const fn new(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if shift {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        if meta {
            bits |= 0b1000;
        }
        Modifiers(bits)
    }

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Check if this contains all modifiers in other
    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Remove the modifiers in `other`
    #[inline]
    pub const fn without(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 & !other.0)
    }

    /// Get the platform-specific "command" modifier (Cmd on macOS, Ctrl elsewhere)
    pub fn cmd() -> Modifiers {
        if cfg!(target_os = "macos") {
            Modifiers::META
        } else {
            Modifiers::CTRL
        }
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Canonical prefix form, e.g. `ctrl+shift+`. Empty when no modifiers are held.
impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl() {
            f.write_str("ctrl+")?;
        }
        if self.shift() {
            f.write_str("shift+")?;
        }
        if self.alt() {
            f.write_str("alt+")?;
        }
        if self.meta() {
            f.write_str("meta+")?;
        }
        Ok(())
    }
}

/// A key code representing a physical or logical key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    /// A character key, case preserved
    Char(char),

    // Named keys
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,

    // Arrow keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    Home,
    End,
    PageUp,
    PageDown,
    Insert,

    // Function keys
    F(u8), // F1-F24

    // Numpad (physical keys)
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    NumpadAdd,
    NumpadSubtract,
    NumpadMultiply,
    NumpadDivide,
    NumpadEnter,
    NumpadDecimal,
}

impl KeyCode {
    /// Whether a character needs the escaped `U+hex` spelling in canonical form
    pub(crate) fn needs_escape(c: char) -> bool {
        c.is_whitespace() || c.is_control()
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char('+') => write!(f, "plus"),
            KeyCode::Char(c) if KeyCode::needs_escape(*c) => write!(f, "U{:04X}", *c as u32),
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::Enter => write!(f, "enter"),
            KeyCode::Escape => write!(f, "escape"),
            KeyCode::Tab => write!(f, "tab"),
            KeyCode::Backspace => write!(f, "backspace"),
            KeyCode::Delete => write!(f, "delete"),
            KeyCode::Space => write!(f, "space"),
            KeyCode::Up => write!(f, "up"),
            KeyCode::Down => write!(f, "down"),
            KeyCode::Left => write!(f, "left"),
            KeyCode::Right => write!(f, "right"),
            KeyCode::Home => write!(f, "home"),
            KeyCode::End => write!(f, "end"),
            KeyCode::PageUp => write!(f, "pageup"),
            KeyCode::PageDown => write!(f, "pagedown"),
            KeyCode::Insert => write!(f, "insert"),
            KeyCode::F(n) => write!(f, "f{}", n),
            KeyCode::Numpad0 => write!(f, "numpad0"),
            KeyCode::Numpad1 => write!(f, "numpad1"),
            KeyCode::Numpad2 => write!(f, "numpad2"),
            KeyCode::Numpad3 => write!(f, "numpad3"),
            KeyCode::Numpad4 => write!(f, "numpad4"),
            KeyCode::Numpad5 => write!(f, "numpad5"),
            KeyCode::Numpad6 => write!(f, "numpad6"),
            KeyCode::Numpad7 => write!(f, "numpad7"),
            KeyCode::Numpad8 => write!(f, "numpad8"),
            KeyCode::Numpad9 => write!(f, "numpad9"),
            KeyCode::NumpadAdd => write!(f, "numpad_add"),
            KeyCode::NumpadSubtract => write!(f, "numpad_subtract"),
            KeyCode::NumpadMultiply => write!(f, "numpad_multiply"),
            KeyCode::NumpadDivide => write!(f, "numpad_divide"),
            KeyCode::NumpadEnter => write!(f, "numpad_enter"),
            KeyCode::NumpadDecimal => write!(f, "numpad_decimal"),
        }
    }
}

/// A single keystroke: a key with modifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keystroke {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl Keystroke {
    pub const fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    /// Create a keystroke with no modifiers
    pub const fn key(key: KeyCode) -> Self {
        Self {
            key,
            mods: Modifiers::NONE,
        }
    }

    /// Create an unmodified character keystroke
    pub const fn char(c: char) -> Self {
        Self {
            key: KeyCode::Char(c),
            mods: Modifiers::NONE,
        }
    }

    /// Create a keystroke with a character and modifiers
    pub const fn char_with_mods(c: char, mods: Modifiers) -> Self {
        Self {
            key: KeyCode::Char(c),
            mods,
        }
    }

    /// Display the keystroke using platform-specific symbols (UI only, never persisted)
    pub fn display_string(&self) -> String {
        let mut parts = String::new();

        if cfg!(target_os = "macos") {
            // macOS uses symbols: ⌃ ⇧ ⌥ ⌘
            if self.mods.ctrl() {
                parts.push('⌃');
            }
            if self.mods.alt() {
                parts.push('⌥');
            }
            if self.mods.shift() {
                parts.push('⇧');
            }
            if self.mods.meta() {
                parts.push('⌘');
            }
        } else {
            if self.mods.ctrl() {
                parts.push_str("Ctrl+");
            }
            if self.mods.alt() {
                parts.push_str("Alt+");
            }
            if self.mods.shift() {
                parts.push_str("Shift+");
            }
            if self.mods.meta() {
                parts.push_str("Super+");
            }
        }

        let key_str = match self.key {
            KeyCode::Char(c) if !KeyCode::needs_escape(c) => c.to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            KeyCode::Escape => "Esc".to_string(),
            KeyCode::Space => "SPC".to_string(),
            KeyCode::Enter => "RET".to_string(),
            KeyCode::Tab => "TAB".to_string(),
            _ => self.key.to_string(),
        };

        parts.push_str(&key_str);
        parts
    }
}

/// Canonical form, e.g. `ctrl+g`, `shift+tab`, `plus`
impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.mods, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_empty() {
        let mods = Modifiers::NONE;
        assert!(mods.is_empty());
        assert!(!mods.ctrl());
        assert!(!mods.shift());
        assert!(!mods.alt());
        assert!(!mods.meta());
    }

    #[test]
    fn test_modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(mods.ctrl());
        assert!(mods.shift());
        assert!(!mods.alt());
        assert!(mods.contains(Modifiers::CTRL));
        assert_eq!(mods.without(Modifiers::SHIFT), Modifiers::CTRL);
    }

    #[test]
    fn test_modifiers_new() {
        let mods = Modifiers::new(true, false, true, false);
        assert!(mods.ctrl());
        assert!(!mods.shift());
        assert!(mods.alt());
        assert!(!mods.meta());
    }

    #[test]
    fn test_canonical_display_orders_modifiers() {
        let stroke = Keystroke::new(KeyCode::Char('x'), Modifiers::META | Modifiers::CTRL);
        assert_eq!(stroke.to_string(), "ctrl+meta+x");
    }

    #[test]
    fn test_canonical_display_escapes() {
        assert_eq!(Keystroke::char('+').to_string(), "plus");
        assert_eq!(Keystroke::char('\u{a0}').to_string(), "U00A0");
        assert_eq!(Keystroke::key(KeyCode::Space).to_string(), "space");
        assert_eq!(Keystroke::key(KeyCode::F(11)).to_string(), "f11");
    }

    #[test]
    fn test_char_case_is_preserved() {
        assert_ne!(Keystroke::char('A'), Keystroke::char('a'));
        assert_eq!(Keystroke::char('A').to_string(), "A");
    }

    #[test]
    fn test_display_string_has_no_canonical_escapes() {
        let stroke = Keystroke::new(KeyCode::Char('g'), Modifiers::CTRL);
        let display = stroke.display_string();
        assert!(display.contains('g'));
        assert!(!display.contains("ctrl+"));
    }
}
