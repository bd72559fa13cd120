//! Adapter to convert crossterm key events to our Keystroke type

use crossterm::event::{
    KeyCode as CtKeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers,
};

use super::types::{KeyCode, Keystroke, Modifiers};

/// Convert a crossterm key event to a Keystroke
///
/// Returns None for releases and keys we do not model (media keys, lone
/// modifier presses, caps lock, ...).
pub fn keystroke_from_crossterm(event: &KeyEvent) -> Option<Keystroke> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let mods = Modifiers::new(
        event.modifiers.contains(KeyModifiers::CONTROL),
        event.modifiers.contains(KeyModifiers::SHIFT),
        event.modifiers.contains(KeyModifiers::ALT),
        event
            .modifiers
            .intersects(KeyModifiers::SUPER | KeyModifiers::META),
    );
    let keypad = event.state.contains(KeyEventState::KEYPAD);

    let (key, mods) = match event.code {
        CtKeyCode::Char(' ') => (KeyCode::Space, mods),
        CtKeyCode::Char(c) if keypad => (numpad_key(c), mods),
        // Case already carries shift for printable characters
        CtKeyCode::Char(c) => (KeyCode::Char(c), mods.without(Modifiers::SHIFT)),

        CtKeyCode::Enter if keypad => (KeyCode::NumpadEnter, mods),
        CtKeyCode::Enter => (KeyCode::Enter, mods),
        CtKeyCode::Esc => (KeyCode::Escape, mods),
        CtKeyCode::Tab => (KeyCode::Tab, mods),
        CtKeyCode::BackTab => (KeyCode::Tab, mods | Modifiers::SHIFT),
        CtKeyCode::Backspace => (KeyCode::Backspace, mods),
        CtKeyCode::Delete => (KeyCode::Delete, mods),

        // Arrows
        CtKeyCode::Up => (KeyCode::Up, mods),
        CtKeyCode::Down => (KeyCode::Down, mods),
        CtKeyCode::Left => (KeyCode::Left, mods),
        CtKeyCode::Right => (KeyCode::Right, mods),

        // Navigation
        CtKeyCode::Home => (KeyCode::Home, mods),
        CtKeyCode::End => (KeyCode::End, mods),
        CtKeyCode::PageUp => (KeyCode::PageUp, mods),
        CtKeyCode::PageDown => (KeyCode::PageDown, mods),
        CtKeyCode::Insert => (KeyCode::Insert, mods),

        CtKeyCode::F(n @ 1..=24) => (KeyCode::F(n), mods),

        _ => return None,
    };

    Some(Keystroke::new(key, mods))
}

fn numpad_key(c: char) -> KeyCode {
    match c {
        '0' => KeyCode::Numpad0,
        '1' => KeyCode::Numpad1,
        '2' => KeyCode::Numpad2,
        '3' => KeyCode::Numpad3,
        '4' => KeyCode::Numpad4,
        '5' => KeyCode::Numpad5,
        '6' => KeyCode::Numpad6,
        '7' => KeyCode::Numpad7,
        '8' => KeyCode::Numpad8,
        '9' => KeyCode::Numpad9,
        '+' => KeyCode::NumpadAdd,
        '-' => KeyCode::NumpadSubtract,
        '*' => KeyCode::NumpadMultiply,
        '/' => KeyCode::NumpadDivide,
        '.' | ',' => KeyCode::NumpadDecimal,
        other => KeyCode::Char(other),
    }
}
