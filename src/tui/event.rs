use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;

use crate::core::terminal::Key;

/// What a raw crossterm key event means to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermEvent {
    Key(Key),
    /// Ctrl+C. Raw mode swallows the signal, so it arrives as a key.
    Interrupt,
}

/// Block until a key press arrives. Ctrl+C surfaces as `Interrupted`.
pub fn read_key() -> io::Result<Key> {
    loop {
        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        log::debug!(
            "Key event: {:?} with modifiers {:?}",
            key_event.code,
            key_event.modifiers
        );
        match translate(key_event) {
            Some(TermEvent::Key(key)) => return Ok(key),
            Some(TermEvent::Interrupt) => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted by Ctrl+C"));
            }
            None => {}
        }
    }
}

/// Map a crossterm event to an engine key. Releases are dropped.
pub fn translate(key_event: KeyEvent) -> Option<TermEvent> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    let key = match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Some(TermEvent::Interrupt),
        // Other control chords are not search input
        (m, KeyCode::Char(_)) if m.contains(KeyModifiers::CONTROL) => Key::Other,
        (_, KeyCode::Char(c)) => Key::Char(c),
        (_, KeyCode::Left) => Key::Left,
        (_, KeyCode::Right) => Key::Right,
        (_, KeyCode::Up) => Key::Up,
        (_, KeyCode::Down) => Key::Down,
        (_, KeyCode::Enter) => Key::Enter,
        (_, KeyCode::Backspace) => Key::Backspace,
        _ => Key::Other,
    };
    Some(TermEvent::Key(key))
}
