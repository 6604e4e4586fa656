//! Frontend-agnostic input events.
//!
//! The terminal frontend translates crossterm's event stream into this enum so
//! the event loop only handles one event shape.

use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};

/// Events emitted by a frontend
#[derive(Debug, Clone, PartialEq)]
pub enum FrontendEvent {
    /// Keyboard input
    Key {
        code: KeyCode,
        modifiers: KeyModifiers,
    },
    /// Mouse input
    Mouse {
        kind: MouseEventKind,
        x: u16,
        y: u16,
        modifiers: KeyModifiers,
    },
    /// Terminal resize
    Resize { width: u16, height: u16 },
    /// Paste event (text from clipboard)
    Paste { text: String },
}

impl FrontendEvent {
    /// Create a key event
    pub fn key(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self::Key { code, modifiers }
    }

    /// Create a mouse event
    pub fn mouse(kind: MouseEventKind, x: u16, y: u16, modifiers: KeyModifiers) -> Self {
        Self::Mouse {
            kind,
            x,
            y,
            modifiers,
        }
    }

    /// Position of a primary-button press, the only mouse input the table reacts to
    pub fn left_click(&self) -> Option<(u16, u16)> {
        match *self {
            Self::Mouse {
                kind: MouseEventKind::Down(MouseButton::Left),
                x,
                y,
                ..
            } => Some((x, y)),
            _ => None,
        }
    }
}
