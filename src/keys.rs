// src/keys.rs

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Keyboard modifiers held while a key or pointer event was delivered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const SUPER = 1 << 3;
    }
}

/// Represents a key symbol.
///
/// Only the keys the editor reacts to get their own variant; everything else
/// arrives as `Unknown` and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeySymbol {
    Char(char),

    // Modifier keys pressed on their own
    Shift,
    Control,
    Alt,
    Super,

    // Navigation
    Left,
    Right,
    Up,
    Down,

    // Editing
    Delete,
    Backspace,
    Escape,
    Enter,
    Tab,

    #[default]
    Unknown,
}

impl KeySymbol {
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            KeySymbol::Shift | KeySymbol::Control | KeySymbol::Alt | KeySymbol::Super
        )
    }

    /// The decimal digit this key types, if any.
    pub fn digit(&self) -> Option<u8> {
        match self {
            KeySymbol::Char(c) => c.to_digit(10).map(|d| d as u8),
            _ => None,
        }
    }

    /// Cursor movement `(dx, dy)` for the arrow keys.
    pub fn direction(&self) -> Option<(isize, isize)> {
        match self {
            KeySymbol::Left => Some((-1, 0)),
            KeySymbol::Right => Some((1, 0)),
            KeySymbol::Up => Some((0, -1)),
            KeySymbol::Down => Some((0, 1)),
            _ => None,
        }
    }
}
