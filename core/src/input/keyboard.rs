//! Keyboard shortcuts and tower kinds

use serde::{Deserialize, Serialize};

/// Tower kind passed to `selectTowerType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TowerKind {
    /// Nothing selected
    #[default]
    None = 0,
    Line = 1,
    Triangle = 2,
    Square = 3,
    Pentagon = 4,
}

impl TowerKind {
    /// Value passed across the boundary
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TowerKind::None),
            1 => Some(TowerKind::Line),
            2 => Some(TowerKind::Triangle),
            3 => Some(TowerKind::Square),
            4 => Some(TowerKind::Pentagon),
            _ => None,
        }
    }
}

/// A key press, reduced to what the game cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Escape,
    Space,
    Other(String),
}

impl Key {
    /// Parse a key name as reported by the platform (`"1"`, `"Escape"`, `" "`)
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            " " | "Space" | "Spacebar" => Key::Space,
            _ => match name.as_bytes() {
                [d @ b'0'..=b'9'] => Key::Digit(d - b'0'),
                _ => Key::Other(name.to_string()),
            },
        }
    }
}

/// What a key press asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    SelectTower(TowerKind),
    TogglePause,
}

/// Map a key to its command: 1-4 select towers, Escape deselects, Space pauses
pub fn key_command(key: &Key) -> Option<KeyCommand> {
    match key {
        Key::Digit(d @ 1..=4) => TowerKind::from_code(*d).map(KeyCommand::SelectTower),
        Key::Escape => Some(KeyCommand::SelectTower(TowerKind::None)),
        Key::Space => Some(KeyCommand::TogglePause),
        _ => None,
    }
}
