//! Directional keys and raw host key events

use serde::{Deserialize, Serialize};

/// The two directional keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyName {
    Left,
    Right,
}

impl KeyName {
    /// Map a host key identifier (`KeyboardEvent.key` naming) to a direction key
    pub fn from_host_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }

    /// Host key identifier for this key
    pub fn host_key(self) -> &'static str {
        match self {
            Self::Left => "ArrowLeft",
            Self::Right => "ArrowRight",
        }
    }

    /// Movement sign: left is negative, right is positive
    pub fn direction(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Key event as delivered by the host window, before filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub key: String,
    pub pressed: bool,
}

impl RawKeyEvent {
    pub fn down(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            pressed: true,
        }
    }

    pub fn up(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            pressed: false,
        }
    }
}

/// Filtered key event for one of the recognized direction keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(KeyName),
    Up(KeyName),
}

impl KeyEvent {
    /// Filter a raw event; unrecognized keys yield `None`
    pub fn from_raw(raw: &RawKeyEvent) -> Option<Self> {
        let key = KeyName::from_host_key(&raw.key)?;
        Some(if raw.pressed {
            Self::Down(key)
        } else {
            Self::Up(key)
        })
    }
}
