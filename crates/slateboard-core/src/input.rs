//! Input event surface for mouse and keyboard.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers. `Middle` is the dedicated pan button,
/// distinct from the primary drawing button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Shift only, the snap modifier for shape drags.
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }

    /// The platform command key: Ctrl, or Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Scroll {
        position: Point,
        delta_y: f64,
    },
}

/// Keyboard event type. `key` follows DOM key naming: printable keys
/// are their character, the rest are names like "Enter" or "Escape".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    /// A bare key press without modifiers.
    pub fn bare(key: impl Into<String>) -> Self {
        Self::new(key, Modifiers::default())
    }

    /// Whether this is a single printable character.
    pub fn is_printable(&self) -> bool {
        self.key.chars().count() == 1 && !self.modifiers.command() && !self.modifiers.alt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_ctrl_or_meta() {
        assert!(!Modifiers::default().command());
        assert!(
            Modifiers {
                ctrl: true,
                ..Modifiers::default()
            }
            .command()
        );
        assert!(
            Modifiers {
                meta: true,
                ..Modifiers::default()
            }
            .command()
        );
    }

    #[test]
    fn test_printable_keys() {
        assert!(KeyEvent::bare("a").is_printable());
        assert!(KeyEvent::bare(" ").is_printable());
        assert!(!KeyEvent::bare("Enter").is_printable());
        assert!(
            !KeyEvent::new(
                "z",
                Modifiers {
                    ctrl: true,
                    ..Modifiers::default()
                }
            )
            .is_printable()
        );
    }
}
