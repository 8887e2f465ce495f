use serde::{Deserialize, Serialize};

// ============================================================================
// Mesh handles
// ============================================================================

/// Opaque vertex identifier minted by the host mesh.
///
/// Valid only until the next structural mutation that touches the vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u64);

/// Opaque edge identifier minted by the host mesh.
///
/// Valid only until the next structural mutation that touches the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

// ============================================================================
// Input events
// ============================================================================

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the drafting tools react to. Everything else is ignored by the
/// sessions and stays with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    X,
    Y,
    Z,
    Return,
    Escape,
    Backspace,
    Period,
    Minus,
    Shift,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
}

impl Key {
    /// The decimal digit this key produces, if it is a digit key.
    pub fn digit(self) -> Option<char> {
        match self {
            Key::Digit0 => Some('0'),
            Key::Digit1 => Some('1'),
            Key::Digit2 => Some('2'),
            Key::Digit3 => Some('3'),
            Key::Digit4 => Some('4'),
            Key::Digit5 => Some('5'),
            Key::Digit6 => Some('6'),
            Key::Digit7 => Some('7'),
            Key::Digit8 => Some('8'),
            Key::Digit9 => Some('9'),
            _ => None,
        }
    }
}

/// Modifier flags delivered with key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true };
}

/// A discrete input event delivered by the host to the active tool.
///
/// Screen coordinates are region-relative pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerMove {
        screen: [f64; 2],
    },
    ButtonPress {
        button: MouseButton,
        screen: [f64; 2],
    },
    ButtonRelease {
        button: MouseButton,
        screen: [f64; 2],
    },
    KeyPress {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyRelease {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Viewport scroll; tools pass this through to the host untouched.
    Scroll {
        delta: [f64; 2],
    },
    Cancel,
}

// ============================================================================
// Host feedback
// ============================================================================

/// Cursor shape the host should show for the active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorKind {
    #[default]
    Default,
    Crosshair,
    /// Shown while a vertex snap is active.
    Hand,
    /// Shown while a midpoint snap is active.
    PaintCross,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_round_trip() {
        let events = vec![
            InputEvent::PointerMove { screen: [12.0, 34.5] },
            InputEvent::ButtonPress {
                button: MouseButton::Left,
                screen: [0.0, 0.0],
            },
            InputEvent::KeyPress {
                key: Key::X,
                modifiers: Modifiers::SHIFT,
            },
            InputEvent::Scroll { delta: [0.0, -1.0] },
            InputEvent::Cancel,
        ];
        let json = serde_json::to_string(&events).unwrap();
        let back: Vec<InputEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(events, back);
    }

    #[test]
    fn test_event_tag_names() {
        let json = serde_json::to_string(&InputEvent::PointerMove { screen: [1.0, 2.0] }).unwrap();
        assert!(json.contains(r#""type":"pointer_move""#));
    }

    #[test]
    fn test_key_press_defaults_modifiers() {
        let ev: InputEvent = serde_json::from_str(r#"{"type": "key_press", "key": "x"}"#).unwrap();
        assert_eq!(
            ev,
            InputEvent::KeyPress {
                key: Key::X,
                modifiers: Modifiers::NONE,
            }
        );
    }

    #[test]
    fn test_digit_mapping() {
        assert_eq!(Key::Digit7.digit(), Some('7'));
        assert_eq!(Key::Period.digit(), None);
        assert_eq!(Key::Minus.digit(), None);
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(VertexId(3).to_string(), "v3");
        assert_eq!(EdgeId(17).to_string(), "e17");
    }
}
