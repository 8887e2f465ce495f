//! Interactive tool sessions.
//!
//! Each session is a state machine fed one input event at a time; every
//! event yields an [`EventOutcome`] telling the host whether the tool is
//! still running, what status text to show, and which cursor to use.
//! Sessions never outlive one interactive operation.

use serde::Serialize;
use shared::{CursorKind, Key};

use crate::constraint::Axis;

pub mod line;
pub mod trim;

/// Control-flow result of handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolFlow {
    /// The tool consumed the event and keeps running.
    Running,
    /// The event is not for the tool (viewport navigation); the host should
    /// handle it.
    PassThrough,
    /// The tool completed normally.
    Finished,
    /// The tool was cancelled; in-flight work is abandoned, applied mesh
    /// mutations stay.
    Cancelled,
}

impl ToolFlow {
    pub fn is_terminal(self) -> bool {
        matches!(self, ToolFlow::Finished | ToolFlow::Cancelled)
    }
}

/// What one event produced: flow, optional status text, cursor to show.
#[derive(Debug, Clone, Serialize)]
pub struct EventOutcome {
    pub flow: ToolFlow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub cursor: CursorKind,
}

impl EventOutcome {
    pub fn running() -> Self {
        Self {
            flow: ToolFlow::Running,
            status: None,
            cursor: CursorKind::Crosshair,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_cursor(mut self, cursor: CursorKind) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn pass_through() -> Self {
        Self {
            flow: ToolFlow::PassThrough,
            status: None,
            cursor: CursorKind::Crosshair,
        }
    }

    pub fn terminal(flow: ToolFlow, status: impl Into<String>) -> Self {
        Self {
            flow,
            status: Some(status.into()),
            cursor: CursorKind::Default,
        }
    }
}

/// Axis bound to a key, if any.
pub fn axis_from_key(key: Key) -> Option<Axis> {
    match key {
        Key::X => Some(Axis::X),
        Key::Y => Some(Axis::Y),
        Key::Z => Some(Axis::Z),
        _ => None,
    }
}
