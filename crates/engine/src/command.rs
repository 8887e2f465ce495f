//! Command surface: the two interactive tools plus a JSON event driver for
//! headless hosts and tests.

use serde::{Deserialize, Serialize};
use tracing::info;

use shared::InputEvent;

use crate::config::ToolSettings;
use crate::mesh::MeshEdit;
use crate::project::Projector;
use crate::session::line::LineDrawingSession;
use crate::session::trim::EdgeTrimSession;
use crate::session::EventOutcome;

/// A tool-start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ToolCommand {
    StartLineDrawing,
    StartEdgeTrim,
}

/// The currently running interactive tool.
///
/// Hosts keep one of these alive from a [`ToolCommand`] until an event
/// returns a terminal flow, then drop it.
pub enum ActiveTool {
    Line(LineDrawingSession),
    Trim(EdgeTrimSession),
}

impl ActiveTool {
    /// Begin a tool on the given mesh. Returns the tool and its start
    /// status message.
    pub fn start(command: ToolCommand, mesh: &dyn MeshEdit, settings: ToolSettings) -> (Self, String) {
        match command {
            ToolCommand::StartLineDrawing => {
                info!("line tool started");
                (
                    ActiveTool::Line(LineDrawingSession::new(mesh, settings)),
                    "Line tool started".to_string(),
                )
            }
            ToolCommand::StartEdgeTrim => {
                info!("trim tool started");
                (
                    ActiveTool::Trim(EdgeTrimSession::new(mesh, settings)),
                    "Trim tool started, select cutting edges".to_string(),
                )
            }
        }
    }

    /// Dispatch one event to the running session.
    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        mesh: &mut dyn MeshEdit,
        projector: &dyn Projector,
    ) -> EventOutcome {
        let outcome = match self {
            ActiveTool::Line(session) => session.handle_event(event, mesh, projector),
            ActiveTool::Trim(session) => session.handle_event(event, mesh, projector),
        };
        if let Some(status) = &outcome.status {
            info!(flow = ?outcome.flow, "{status}");
        }
        outcome
    }
}

/// Parse one serde-encoded event and dispatch it.
pub fn execute_json(
    tool: &mut ActiveTool,
    mesh: &mut dyn MeshEdit,
    projector: &dyn Projector,
    json: &str,
) -> Result<EventOutcome, serde_json::Error> {
    let event: InputEvent = serde_json::from_str(json)?;
    Ok(tool.handle_event(&event, mesh, projector))
}

/// Parse a JSON array of events and dispatch them in order, stopping after
/// the first terminal outcome. Returns every outcome produced.
pub fn execute_json_batch(
    tool: &mut ActiveTool,
    mesh: &mut dyn MeshEdit,
    projector: &dyn Projector,
    json: &str,
) -> Result<Vec<EventOutcome>, serde_json::Error> {
    let events: Vec<InputEvent> = serde_json::from_str(json)?;
    let mut outcomes = Vec::with_capacity(events.len());
    for event in &events {
        let outcome = tool.handle_event(event, mesh, projector);
        let terminal = outcome.flow.is_terminal();
        outcomes.push(outcome);
        if terminal {
            break;
        }
    }
    Ok(outcomes)
}
