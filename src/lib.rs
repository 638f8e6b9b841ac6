//! # Flow Studio
//!
//! A visual editor for customer-engagement flows: conversation steps,
//! branching logic, and backend automation laid out as nodes on a pannable,
//! zoomable canvas and wired together with bezier connections.
//!
//! ## Features
//! - Node catalog covering conversation, logic, integration, and automation
//!   steps, each with its own configuration form
//! - Drag-to-connect handles with yes/no branching on condition nodes
//! - Grid snapping, canvas panning, and zooming
//! - Command-based editing with full undo/redo
//! - JSON save/load through native file dialogs

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod catalog;
mod commands;
mod constants;
mod geometry;
mod types;
mod ui;

pub use commands::{CommandHistory, GraphCommand, GraphError};
pub use types::*;
use ui::FlowEditorApp;

/// Runs the flow editor with default settings.
///
/// Initializes the egui application window and starts the main event loop.
///
/// # Example
///
/// ```no_run
/// use flow_studio::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Flow Studio",
        options,
        Box::new(|cc| {
            let app = cc
                .storage
                .and_then(|storage| storage.get_string("app_state"))
                .and_then(|json| match FlowEditorApp::from_json(&json) {
                    Ok(app) => Some(app),
                    Err(err) => {
                        log::warn!("discarding unreadable saved state: {err}");
                        None
                    }
                })
                .unwrap_or_default();
            Ok(Box::new(app))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flow_round_trips_through_json() {
        let flow = Flow::default();
        let json = flow.to_json().unwrap();
        let back = Flow::from_json(&json).unwrap();
        assert_eq!(back.name, flow.name);
        assert_eq!(back.nodes.len(), 1);
        assert!(back.start_node().is_some());
    }
}
