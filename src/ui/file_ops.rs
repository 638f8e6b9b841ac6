//! Saving and loading flows through native file dialogs.
//!
//! Dialogs block, so each operation runs on its own thread and reports back
//! over the channel in [`FileState`]; the UI thread polls it every frame and
//! never blocks on I/O.

use crate::types::Flow;
use crate::ui::state::{FileOperationResult, FlowEditorApp, PendingFileOp};
use eframe::egui;
use std::sync::mpsc::Sender;

impl FlowEditorApp {
    /// Drains completed file operations and dispatches newly queued ones.
    /// Called once per frame.
    pub fn handle_pending_file_ops(&mut self, ctx: &egui::Context) {
        self.file.ensure_channel();
        // Drain first: processing a result mutates `self`, so the receiver
        // cannot stay borrowed across it.
        let completed: Vec<FileOperationResult> = self
            .file
            .result_receiver
            .as_ref()
            .map(|receiver| receiver.try_iter().collect())
            .unwrap_or_default();
        for result in completed {
            match result {
                FileOperationResult::SaveCompleted(path) => {
                    log::info!("flow saved to {path}");
                    self.file.current_path = Some(path);
                    self.file.has_unsaved_changes = false;
                }
                FileOperationResult::LoadCompleted(path, content) => {
                    match Flow::from_json(&content) {
                        Ok(flow) => {
                            log::info!("flow loaded from {path}");
                            self.install_flow(flow);
                            self.file.current_path = Some(path);
                        }
                        Err(err) => log::error!("failed to parse flow file {path}: {err}"),
                    }
                }
                FileOperationResult::Cancelled => {
                    log::debug!("file dialog cancelled");
                }
                FileOperationResult::Failed(err) => {
                    log::error!("file operation failed: {err}");
                }
            }
        }

        let Some(op) = self.file.pending_op.take() else {
            return;
        };
        let Some(sender) = self.file.result_sender.clone() else {
            return;
        };
        let ctx = ctx.clone();

        match op {
            PendingFileOp::Save => match self.file.current_path.clone() {
                Some(path) => {
                    let json = match self.flow.to_json() {
                        Ok(json) => json,
                        Err(err) => {
                            log::error!("failed to serialize flow: {err}");
                            return;
                        }
                    };
                    std::thread::spawn(move || {
                        let result = match std::fs::write(&path, json) {
                            Ok(()) => FileOperationResult::SaveCompleted(path),
                            Err(err) => {
                                FileOperationResult::Failed(format!("failed to save file: {err}"))
                            }
                        };
                        let _ = sender.send(result);
                        ctx.request_repaint();
                    });
                }
                None => {
                    // No path yet: fall through to the save-as dialog.
                    self.file.pending_op = Some(PendingFileOp::SaveAs);
                    self.handle_pending_file_ops(&ctx);
                }
            },
            PendingFileOp::SaveAs => {
                let json = match self.flow.to_json() {
                    Ok(json) => json,
                    Err(err) => {
                        log::error!("failed to serialize flow: {err}");
                        return;
                    }
                };
                let file_name = suggested_file_name(&self.flow.name);
                std::thread::spawn(move || {
                    save_as_worker(&json, &file_name, &sender);
                    ctx.request_repaint();
                });
            }
            PendingFileOp::Load => {
                std::thread::spawn(move || {
                    load_worker(&sender);
                    ctx.request_repaint();
                });
            }
        }
    }

    /// Replaces the current flow, resetting selection, history, and dirty
    /// state. Used by New and by a completed load.
    pub fn install_flow(&mut self, flow: Flow) {
        self.node_counter = flow.nodes.len() as u32;
        self.flow = flow;
        self.history.clear();
        self.interaction = Default::default();
        self.file.has_unsaved_changes = false;
        self.file.current_path = None;
    }
}

fn suggested_file_name(flow_name: &str) -> String {
    let stem: String = flow_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if stem.is_empty() {
        "flow.json".to_owned()
    } else {
        format!("{stem}.json")
    }
}

fn save_as_worker(json: &str, file_name: &str, sender: &Sender<FileOperationResult>) {
    let result = match rfd::FileDialog::new()
        .add_filter("JSON", &["json"])
        .set_file_name(file_name)
        .save_file()
    {
        Some(path) => match std::fs::write(&path, json) {
            Ok(()) => FileOperationResult::SaveCompleted(path.display().to_string()),
            Err(err) => FileOperationResult::Failed(format!("failed to save file: {err}")),
        },
        None => FileOperationResult::Cancelled,
    };
    let _ = sender.send(result);
}

fn load_worker(sender: &Sender<FileOperationResult>) {
    let result = match rfd::FileDialog::new().add_filter("JSON", &["json"]).pick_file() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => FileOperationResult::LoadCompleted(path.display().to_string(), json),
            Err(err) => FileOperationResult::Failed(format!("failed to read file: {err}")),
        },
        None => FileOperationResult::Cancelled,
    };
    let _ = sender.send(result);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggested_file_name_slugifies_the_flow_name() {
        assert_eq!(suggested_file_name("Refund Flow v2"), "refund_flow_v2.json");
        assert_eq!(suggested_file_name(""), "flow.json");
    }

    #[test]
    fn queued_results_are_drained_in_one_pass() {
        let ctx = egui::Context::default();
        let mut app = FlowEditorApp::default();
        let loaded = Flow::new("Refund flow");
        let json = loaded.to_json().unwrap();

        // Two completions waiting, including a load that swaps the whole
        // flow mid-drain.
        let sender = app.file.result_sender.clone().unwrap();
        sender
            .send(FileOperationResult::LoadCompleted("a.json".into(), json))
            .unwrap();
        sender
            .send(FileOperationResult::SaveCompleted("b.json".into()))
            .unwrap();

        app.handle_pending_file_ops(&ctx);

        assert_eq!(app.flow.name, "Refund flow");
        assert_eq!(app.file.current_path.as_deref(), Some("b.json"));
        assert!(!app.file.has_unsaved_changes);
    }

    #[test]
    fn install_flow_resets_editor_state() {
        let mut app = FlowEditorApp::default();
        app.file.has_unsaved_changes = true;
        app.interaction.selected_node = app.flow.start_node();

        let replacement = Flow::new("Loaded");
        app.install_flow(replacement);

        assert_eq!(app.flow.name, "Loaded");
        assert!(!app.file.has_unsaved_changes);
        assert!(app.interaction.selected_node.is_none());
        assert!(!app.history.can_undo());
    }
}
