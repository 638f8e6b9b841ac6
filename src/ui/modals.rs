//! Confirmation dialogs: delete node, delete connection, unsaved changes.

use crate::commands::GraphCommand;
use crate::ui::state::{FlowEditorApp, PendingConfirmAction, PendingFileOp};
use eframe::egui;

impl FlowEditorApp {
    /// Draws whichever confirmation dialog is active.
    pub fn draw_modals(&mut self, ctx: &egui::Context) {
        self.draw_delete_node_modal(ctx);
        self.draw_delete_edge_modal(ctx);
        self.draw_unsaved_changes_modal(ctx);
    }

    fn draw_delete_node_modal(&mut self, ctx: &egui::Context) {
        let Some(node_id) = self.interaction.confirm_delete_node else {
            return;
        };
        let Some(node) = self.flow.nodes.get(&node_id) else {
            self.interaction.confirm_delete_node = None;
            return;
        };
        let label = node.label.clone();

        egui::Window::new("Delete node?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(format!(
                    "Delete \"{label}\"? Its connections will be removed too."
                ));
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        self.apply_command(GraphCommand::DeleteNode { id: node_id });
                        if self.interaction.selected_node == Some(node_id) {
                            self.interaction.selected_node = None;
                        }
                        self.interaction.confirm_delete_node = None;
                    }
                    if ui.button("Cancel").clicked() {
                        self.interaction.confirm_delete_node = None;
                    }
                });
            });
    }

    fn draw_delete_edge_modal(&mut self, ctx: &egui::Context) {
        let Some(edge_id) = self.interaction.confirm_delete_edge else {
            return;
        };
        let Some(edge) = self.flow.edge(edge_id) else {
            self.interaction.confirm_delete_edge = None;
            return;
        };
        let describe = |id| {
            self.flow
                .nodes
                .get(&id)
                .map(|n| n.label.clone())
                .unwrap_or_else(|| "(missing)".to_owned())
        };
        let text = format!(
            "Delete the connection from \"{}\" to \"{}\"?",
            describe(edge.source),
            describe(edge.target)
        );

        egui::Window::new("Delete connection?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(text);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        self.apply_command(GraphCommand::DeleteEdge { id: edge_id });
                        if self.interaction.selected_edge == Some(edge_id) {
                            self.interaction.selected_edge = None;
                        }
                        self.interaction.confirm_delete_edge = None;
                    }
                    if ui.button("Cancel").clicked() {
                        self.interaction.confirm_delete_edge = None;
                    }
                });
            });
    }

    fn draw_unsaved_changes_modal(&mut self, ctx: &egui::Context) {
        if !self.file.show_unsaved_dialog {
            return;
        }
        let title = match self.file.pending_confirm_action {
            Some(PendingConfirmAction::Quit) => "Unsaved changes — Quit?",
            Some(PendingConfirmAction::New) => "Unsaved changes — New flow?",
            Some(PendingConfirmAction::Open) => "Unsaved changes — Open file?",
            None => "Unsaved changes",
        };

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("You have unsaved changes. Are you sure you want to continue?");
                ui.horizontal(|ui| {
                    let confirm_label = match self.file.pending_confirm_action {
                        Some(PendingConfirmAction::Quit) => "Discard and quit",
                        Some(PendingConfirmAction::New) => "Discard and create new",
                        Some(PendingConfirmAction::Open) => "Discard and open",
                        None => "Discard",
                    };
                    if ui.button(confirm_label).clicked() {
                        match self.file.pending_confirm_action {
                            Some(PendingConfirmAction::New) => {
                                self.install_flow(crate::types::Flow::default());
                            }
                            Some(PendingConfirmAction::Open) => {
                                self.file.pending_op = Some(PendingFileOp::Load);
                            }
                            Some(PendingConfirmAction::Quit) => {
                                self.file.allow_close_on_next_request = true;
                                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                            }
                            None => {}
                        }
                        self.file.show_unsaved_dialog = false;
                        self.file.pending_confirm_action = None;
                    }
                    if ui.button("Cancel").clicked() {
                        self.file.show_unsaved_dialog = false;
                        self.file.pending_confirm_action = None;
                    }
                });
            });
    }
}
