//! User interface for the flow editor.
//!
//! # Module organization
//!
//! - `state` - Application state structures and the main FlowEditorApp
//! - `canvas` - Viewport transform, hit-testing, and pointer interaction
//! - `rendering` - Drawing the grid, edges, and node cards
//! - `panel` - Right-hand properties panel with per-kind forms
//! - `modals` - Confirmation dialogs
//! - `file_ops` - Save/load through native file dialogs

pub mod canvas;
mod file_ops;
mod modals;
mod panel;
mod rendering;
pub mod state;
#[cfg(test)]
mod tests;

pub use state::FlowEditorApp;

use crate::catalog::{self, TemplateGroup};
use crate::commands::GraphCommand;
use crate::constants::GRID_SIZE;
use crate::geometry;
use crate::types::{Flow, FlowNode, NodeId, NodeKind};
use crate::ui::canvas::CanvasTransform;
use crate::ui::state::{PendingConfirmAction, PendingFileOp};
use eframe::egui;

impl eframe::App for FlowEditorApp {
    /// Persist the whole editor state between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => storage.set_string("app_state", json),
            Err(err) => log::error!("failed to serialize app state: {err}"),
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.interaction.now = ctx.input(|i| i.time);

        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_pending_file_ops(ctx);
        self.tick_pending_patch();
        self.handle_undo_redo_keys(ctx);
        self.handle_delete_key(ctx);
        self.handle_duplicate_key(ctx);
        self.handle_file_shortcuts(ctx);

        // Intercept native window close requests (titlebar X).
        if ctx.input(|i| i.viewport().close_requested()) {
            if self.file.has_unsaved_changes && !self.file.allow_close_on_next_request {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                if !self.file.show_unsaved_dialog {
                    self.file.show_unsaved_dialog = true;
                    self.file.pending_confirm_action = Some(PendingConfirmAction::Quit);
                }
            } else {
                self.file.allow_close_on_next_request = false;
            }
        }

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        self.draw_properties_panel(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(self.canvas_fill()))
            .show(ctx, |ui| {
                self.draw_canvas(ui);
            });

        self.draw_modals(ctx);

        // Keep frames coming while the panel-edit flush timer or the
        // "Saved" flash is pending.
        if self.interaction.pending_patch.is_some()
            || self.interaction.now < self.interaction.saved_flash_until
        {
            ctx.request_repaint_after(std::time::Duration::from_millis(200));
        }
    }
}

impl FlowEditorApp {
    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        let transform = CanvasTransform::new(response.rect.min, &self.canvas);
        self.handle_canvas_interactions(ui, &response, &transform);

        // Re-capture after interaction so panning and zooming render
        // without a one-frame lag.
        let transform = CanvasTransform::new(response.rect.min, &self.canvas);
        self.render_canvas(&painter, response.rect, &transform);

        if self.context_menu.show {
            self.draw_context_menu(ui);
        }
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("New").clicked() {
                if self.file.has_unsaved_changes {
                    self.file.show_unsaved_dialog = true;
                    self.file.pending_confirm_action = Some(PendingConfirmAction::New);
                } else {
                    self.install_flow(Flow::default());
                }
            }
            if ui.button("Open").clicked() {
                if self.file.has_unsaved_changes {
                    self.file.show_unsaved_dialog = true;
                    self.file.pending_confirm_action = Some(PendingConfirmAction::Open);
                } else {
                    self.file.pending_op = Some(PendingFileOp::Load);
                }
            }
            if ui.button("Save").clicked() {
                self.file.pending_op = Some(PendingFileOp::Save);
            }
            if ui.button("Save As").clicked() {
                self.file.pending_op = Some(PendingFileOp::SaveAs);
            }

            ui.separator();

            ui.add_enabled_ui(self.history.can_undo(), |ui| {
                if ui.button("⟲ Undo").clicked() {
                    self.perform_undo();
                }
            });
            ui.add_enabled_ui(self.history.can_redo(), |ui| {
                if ui.button("⟳ Redo").clicked() {
                    self.perform_redo();
                }
            });

            ui.separator();

            if ui.button("−").clicked() {
                self.canvas.zoom_out();
            }
            ui.label(format!("{:.0}%", self.canvas.zoom * 100.0));
            if ui.button("＋").clicked() {
                self.canvas.zoom_in();
            }
            if ui.button("Reset view").clicked() {
                self.canvas.set_zoom(1.0);
                self.canvas.offset = egui::Vec2::ZERO;
            }

            ui.separator();

            ui.checkbox(&mut self.canvas.show_grid, "Grid");
            let theme_icon = if self.dark_mode { "☀" } else { "🌙" };
            if ui.button(theme_icon).clicked() {
                self.dark_mode = !self.dark_mode;
            }

            ui.separator();

            ui.label(self.flow.status.label());
            ui.label(egui::RichText::new(&self.flow.environment).small().weak());
            if ui.text_edit_singleline(&mut self.flow.name).changed() {
                self.file.has_unsaved_changes = true;
            }
            if self.file.has_unsaved_changes {
                ui.colored_label(egui::Color32::from_rgb(251, 191, 36), "●")
                    .on_hover_text("Unsaved changes");
            }
        });
    }

    fn draw_context_menu(&mut self, ui: &mut egui::Ui) {
        let screen_pos = egui::pos2(
            self.context_menu.screen_pos.0,
            self.context_menu.screen_pos.1,
        );

        let area_response = egui::Area::new(egui::Id::new("context_menu"))
            .fixed_pos(screen_pos)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(150.0);
                    ui.label("Add node");
                    ui.separator();
                    egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                        for group in TemplateGroup::ALL {
                            ui.label(egui::RichText::new(group.label()).small().weak());
                            for template in
                                catalog::templates().iter().filter(|t| t.group == group)
                            {
                                if ui.button(template.name).clicked() {
                                    self.create_node_from_template(template);
                                    self.context_menu.show = false;
                                }
                            }
                            ui.add_space(4.0);
                        }
                    });
                    ui.separator();
                    if ui.button("Cancel").clicked() {
                        self.context_menu.show = false;
                    }
                })
            });

        // Click outside closes the menu, but not on the frame that opened it.
        if !self.context_menu.just_opened && ui.input(|i| i.pointer.primary_clicked()) {
            if let Some(click_pos) = ui.input(|i| i.pointer.interact_pos()) {
                if !area_response.response.rect.contains(click_pos) {
                    self.context_menu.show = false;
                }
            }
        }
        self.context_menu.just_opened = false;
    }

    /// Creates a node from an add-menu template at the context menu's
    /// canvas position, snapped to the grid.
    fn create_node_from_template(&mut self, template: &catalog::NodeTemplate) {
        self.node_counter += 1;
        let pos = geometry::snap_to_grid(
            egui::pos2(self.context_menu.canvas_pos.0, self.context_menu.canvas_pos.1),
            GRID_SIZE,
        );
        let node = FlowNode::new(
            format!("{} {}", template.name, self.node_counter),
            (pos.x, pos.y),
            (template.make)(),
        );
        let id = node.id;
        self.apply_command(GraphCommand::AddNode { node });
        self.interaction.selected_node = Some(id);
        self.interaction.selected_edge = None;
    }

    /// Clones a node one grid cell away with a fresh id, keeping its label,
    /// content, and configuration. The start node cannot be duplicated, and
    /// connections are not copied.
    fn duplicate_node(&mut self, node_id: NodeId) {
        let Some(source) = self.flow.nodes.get(&node_id) else {
            return;
        };
        if matches!(source.kind, NodeKind::Start) {
            return;
        }
        let pos = geometry::snap_to_grid(
            egui::pos2(source.position.0 + GRID_SIZE, source.position.1 + GRID_SIZE),
            GRID_SIZE,
        );
        let mut copy = FlowNode::new(source.label.clone(), (pos.x, pos.y), source.kind.clone());
        copy.content = source.content.clone();
        let id = copy.id;
        self.apply_command(GraphCommand::AddNode { node: copy });
        self.interaction.selected_node = Some(id);
        self.interaction.selected_edge = None;
    }

    fn perform_undo(&mut self) {
        self.flush_pending_patch();
        if self.history.undo(&mut self.flow) {
            self.file.has_unsaved_changes = true;
            self.prune_dead_selection();
        }
    }

    fn perform_redo(&mut self) {
        self.flush_pending_patch();
        if self.history.redo(&mut self.flow) {
            self.file.has_unsaved_changes = true;
            self.prune_dead_selection();
        }
    }

    /// Drops selections pointing at nodes or edges that an undo/redo
    /// removed from the graph.
    fn prune_dead_selection(&mut self) {
        if let Some(id) = self.interaction.selected_node {
            if !self.flow.nodes.contains_key(&id) {
                self.interaction.selected_node = None;
            }
        }
        if let Some(id) = self.interaction.selected_edge {
            if self.flow.edge(id).is_none() {
                self.interaction.selected_edge = None;
            }
        }
    }

    fn handle_undo_redo_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Z) && i.modifiers.command && !i.modifiers.shift)
        {
            self.perform_undo();
        } else if ctx.input(|i| {
            (i.key_pressed(egui::Key::Z) && i.modifiers.command && i.modifiers.shift)
                || (i.key_pressed(egui::Key::Y) && i.modifiers.command)
        }) {
            self.perform_redo();
        }
    }

    /// Delete asks for confirmation rather than deleting outright.
    fn handle_delete_key(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        if !ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace))
        {
            return;
        }
        if let Some(node_id) = self.interaction.selected_node {
            let is_start = self
                .flow
                .nodes
                .get(&node_id)
                .is_some_and(|n| matches!(n.kind, NodeKind::Start));
            if !is_start {
                self.interaction.confirm_delete_node = Some(node_id);
            }
        } else if let Some(edge_id) = self.interaction.selected_edge {
            self.interaction.confirm_delete_edge = Some(edge_id);
        }
    }

    fn handle_duplicate_key(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::D) && i.modifiers.command) {
            if let Some(node_id) = self.interaction.selected_node {
                self.duplicate_node(node_id);
            }
        }
    }

    fn handle_file_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let mut request_quit = false;
        ctx.input(|i| {
            let cmd = i.modifiers.command;
            let shift = i.modifiers.shift;
            if i.key_pressed(egui::Key::S) && cmd && shift {
                self.file.pending_op = Some(PendingFileOp::SaveAs);
            } else if i.key_pressed(egui::Key::S) && cmd {
                self.file.pending_op = Some(PendingFileOp::Save);
            }
            if i.key_pressed(egui::Key::O) && cmd {
                if self.file.has_unsaved_changes {
                    self.file.show_unsaved_dialog = true;
                    self.file.pending_confirm_action = Some(PendingConfirmAction::Open);
                } else {
                    self.file.pending_op = Some(PendingFileOp::Load);
                }
            }
            if i.key_pressed(egui::Key::N) && cmd {
                if self.file.has_unsaved_changes {
                    self.file.show_unsaved_dialog = true;
                    self.file.pending_confirm_action = Some(PendingConfirmAction::New);
                } else {
                    self.install_flow(Flow::default());
                }
            }
            if i.key_pressed(egui::Key::Q) && cmd {
                if self.file.has_unsaved_changes {
                    self.file.show_unsaved_dialog = true;
                    self.file.pending_confirm_action = Some(PendingConfirmAction::Quit);
                } else {
                    request_quit = true;
                }
            }
        });
        if request_quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}
