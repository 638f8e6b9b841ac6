//! Canvas viewport transform, hit-testing and pointer interaction.
//!
//! All interaction resolves to [`GraphCommand`]s; this module never edits
//! node or edge collections directly except for the live position of a node
//! mid-drag, which is committed as a single move command on release.

use crate::commands::GraphCommand;
use crate::constants::{
    GRID_SIZE, HANDLE_HIT_SLOP, HANDLE_RADIUS, NODE_HEIGHT, NODE_WIDTH, ZOOM_MAX, ZOOM_MIN,
    ZOOM_STEP,
};
use crate::geometry;
use crate::types::{EdgeId, Flow, FlowEdge, FlowNode, HandleKind, NodeId};
use crate::ui::state::{CanvasState, ConnectionDrag, FlowEditorApp};
use egui::{pos2, vec2, Pos2, Rect, Response, Ui, Vec2};

impl CanvasState {
    /// Sets the zoom factor, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Zooms in by one step.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    /// Zooms out by one step.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    /// Zooms by one step around `pointer` so the canvas point under the
    /// cursor stays put.
    pub fn zoom_at(&mut self, origin: Pos2, pointer: Pos2, steps: f32) {
        let anchor = geometry::screen_to_canvas(pointer, origin, self.offset, self.zoom);
        self.set_zoom(self.zoom + steps * ZOOM_STEP);
        self.offset = (pointer - origin) - anchor.to_vec2() * self.zoom;
    }
}

/// Frozen viewport transform for one frame of drawing and hit-testing.
#[derive(Debug, Clone, Copy)]
pub struct CanvasTransform {
    /// Top-left of the canvas widget in screen space.
    pub origin: Pos2,
    /// Pan offset.
    pub pan: Vec2,
    /// Zoom factor.
    pub zoom: f32,
}

impl CanvasTransform {
    /// Captures the transform for this frame.
    pub fn new(origin: Pos2, canvas: &CanvasState) -> Self {
        Self {
            origin,
            pan: canvas.offset,
            zoom: canvas.zoom,
        }
    }

    /// Canvas space to screen space.
    pub fn to_screen(&self, canvas: Pos2) -> Pos2 {
        geometry::canvas_to_screen(canvas, self.origin, self.pan, self.zoom)
    }

    /// Screen space to canvas space.
    pub fn to_canvas(&self, screen: Pos2) -> Pos2 {
        geometry::screen_to_canvas(screen, self.origin, self.pan, self.zoom)
    }

    /// Scales a canvas-space length to screen space.
    pub fn scale(&self, len: f32) -> f32 {
        len * self.zoom
    }
}

/// Node card rectangle in canvas space, centered on the node position.
pub fn node_rect(node: &FlowNode) -> Rect {
    let (x, y) = node.position;
    Rect::from_center_size(pos2(x, y), vec2(NODE_WIDTH, NODE_HEIGHT))
}

/// Node card rectangle in screen space.
pub fn node_screen_rect(node: &FlowNode, transform: &CanvasTransform) -> Rect {
    let rect = node_rect(node);
    Rect::from_min_max(transform.to_screen(rect.min), transform.to_screen(rect.max))
}

/// Input handle position on a screen-space card rect (left edge, centered).
pub fn input_handle_pos(rect: Rect) -> Pos2 {
    pos2(rect.left(), rect.center().y)
}

/// Output handle position on a screen-space card rect. A single output sits
/// at the right-edge center; condition yes/no handles split the right edge
/// into thirds.
pub fn output_handle_pos(rect: Rect, handle: HandleKind) -> Pos2 {
    match handle {
        HandleKind::Output => pos2(rect.right(), rect.center().y),
        HandleKind::Yes => pos2(rect.right(), rect.top() + rect.height() / 3.0),
        HandleKind::No => pos2(rect.right(), rect.top() + rect.height() * 2.0 / 3.0),
    }
}

fn handle_hit_radius(transform: &CanvasTransform) -> f32 {
    transform.scale(HANDLE_RADIUS) + HANDLE_HIT_SLOP
}

/// The output handle under `screen_pos`, if any.
pub fn output_handle_at(
    flow: &Flow,
    transform: &CanvasTransform,
    screen_pos: Pos2,
) -> Option<(NodeId, HandleKind)> {
    let radius = handle_hit_radius(transform);
    for node in flow.nodes.values() {
        let rect = node_screen_rect(node, transform);
        for &handle in node.kind.output_handles() {
            if output_handle_pos(rect, handle).distance(screen_pos) <= radius {
                return Some((node.id, handle));
            }
        }
    }
    None
}

/// The node whose input handle or card is under `screen_pos` and accepts
/// incoming edges. Used to resolve connection drops.
pub fn connection_target_at(
    flow: &Flow,
    transform: &CanvasTransform,
    screen_pos: Pos2,
) -> Option<NodeId> {
    let radius = handle_hit_radius(transform);
    for node in flow.nodes.values() {
        if !node.kind.has_input() {
            continue;
        }
        let rect = node_screen_rect(node, transform);
        if input_handle_pos(rect).distance(screen_pos) <= radius || rect.contains(screen_pos) {
            return Some(node.id);
        }
    }
    None
}

/// The node card under `screen_pos`, if any.
pub fn node_at(flow: &Flow, transform: &CanvasTransform, screen_pos: Pos2) -> Option<NodeId> {
    flow.nodes
        .values()
        .find(|node| node_screen_rect(node, transform).contains(screen_pos))
        .map(|node| node.id)
}

/// The edge whose curve passes within the hit distance of `screen_pos`.
pub fn edge_at(flow: &Flow, transform: &CanvasTransform, screen_pos: Pos2) -> Option<EdgeId> {
    flow.edges
        .iter()
        .find(|edge| {
            edge_curve(flow, edge, transform).is_some_and(|points| {
                geometry::distance_to_bezier(screen_pos, &points)
                    <= crate::constants::EDGE_HIT_DISTANCE
            })
        })
        .map(|edge| edge.id)
}

/// Screen-space bezier control points for a committed edge. `None` if either
/// endpoint node is missing.
pub fn edge_curve(flow: &Flow, edge: &FlowEdge, transform: &CanvasTransform) -> Option<[Pos2; 4]> {
    let source = flow.nodes.get(&edge.source)?;
    let target = flow.nodes.get(&edge.target)?;
    let start = output_handle_pos(node_screen_rect(source, transform), edge.source_handle);
    let end = input_handle_pos(node_screen_rect(target, transform));
    Some(geometry::edge_bezier(start, end))
}

impl FlowEditorApp {
    /// Applies a command to the flow, recording its inverse for undo and
    /// marking the file dirty. Rejected commands are logged and dropped.
    pub fn apply_command(&mut self, command: GraphCommand) {
        match command.apply(&mut self.flow) {
            Ok(inverse) => {
                self.history.record(inverse);
                self.file.has_unsaved_changes = true;
            }
            Err(err) => log::warn!("command rejected: {err}"),
        }
    }

    /// Processes pointer input on the canvas for this frame.
    pub fn handle_canvas_interactions(
        &mut self,
        ui: &Ui,
        response: &Response,
        transform: &CanvasTransform,
    ) {
        let pointer = response.hover_pos();

        self.handle_zoom_scroll(ui, response, pointer);
        self.handle_panning(ui, response);

        let Some(pos) = pointer else {
            return;
        };

        if response.drag_started_by(egui::PointerButton::Primary)
            && !ui.input(|i| i.modifiers.alt)
        {
            self.on_primary_pressed(pos, transform);
        }

        if self.interaction.dragging_node.is_some()
            && response.dragged_by(egui::PointerButton::Primary)
        {
            self.drag_selected_node(pos, transform);
        }

        if response.drag_stopped_by(egui::PointerButton::Primary) {
            self.on_primary_released(pos, transform);
        }

        if self.interaction.connection.is_connecting() {
            self.interaction.connection_pointer = Some(pos);
        } else {
            self.interaction.connection_pointer = None;
        }

        // Plain clicks (no drag) still select and cancel.
        if response.clicked_by(egui::PointerButton::Primary) {
            self.on_primary_clicked(pos, transform);
        }

        if response.clicked_by(egui::PointerButton::Secondary) {
            let canvas_pos = transform.to_canvas(pos);
            self.context_menu.show = true;
            self.context_menu.screen_pos = (pos.x, pos.y);
            self.context_menu.canvas_pos = (canvas_pos.x, canvas_pos.y);
            self.context_menu.just_opened = true;
        }
    }

    fn handle_zoom_scroll(&mut self, ui: &Ui, response: &Response, pointer: Option<Pos2>) {
        if !response.hovered() {
            return;
        }
        let (scroll, command_held) = ui.input(|i| (i.raw_scroll_delta, i.modifiers.command));
        if command_held && scroll.y.abs() > 0.0 {
            if let Some(pos) = pointer {
                let steps = if scroll.y > 0.0 { 1.0 } else { -1.0 };
                self.canvas.zoom_at(response.rect.min, pos, steps);
            }
        } else if !command_held && scroll != Vec2::ZERO {
            // Plain scroll pans.
            self.canvas.offset += scroll;
        }
    }

    fn handle_panning(&mut self, ui: &Ui, response: &Response) {
        let alt_drag = response.dragged_by(egui::PointerButton::Primary)
            && ui.input(|i| i.modifiers.alt);
        if response.dragged_by(egui::PointerButton::Middle) || alt_drag {
            self.interaction.is_panning = true;
            self.canvas.offset += response.drag_delta();
        } else {
            self.interaction.is_panning = false;
        }
    }

    fn on_primary_pressed(&mut self, pos: Pos2, transform: &CanvasTransform) {
        // Handles take priority over the card below them.
        if let Some((node_id, handle)) = output_handle_at(&self.flow, transform, pos) {
            self.interaction.connection = ConnectionDrag::Active {
                from: node_id,
                handle,
            };
            self.interaction.selected_node = Some(node_id);
            self.interaction.selected_edge = None;
            return;
        }

        if let Some(node_id) = node_at(&self.flow, transform, pos) {
            if self.interaction.selected_node != Some(node_id) {
                self.flush_pending_patch();
            }
            self.interaction.selected_node = Some(node_id);
            self.interaction.selected_edge = None;
            if let Some(node) = self.flow.nodes.get(&node_id) {
                let canvas_pos = transform.to_canvas(pos);
                self.interaction.dragging_node = Some(node_id);
                self.interaction.drag_offset =
                    pos2(node.position.0, node.position.1) - canvas_pos;
                self.interaction.drag_origin = Some(node.position);
            }
        }
    }

    fn drag_selected_node(&mut self, pos: Pos2, transform: &CanvasTransform) {
        let Some(node_id) = self.interaction.dragging_node else {
            return;
        };
        let canvas_pos = transform.to_canvas(pos) + self.interaction.drag_offset;
        let snapped = geometry::snap_to_grid(canvas_pos, GRID_SIZE);
        if let Some(node) = self.flow.nodes.get_mut(&node_id) {
            node.position = (snapped.x, snapped.y);
        }
    }

    fn on_primary_released(&mut self, pos: Pos2, transform: &CanvasTransform) {
        // Commit or cancel a pending connection.
        if let ConnectionDrag::Active { from, handle } = self.interaction.connection {
            self.interaction.connection = ConnectionDrag::Idle;
            self.interaction.connection_pointer = None;
            if let Some(target) = connection_target_at(&self.flow, transform, pos) {
                if target != from {
                    let edge = FlowEdge::new(from, target, handle);
                    self.apply_command(GraphCommand::AddEdge { edge });
                }
            }
            return;
        }

        // Commit a node drag as one undoable move.
        if let Some(node_id) = self.interaction.dragging_node.take() {
            if let (Some(origin), Some(node)) =
                (self.interaction.drag_origin.take(), self.flow.nodes.get(&node_id))
            {
                if node.position != origin {
                    self.history.record(GraphCommand::MoveNode {
                        id: node_id,
                        to: origin,
                    });
                    self.file.has_unsaved_changes = true;
                }
            }
        }
        self.interaction.drag_origin = None;
    }

    fn on_primary_clicked(&mut self, pos: Pos2, transform: &CanvasTransform) {
        if self.context_menu.show && !self.context_menu.just_opened {
            self.context_menu.show = false;
        }
        self.context_menu.just_opened = false;

        if output_handle_at(&self.flow, transform, pos).is_some() {
            return;
        }

        if let Some(node_id) = node_at(&self.flow, transform, pos) {
            if self.interaction.selected_node != Some(node_id) {
                self.flush_pending_patch();
            }
            self.interaction.selected_node = Some(node_id);
            self.interaction.selected_edge = None;
            return;
        }

        if let Some(edge_id) = edge_at(&self.flow, transform, pos) {
            if self.interaction.selected_edge == Some(edge_id) {
                // Second click on a selected edge asks to delete it.
                self.interaction.confirm_delete_edge = Some(edge_id);
            } else {
                self.interaction.selected_edge = Some(edge_id);
                self.interaction.selected_node = None;
                self.flush_pending_patch();
            }
            return;
        }

        // Empty canvas: clear selection and abandon any pending connection.
        self.interaction.connection = ConnectionDrag::Idle;
        self.interaction.connection_pointer = None;
        self.interaction.selected_node = None;
        self.interaction.selected_edge = None;
        self.flush_pending_patch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;

    fn transform() -> CanvasTransform {
        CanvasTransform {
            origin: pos2(0.0, 0.0),
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }

    #[test]
    fn zoom_clamps_to_bounds() {
        let mut canvas = CanvasState::default();
        for _ in 0..30 {
            canvas.zoom_in();
        }
        assert_eq!(canvas.zoom, ZOOM_MAX);
        for _ in 0..40 {
            canvas.zoom_out();
        }
        assert_eq!(canvas.zoom, ZOOM_MIN);
    }

    #[test]
    fn zoom_at_keeps_anchor_fixed() {
        let mut canvas = CanvasState::default();
        let origin = pos2(10.0, 10.0);
        let pointer = pos2(310.0, 210.0);
        let before = geometry::screen_to_canvas(pointer, origin, canvas.offset, canvas.zoom);
        canvas.zoom_at(origin, pointer, 1.0);
        let after = geometry::screen_to_canvas(pointer, origin, canvas.offset, canvas.zoom);
        assert!((before.x - after.x).abs() < 1e-3);
        assert!((before.y - after.y).abs() < 1e-3);
    }

    #[test]
    fn condition_handles_split_right_edge_into_thirds() {
        let node = FlowNode::new("c", (200.0, 300.0), NodeKind::Message);
        let rect = node_screen_rect(&node, &transform());
        let yes = output_handle_pos(rect, HandleKind::Yes);
        let no = output_handle_pos(rect, HandleKind::No);
        assert_eq!(yes.x, rect.right());
        assert_eq!(no.x, rect.right());
        assert!(yes.y < rect.center().y);
        assert!(no.y > rect.center().y);
        assert_eq!(
            output_handle_pos(rect, HandleKind::Output),
            pos2(rect.right(), rect.center().y)
        );
    }

    #[test]
    fn hit_tests_resolve_card_and_handles() {
        let mut flow = Flow::new("f");
        let node = FlowNode::new("m", (400.0, 400.0), NodeKind::Message);
        let id = node.id;
        flow.nodes.insert(id, node);
        let t = transform();

        assert_eq!(node_at(&flow, &t, pos2(400.0, 400.0)), Some(id));
        assert_eq!(node_at(&flow, &t, pos2(700.0, 400.0)), None);

        let right = pos2(400.0 + NODE_WIDTH / 2.0, 400.0);
        assert_eq!(output_handle_at(&flow, &t, right), Some((id, HandleKind::Output)));
        let left = pos2(400.0 - NODE_WIDTH / 2.0, 400.0);
        assert_eq!(connection_target_at(&flow, &t, left), Some(id));
    }

    #[test]
    fn start_node_is_not_a_connection_target() {
        let flow = Flow::new("f");
        let start = flow.start_node().unwrap();
        let t = transform();
        let rect = node_screen_rect(&flow.nodes[&start], &t);
        assert_eq!(connection_target_at(&flow, &t, rect.center()), None);
    }

    #[test]
    fn edge_hit_test_follows_the_curve() {
        let mut flow = Flow::new("f");
        let a = FlowNode::new("a", (200.0, 300.0), NodeKind::Message);
        let b = FlowNode::new("b", (600.0, 300.0), NodeKind::Message);
        let (a_id, b_id) = (a.id, b.id);
        flow.nodes.insert(a_id, a);
        flow.nodes.insert(b_id, b);
        let edge = FlowEdge::new(a_id, b_id, HandleKind::Output);
        let edge_id = edge.id;
        flow.edges.push(edge);

        let t = transform();
        // Midpoint of a straight horizontal run lies on the curve.
        assert_eq!(edge_at(&flow, &t, pos2(400.0, 300.0)), Some(edge_id));
        assert_eq!(edge_at(&flow, &t, pos2(400.0, 200.0)), None);
    }
}
