//! Canvas drawing: grid, edges, connection preview, and node cards.
//!
//! Layering runs background to foreground: grid, committed edges, the
//! dashed connection preview, then nodes, so cards always sit on top of
//! the curves that connect them.

use crate::catalog;
use crate::constants::{GRID_SIZE, HANDLE_RADIUS};
use crate::geometry;
use crate::types::{FlowEdge, FlowNode, HandleKind};
use crate::ui::canvas::{
    input_handle_pos, node_screen_rect, output_handle_pos, CanvasTransform,
};
use crate::ui::state::{ConnectionDrag, FlowEditorApp};
use eframe::egui;
use eframe::epaint::{CubicBezierShape, StrokeKind};

const EDGE_COLOR: egui::Color32 = egui::Color32::from_rgb(148, 163, 184);
const EDGE_SELECTED_COLOR: egui::Color32 = egui::Color32::from_rgb(96, 165, 250);
const SELECTION_RING: egui::Color32 = egui::Color32::from_rgb(96, 165, 250);
const YES_COLOR: egui::Color32 = egui::Color32::from_rgb(74, 222, 128);
const NO_COLOR: egui::Color32 = egui::Color32::from_rgb(248, 113, 113);

impl FlowEditorApp {
    /// Renders the whole canvas for this frame.
    pub fn render_canvas(
        &self,
        painter: &egui::Painter,
        canvas_rect: egui::Rect,
        transform: &CanvasTransform,
    ) {
        if self.canvas.show_grid {
            self.draw_grid(painter, canvas_rect, transform);
        }

        for edge in &self.flow.edges {
            let selected = self.interaction.selected_edge == Some(edge.id);
            self.draw_edge(painter, edge, transform, selected);
        }

        if let ConnectionDrag::Active { from, handle } = self.interaction.connection {
            if let Some(pointer) = self.interaction.connection_pointer {
                self.draw_connection_preview(painter, from, handle, pointer, transform);
            }
        }

        for node in self.flow.nodes.values() {
            self.draw_node(painter, node, transform);
        }
    }

    /// Draws grid lines at every canvas-space grid multiple visible in the
    /// viewport. Skipped when zoomed out far enough that lines would merge.
    fn draw_grid(
        &self,
        painter: &egui::Painter,
        canvas_rect: egui::Rect,
        transform: &CanvasTransform,
    ) {
        if transform.scale(GRID_SIZE) < 4.0 {
            return;
        }
        let stroke = egui::Stroke::new(
            1.0,
            egui::Color32::from_rgba_unmultiplied(128, 128, 128, if self.dark_mode { 28 } else { 48 }),
        );

        let top_left = transform.to_canvas(canvas_rect.min);
        let bottom_right = transform.to_canvas(canvas_rect.max);

        let mut x = (top_left.x / GRID_SIZE).floor() * GRID_SIZE;
        while x <= bottom_right.x {
            let sx = transform.to_screen(egui::pos2(x, 0.0)).x;
            painter.line_segment(
                [
                    egui::pos2(sx, canvas_rect.min.y),
                    egui::pos2(sx, canvas_rect.max.y),
                ],
                stroke,
            );
            x += GRID_SIZE;
        }

        let mut y = (top_left.y / GRID_SIZE).floor() * GRID_SIZE;
        while y <= bottom_right.y {
            let sy = transform.to_screen(egui::pos2(0.0, y)).y;
            painter.line_segment(
                [
                    egui::pos2(canvas_rect.min.x, sy),
                    egui::pos2(canvas_rect.max.x, sy),
                ],
                stroke,
            );
            y += GRID_SIZE;
        }
    }

    /// Draws a committed edge: bezier curve, arrowhead at the target, and
    /// the label (if any) at the curve midpoint.
    fn draw_edge(
        &self,
        painter: &egui::Painter,
        edge: &FlowEdge,
        transform: &CanvasTransform,
        selected: bool,
    ) {
        let (Some(source), Some(target)) = (
            self.flow.nodes.get(&edge.source),
            self.flow.nodes.get(&edge.target),
        ) else {
            return;
        };

        let start = output_handle_pos(node_screen_rect(source, transform), edge.source_handle);
        let end = input_handle_pos(node_screen_rect(target, transform));
        let points = geometry::edge_bezier(start, end);

        let color = if selected {
            EDGE_SELECTED_COLOR
        } else {
            match edge.source_handle {
                HandleKind::Yes => YES_COLOR,
                HandleKind::No => NO_COLOR,
                HandleKind::Output => EDGE_COLOR,
            }
        };
        let width = if selected { 3.0 } else { 2.0 };
        let stroke = egui::Stroke::new(width, color);

        painter.add(CubicBezierShape::from_points_stroke(
            points,
            false,
            egui::Color32::TRANSPARENT,
            stroke,
        ));

        self.draw_arrowhead(painter, &points, color);

        if let Some(label) = &edge.label {
            let mid = geometry::bezier_point(&points, 0.5);
            let font = egui::FontId::proportional((11.0 * transform.zoom).clamp(8.0, 16.0));
            let galley = painter.layout_no_wrap(label.clone(), font.clone(), color);
            let pad = egui::vec2(4.0, 2.0);
            let bg = egui::Rect::from_center_size(mid, galley.size() + pad * 2.0);
            painter.rect_filled(bg, 3.0, self.canvas_fill());
            painter.text(mid, egui::Align2::CENTER_CENTER, label, font, color);
        }
    }

    /// Arrowhead aligned with the curve's incoming tangent at the target.
    fn draw_arrowhead(
        &self,
        painter: &egui::Painter,
        points: &[egui::Pos2; 4],
        color: egui::Color32,
    ) {
        let tip = points[3];
        let before = geometry::bezier_point(points, 0.95);
        let dir = (tip - before).normalized();
        if !dir.is_finite() {
            return;
        }
        let perp = egui::vec2(-dir.y, dir.x);
        let size = 8.0;
        let left = tip - dir * size + perp * (size * 0.5);
        let right = tip - dir * size - perp * (size * 0.5);
        painter.add(egui::Shape::convex_polygon(
            vec![tip, left, right],
            color,
            egui::Stroke::NONE,
        ));
    }

    /// Dashed preview from the source handle to the pointer while a
    /// connection drag is in progress.
    fn draw_connection_preview(
        &self,
        painter: &egui::Painter,
        from: crate::types::NodeId,
        handle: HandleKind,
        pointer: egui::Pos2,
        transform: &CanvasTransform,
    ) {
        let Some(source) = self.flow.nodes.get(&from) else {
            return;
        };
        let start = output_handle_pos(node_screen_rect(source, transform), handle);
        let points = geometry::edge_bezier(start, pointer);

        // Sample the bezier into a polyline and dash it.
        let samples: Vec<egui::Pos2> = (0..=24)
            .map(|i| geometry::bezier_point(&points, i as f32 / 24.0))
            .collect();
        let stroke = egui::Stroke::new(2.0, EDGE_SELECTED_COLOR);
        for pair in samples.windows(2) {
            painter.extend(egui::Shape::dashed_line(pair, stroke, 6.0, 4.0));
        }
        painter.circle_filled(pointer, 4.0, EDGE_SELECTED_COLOR);
    }

    /// Draws a node card: fill, border, selection ring, icon, label,
    /// type subtitle, and its handles.
    fn draw_node(&self, painter: &egui::Painter, node: &FlowNode, transform: &CanvasTransform) {
        let rect = node_screen_rect(node, transform);
        let style = catalog::style(&node.kind);
        let rounding = transform.scale(8.0);

        let border_width = if self.interaction.dragging_node == Some(node.id) {
            2.5
        } else {
            1.5
        };
        painter.rect_filled(rect, rounding, style.fill);
        painter.rect_stroke(
            rect,
            rounding,
            egui::Stroke::new(border_width, style.stroke),
            StrokeKind::Inside,
        );

        if self.interaction.selected_node == Some(node.id) {
            painter.rect_stroke(
                rect.expand(3.0),
                rounding + 3.0,
                egui::Stroke::new(2.0, SELECTION_RING),
                StrokeKind::Outside,
            );
        }

        let label_font = egui::FontId::proportional((13.0 * transform.zoom).clamp(8.0, 20.0));
        let sub_font = egui::FontId::proportional((10.0 * transform.zoom).clamp(7.0, 15.0));
        let text_color = egui::Color32::from_gray(235);

        let icon_pos = egui::pos2(rect.left() + transform.scale(12.0), rect.center().y);
        painter.text(
            icon_pos,
            egui::Align2::LEFT_CENTER,
            style.icon,
            label_font.clone(),
            style.stroke,
        );

        let text_x = rect.left() + transform.scale(34.0);
        painter.text(
            egui::pos2(text_x, rect.center().y - transform.scale(9.0)),
            egui::Align2::LEFT_CENTER,
            truncate(&node.label, 18),
            label_font,
            text_color,
        );
        painter.text(
            egui::pos2(text_x, rect.center().y + transform.scale(10.0)),
            egui::Align2::LEFT_CENTER,
            style.title,
            sub_font,
            egui::Color32::from_gray(160),
        );

        self.draw_handles(painter, node, rect, transform);
    }

    /// Handle circles: input on the left, outputs on the right. Condition
    /// handles are tinted to match their branch.
    fn draw_handles(
        &self,
        painter: &egui::Painter,
        node: &FlowNode,
        rect: egui::Rect,
        transform: &CanvasTransform,
    ) {
        let radius = transform.scale(HANDLE_RADIUS);
        let border = egui::Stroke::new(1.5, egui::Color32::from_gray(30));

        if node.kind.has_input() {
            let pos = input_handle_pos(rect);
            painter.circle_filled(pos, radius, egui::Color32::from_gray(180));
            painter.circle_stroke(pos, radius, border);
        }

        for &handle in node.kind.output_handles() {
            let pos = output_handle_pos(rect, handle);
            let color = match handle {
                HandleKind::Yes => YES_COLOR,
                HandleKind::No => NO_COLOR,
                HandleKind::Output => egui::Color32::from_gray(180),
            };
            painter.circle_filled(pos, radius, color);
            painter.circle_stroke(pos, radius, border);

            if let Some(text) = handle.default_label() {
                painter.text(
                    pos + egui::vec2(radius + 3.0, 0.0),
                    egui::Align2::LEFT_CENTER,
                    text,
                    egui::FontId::proportional((9.0 * transform.zoom).clamp(7.0, 13.0)),
                    color,
                );
            }
        }
    }

    /// Canvas background color for the current theme.
    pub fn canvas_fill(&self) -> egui::Color32 {
        if self.dark_mode {
            egui::Color32::from_rgb(16, 18, 24)
        } else {
            egui::Color32::from_rgb(245, 246, 248)
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_labels_alone() {
        assert_eq!(truncate("Welcome", 18), "Welcome");
    }

    #[test]
    fn truncate_appends_ellipsis_to_long_labels() {
        let out = truncate("A very long node label indeed", 18);
        assert!(out.ends_with('…'));
        assert!(out.chars().count() <= 18);
    }
}
