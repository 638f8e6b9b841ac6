//! Pure coordinate-space helpers shared by the canvas and its hit-testing.
//!
//! Node positions live in *canvas space*: the unscaled, unpanned coordinate
//! system, independent of the current viewport transform. Everything here is
//! stateless and deterministic.

use crate::constants;
use egui::{pos2, Pos2, Vec2};

/// Converts a screen-space point into canvas space.
///
/// `origin` is the top-left of the canvas widget in screen space, `pan` the
/// current pan offset and `zoom` the current zoom factor.
pub fn screen_to_canvas(screen: Pos2, origin: Pos2, pan: Vec2, zoom: f32) -> Pos2 {
    ((screen - origin - pan) / zoom).to_pos2()
}

/// Converts a canvas-space point back into screen space. Exact inverse of
/// [`screen_to_canvas`] up to floating-point error.
pub fn canvas_to_screen(canvas: Pos2, origin: Pos2, pan: Vec2, zoom: f32) -> Pos2 {
    origin + canvas.to_vec2() * zoom + pan
}

/// Snaps a canvas-space point to the nearest grid intersection, then clamps
/// both axes to [`constants::MIN_NODE_COORD`] so nodes stay on the canvas.
///
/// Rounds ties to even so the clamp floor snaps back to itself: with a
/// 40-unit grid the floor sits exactly halfway between 0 and 40, and
/// half-away-from-zero rounding would bounce it up to 40.
pub fn snap_to_grid(p: Pos2, grid: f32) -> Pos2 {
    pos2(
        ((p.x / grid).round_ties_even() * grid).max(constants::MIN_NODE_COORD),
        ((p.y / grid).round_ties_even() * grid).max(constants::MIN_NODE_COORD),
    )
}

/// Control points for the cubic bezier connecting two edge endpoints.
///
/// Curvature is horizontal-only (left-to-right flow layout): both control
/// points are offset along x by `min(|dx| * 0.5, BEZIER_MAX_OFFSET)`. The
/// same curve is used for committed edges and the live connection preview.
pub fn edge_bezier(start: Pos2, end: Pos2) -> [Pos2; 4] {
    let offset = ((end.x - start.x).abs() * 0.5).min(constants::BEZIER_MAX_OFFSET);
    [
        start,
        pos2(start.x + offset, start.y),
        pos2(end.x - offset, end.y),
        end,
    ]
}

/// Evaluates a cubic bezier at parameter `t` in `[0, 1]`.
pub fn bezier_point(points: &[Pos2; 4], t: f32) -> Pos2 {
    let u = 1.0 - t;
    let w0 = u * u * u;
    let w1 = 3.0 * u * u * t;
    let w2 = 3.0 * u * t * t;
    let w3 = t * t * t;
    pos2(
        w0 * points[0].x + w1 * points[1].x + w2 * points[2].x + w3 * points[3].x,
        w0 * points[0].y + w1 * points[1].y + w2 * points[2].y + w3 * points[3].y,
    )
}

/// Minimum distance from `p` to the curve, approximated by sampling the
/// bezier into line segments. Good enough for click hit-testing.
pub fn distance_to_bezier(p: Pos2, points: &[Pos2; 4]) -> f32 {
    let n = constants::BEZIER_HIT_SAMPLES;
    let mut best = f32::INFINITY;
    let mut prev = points[0];
    for i in 1..=n {
        let t = i as f32 / n as f32;
        let cur = bezier_point(points, t);
        best = best.min(distance_to_segment(p, prev, cur));
        prev = cur;
    }
    best
}

/// Distance from a point to a line segment via clamped projection.
pub fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let ap = p - a;
    let len_sq = ab.length_sq();
    if len_sq < 0.0001 {
        // Degenerate segment
        return ap.length();
    }
    let t = (ap.dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    #[test]
    fn transform_round_trip_across_zoom_range() {
        let origin = pos2(12.0, 34.0);
        let pan = vec2(-150.0, 88.5);
        for &zoom in &[0.25_f32, 0.5, 1.0, 1.3, 2.0] {
            let p = pos2(241.0, 18.0);
            let back = screen_to_canvas(canvas_to_screen(p, origin, pan, zoom), origin, pan, zoom);
            assert!((back.x - p.x).abs() < 1e-3, "x mismatch at zoom {zoom}");
            assert!((back.y - p.y).abs() < 1e-3, "y mismatch at zoom {zoom}");
        }
    }

    #[test]
    fn screen_to_canvas_divides_out_pan_and_zoom() {
        let p = screen_to_canvas(pos2(110.0, 60.0), pos2(10.0, 10.0), vec2(50.0, 0.0), 0.5);
        assert_eq!(p, pos2(100.0, 100.0));
    }

    #[test]
    fn snap_rounds_to_nearest_grid_multiple() {
        assert_eq!(snap_to_grid(pos2(103.0, 57.0), 40.0), pos2(120.0, 40.0));
        assert_eq!(snap_to_grid(pos2(241.0, 18.0), 40.0), pos2(240.0, 20.0));
    }

    #[test]
    fn snap_is_idempotent() {
        // Includes the shipped 40-unit grid, where the clamp floor lands
        // exactly halfway between grid lines.
        for &grid in &[10.0_f32, 20.0, 40.0] {
            for x in -5..30 {
                for y in -5..30 {
                    let p = pos2(x as f32 * 7.3, y as f32 * 11.1);
                    let once = snap_to_grid(p, grid);
                    assert_eq!(snap_to_grid(once, grid), once, "p={p:?} grid={grid}");
                }
            }
        }
    }

    #[test]
    fn clamp_floor_is_a_fixed_point_of_the_shipped_grid() {
        assert_eq!(snap_to_grid(pos2(240.0, 20.0), 40.0), pos2(240.0, 20.0));
        assert_eq!(snap_to_grid(pos2(20.0, 20.0), 40.0), pos2(20.0, 20.0));
    }

    #[test]
    fn snap_clamps_negative_coordinates() {
        assert_eq!(snap_to_grid(pos2(-500.0, -1.0), 40.0), pos2(20.0, 20.0));
    }

    #[test]
    fn bezier_offset_is_capped() {
        let pts = edge_bezier(pos2(0.0, 0.0), pos2(1000.0, 0.0));
        assert_eq!(pts[1].x, 100.0);
        assert_eq!(pts[2].x, 900.0);
    }

    #[test]
    fn bezier_offset_scales_with_short_spans() {
        let pts = edge_bezier(pos2(0.0, 0.0), pos2(80.0, 40.0));
        assert_eq!(pts[1], pos2(40.0, 0.0));
        assert_eq!(pts[2], pos2(40.0, 40.0));
    }

    #[test]
    fn bezier_endpoints_are_exact() {
        let pts = edge_bezier(pos2(3.0, 4.0), pos2(90.0, -20.0));
        assert_eq!(bezier_point(&pts, 0.0), pts[0]);
        assert_eq!(bezier_point(&pts, 1.0), pts[3]);
    }

    #[test]
    fn distance_to_bezier_is_zero_on_curve() {
        let pts = edge_bezier(pos2(0.0, 0.0), pos2(200.0, 100.0));
        let on_curve = bezier_point(&pts, 0.5);
        assert!(distance_to_bezier(on_curve, &pts) < 1.0);
        assert!(distance_to_bezier(pos2(100.0, 300.0), &pts) > 100.0);
    }

    #[test]
    fn segment_distance_handles_degenerate_segment() {
        let d = distance_to_segment(pos2(3.0, 4.0), pos2(0.0, 0.0), pos2(0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-5);
    }
}
