//! Shared application-wide constants.
//! Centralizes tweakable values used across UI rendering and interactions.

// Node dimensions
/// Default node card width in canvas units.
pub const NODE_WIDTH: f32 = 160.0;
/// Default node card height in canvas units.
pub const NODE_HEIGHT: f32 = 64.0;

// Grid/drawing
/// Grid cell size in canvas units. Node positions snap to this.
pub const GRID_SIZE: f32 = 40.0;
/// Minimum node coordinate on either axis; dragging clamps here so nodes
/// cannot disappear into negative space.
pub const MIN_NODE_COORD: f32 = 20.0;

// Zoom
/// Lower zoom bound.
pub const ZOOM_MIN: f32 = 0.25;
/// Upper zoom bound.
pub const ZOOM_MAX: f32 = 2.0;
/// Zoom increment for both buttons and ctrl/cmd+scroll.
pub const ZOOM_STEP: f32 = 0.1;

// Edges
/// Cap on the horizontal bezier control-point offset, in canvas units.
pub const BEZIER_MAX_OFFSET: f32 = 100.0;
/// Widened hit distance for selecting an edge, in canvas units.
pub const EDGE_HIT_DISTANCE: f32 = 8.0;
/// Number of segments used when sampling a bezier for hit-testing.
pub const BEZIER_HIT_SAMPLES: usize = 24;

// Handles
/// Radius of connection handles in canvas units.
pub const HANDLE_RADIUS: f32 = 6.0;
/// Extra slop around a handle for pointer hit-testing, in canvas units.
pub const HANDLE_HIT_SLOP: f32 = 4.0;

// Undo/redo
/// Maximum number of undo history entries to retain.
pub const MAX_UNDO_HISTORY: usize = 100;

// Properties panel
/// Quiet period after the last panel edit before the pending undo entry is
/// flushed and the "Saved" flash is shown, in seconds.
pub const PANEL_FLUSH_DELAY: f64 = 1.5;
