//! Application state structures.
//!
//! Splits the editor's state into canvas navigation, pointer interaction,
//! context menu, and file handling, all owned by [`FlowEditorApp`]. Nodes
//! and edges themselves live in the [`Flow`] aggregate; child views never
//! mutate it directly — they go through commands on the app.

use crate::commands::CommandHistory;
use crate::types::{EdgeId, Flow, HandleKind, NodeId, NodeKind};
use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Canvas navigation and display state.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasState {
    /// Current pan offset in screen space. Unbounded.
    #[serde(skip)]
    pub offset: Vec2,
    /// Current zoom factor, clamped to `[ZOOM_MIN, ZOOM_MAX]`.
    pub zoom: f32,
    /// Whether the background grid is drawn.
    pub show_grid: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            show_grid: true,
        }
    }
}

/// Connection-drag state machine: either idle, or dragging a pending edge
/// out of a specific node handle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ConnectionDrag {
    /// No connection in progress.
    #[default]
    Idle,
    /// Dragging from `from`'s `handle`; a dashed preview tracks the pointer.
    Active {
        /// Source node.
        from: NodeId,
        /// Output handle the edge leaves from.
        handle: HandleKind,
    },
}

impl ConnectionDrag {
    /// Whether a connection drag is in progress.
    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectionDrag::Active { .. })
    }
}

/// Original values of a node captured when a properties-panel editing burst
/// begins; flushed into one undo entry when the burst ends.
#[derive(Debug, Clone)]
pub struct PendingPatch {
    /// The node being edited.
    pub node_id: NodeId,
    /// Kind/configuration before the first staged change.
    pub old_kind: NodeKind,
    /// Label before the first staged change.
    pub old_label: String,
    /// Content before the first staged change.
    pub old_content: Option<String>,
}

/// Pointer-interaction state: selection, dragging, connecting, modals.
#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InteractionState {
    /// Currently selected node, if any.
    #[serde(skip)]
    pub selected_node: Option<NodeId>,
    /// Currently selected edge, if any.
    #[serde(skip)]
    pub selected_edge: Option<EdgeId>,
    /// Node currently being dragged.
    #[serde(skip)]
    pub dragging_node: Option<NodeId>,
    /// Offset from the pointer to the dragged node's center, in canvas
    /// space, so the node does not jump to the cursor on grab.
    #[serde(skip)]
    pub drag_offset: Vec2,
    /// Node position when the drag started, for the move command.
    #[serde(skip)]
    pub drag_origin: Option<(f32, f32)>,
    /// Whether the user is panning the canvas.
    #[serde(skip)]
    pub is_panning: bool,
    /// Connection-drag state.
    #[serde(skip)]
    pub connection: ConnectionDrag,
    /// Live pointer position of the connection preview, in screen space.
    #[serde(skip)]
    pub connection_pointer: Option<Pos2>,
    /// Node awaiting delete confirmation, if the modal is open.
    #[serde(skip)]
    pub confirm_delete_node: Option<NodeId>,
    /// Edge awaiting delete confirmation, if the modal is open.
    #[serde(skip)]
    pub confirm_delete_edge: Option<EdgeId>,
    /// Uncommitted properties-panel edit, coalesced into one undo entry.
    #[serde(skip)]
    pub pending_patch: Option<PendingPatch>,
    /// Time of the most recent staged panel edit (`egui` clock, seconds).
    #[serde(skip)]
    pub last_edit_time: f64,
    /// Show the "Saved" flash in the panel until this time.
    #[serde(skip)]
    pub saved_flash_until: f64,
    /// Current frame time, captured at the top of each update.
    #[serde(skip)]
    pub now: f64,
}

/// Right-click context menu state.
#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ContextMenuState {
    /// Whether the menu is visible.
    #[serde(skip)]
    pub show: bool,
    /// Screen position the menu is anchored at.
    #[serde(skip)]
    pub screen_pos: (f32, f32),
    /// Canvas position new nodes are created at.
    #[serde(skip)]
    pub canvas_pos: (f32, f32),
    /// Guards against the menu closing on the click that opened it.
    #[serde(skip)]
    pub just_opened: bool,
}

/// A save or load request waiting to be dispatched to the dialog thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingFileOp {
    /// Save to the current path, or prompt if there is none.
    Save,
    /// Always prompt for a path.
    SaveAs,
    /// Prompt for a file to open.
    Load,
}

/// Result messages sent back from the dialog worker thread.
#[derive(Debug)]
pub enum FileOperationResult {
    /// Save finished; carries the path written.
    SaveCompleted(String),
    /// Load finished; carries the path and file contents.
    LoadCompleted(String, String),
    /// Dialog was cancelled.
    Cancelled,
    /// Operation failed with an error message.
    Failed(String),
}

/// Action deferred behind the unsaved-changes confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingConfirmAction {
    /// Create a new flow.
    New,
    /// Open a flow from disk.
    Open,
    /// Quit the application.
    Quit,
}

/// File handling state: current path, dirty flag, and the channel carrying
/// results back from the dialog worker thread.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct FileState {
    /// Path of the currently open file, if any.
    #[serde(skip)]
    pub current_path: Option<String>,
    /// Whether the flow has unsaved changes.
    #[serde(skip)]
    pub has_unsaved_changes: bool,
    /// File operation queued for dispatch this frame.
    #[serde(skip)]
    pub pending_op: Option<PendingFileOp>,
    /// Sender handed to worker threads.
    #[serde(skip)]
    pub result_sender: Option<Sender<FileOperationResult>>,
    /// Receiver polled each frame.
    #[serde(skip)]
    pub result_receiver: Option<Receiver<FileOperationResult>>,
    /// Whether the unsaved-changes dialog is showing.
    #[serde(skip)]
    pub show_unsaved_dialog: bool,
    /// The action waiting on that dialog.
    #[serde(skip)]
    pub pending_confirm_action: Option<PendingConfirmAction>,
    /// One-shot flag letting the next close request through after the user
    /// confirmed discarding changes.
    #[serde(skip)]
    pub allow_close_on_next_request: bool,
}

impl Default for FileState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            current_path: None,
            has_unsaved_changes: false,
            pending_op: None,
            result_sender: Some(sender),
            result_receiver: Some(receiver),
            show_unsaved_dialog: false,
            pending_confirm_action: None,
            allow_close_on_next_request: false,
        }
    }
}

impl FileState {
    /// Recreates the result channel if it was lost, e.g. after the state
    /// was restored from storage (the channel is not persisted).
    pub fn ensure_channel(&mut self) {
        if self.result_sender.is_none() || self.result_receiver.is_none() {
            let (sender, receiver) = channel();
            self.result_sender = Some(sender);
            self.result_receiver = Some(receiver);
        }
    }
}

/// The main application: the flow being edited plus all UI state.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct FlowEditorApp {
    /// The flow being edited.
    pub flow: Flow,
    /// Canvas navigation state.
    pub canvas: CanvasState,
    /// Pointer interaction state.
    pub interaction: InteractionState,
    /// Context menu state.
    pub context_menu: ContextMenuState,
    /// File handling state.
    pub file: FileState,
    /// Undo/redo history.
    #[serde(skip)]
    pub history: CommandHistory,
    /// Counter for generating default node labels.
    pub node_counter: u32,
    /// Whether dark visuals are enabled.
    pub dark_mode: bool,
    /// Remembered properties-panel width.
    pub properties_panel_width: f32,
}

impl Default for FlowEditorApp {
    fn default() -> Self {
        Self {
            flow: Flow::default(),
            canvas: CanvasState::default(),
            interaction: InteractionState::default(),
            context_menu: ContextMenuState::default(),
            file: FileState::default(),
            history: CommandHistory::new(),
            node_counter: 0,
            dark_mode: true,
            properties_panel_width: 340.0,
        }
    }
}

impl FlowEditorApp {
    /// Serializes the application state to JSON for eframe persistence.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Restores application state from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
