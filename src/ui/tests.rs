use super::*;
use crate::commands::GraphCommand;
use crate::types::{ConditionConfig, FlowNode, HandleKind, NodeKind};
use crate::ui::state::{ConnectionDrag, PendingPatch};
use eframe::egui;

/// Runs one headless frame of the canvas with the given input events.
/// Frames share `ctx`, so pointer state persists across calls.
fn canvas_frame(ctx: &egui::Context, app: &mut FlowEditorApp, events: Vec<egui::Event>) {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(1200.0, 800.0),
    ));
    raw.events = events;
    let _ = ctx.run(raw, |ctx| {
        ctx.set_visuals(egui::Visuals::dark());
        egui::CentralPanel::default()
            .frame(egui::Frame::default())
            .show(ctx, |ui| {
                app.draw_canvas(ui);
            });
    });
}

fn moved(pos: egui::Pos2) -> egui::Event {
    egui::Event::PointerMoved(pos)
}

fn pressed(pos: egui::Pos2) -> egui::Event {
    egui::Event::PointerButton {
        pos,
        button: egui::PointerButton::Primary,
        pressed: true,
        modifiers: egui::Modifiers::NONE,
    }
}

fn released(pos: egui::Pos2) -> egui::Event {
    egui::Event::PointerButton {
        pos,
        button: egui::PointerButton::Primary,
        pressed: false,
        modifiers: egui::Modifiers::NONE,
    }
}

/// App with identity viewport: screen space equals canvas space.
fn app_with_node(kind: NodeKind, pos: (f32, f32)) -> (FlowEditorApp, crate::types::NodeId) {
    let mut app = FlowEditorApp::default();
    app.canvas.offset = egui::Vec2::ZERO;
    app.canvas.zoom = 1.0;
    let node = FlowNode::new("Reply", pos, kind);
    let id = node.id;
    app.flow.nodes.insert(id, node);
    (app, id)
}

#[test]
fn dragging_between_handles_creates_an_edge() {
    let (mut app, target) = app_with_node(NodeKind::Message, (400.0, 300.0));
    let start = app.flow.start_node().unwrap();
    // Start node center is (100, 300); its output handle sits at (180, 300).
    let handle = egui::pos2(180.0, 300.0);

    let ctx = egui::Context::default();
    canvas_frame(&ctx, &mut app, vec![moved(handle)]);
    canvas_frame(&ctx, &mut app, vec![pressed(handle)]);
    canvas_frame(&ctx, &mut app, vec![moved(egui::pos2(188.0, 300.0))]);
    assert!(app.interaction.connection.is_connecting());

    canvas_frame(&ctx, &mut app, vec![moved(egui::pos2(400.0, 300.0))]);
    canvas_frame(&ctx, &mut app, vec![released(egui::pos2(400.0, 300.0))]);

    assert_eq!(app.interaction.connection, ConnectionDrag::Idle);
    assert_eq!(app.flow.edges.len(), 1);
    let edge = &app.flow.edges[0];
    assert_eq!(edge.source, start);
    assert_eq!(edge.target, target);
    assert_eq!(edge.source_handle, HandleKind::Output);
    assert!(app.file.has_unsaved_changes);
    assert!(app.history.can_undo());
}

#[test]
fn releasing_over_empty_canvas_cancels_the_connection() {
    let (mut app, _) = app_with_node(NodeKind::Message, (400.0, 300.0));
    let handle = egui::pos2(180.0, 300.0);

    let ctx = egui::Context::default();
    canvas_frame(&ctx, &mut app, vec![moved(handle)]);
    canvas_frame(&ctx, &mut app, vec![pressed(handle)]);
    canvas_frame(&ctx, &mut app, vec![moved(egui::pos2(188.0, 300.0))]);
    canvas_frame(&ctx, &mut app, vec![moved(egui::pos2(750.0, 600.0))]);
    canvas_frame(&ctx, &mut app, vec![released(egui::pos2(750.0, 600.0))]);

    assert_eq!(app.interaction.connection, ConnectionDrag::Idle);
    assert!(app.flow.edges.is_empty());
    assert!(!app.history.can_undo());
}

#[test]
fn releasing_over_the_start_node_creates_nothing() {
    // The start node has no input handle, so it can never be a target.
    let (mut app, source) = app_with_node(NodeKind::Message, (400.0, 300.0));
    let start_center = egui::pos2(100.0, 300.0);
    // Output handle of the message node.
    let handle = egui::pos2(480.0, 300.0);

    let ctx = egui::Context::default();
    canvas_frame(&ctx, &mut app, vec![moved(handle)]);
    canvas_frame(&ctx, &mut app, vec![pressed(handle)]);
    canvas_frame(&ctx, &mut app, vec![moved(egui::pos2(472.0, 300.0))]);
    canvas_frame(&ctx, &mut app, vec![moved(start_center)]);
    canvas_frame(&ctx, &mut app, vec![released(start_center)]);

    assert!(app.flow.edges.is_empty());
    assert_eq!(app.interaction.selected_node, Some(source));
}

#[test]
fn dropped_node_snaps_to_the_grid() {
    let (mut app, id) = app_with_node(NodeKind::Message, (200.0, 300.0));
    let center = egui::pos2(200.0, 300.0);

    let ctx = egui::Context::default();
    canvas_frame(&ctx, &mut app, vec![moved(center)]);
    canvas_frame(&ctx, &mut app, vec![pressed(center)]);
    canvas_frame(&ctx, &mut app, vec![moved(egui::pos2(208.0, 300.0))]);
    canvas_frame(&ctx, &mut app, vec![moved(egui::pos2(241.0, 18.0))]);
    canvas_frame(&ctx, &mut app, vec![released(egui::pos2(241.0, 18.0))]);

    // Near (241, 18) on a 40-unit grid: x rounds to 240, y rounds to 0 and
    // clamps up to the 20-unit floor.
    assert_eq!(app.flow.nodes[&id].position, (240.0, 20.0));

    // The whole drag is one undo entry restoring the original position.
    assert!(app.history.can_undo());
    app.perform_undo();
    assert_eq!(app.flow.nodes[&id].position, (200.0, 300.0));
}

#[test]
fn clicking_empty_canvas_clears_the_selection() {
    let (mut app, id) = app_with_node(NodeKind::Message, (400.0, 300.0));
    app.interaction.selected_node = Some(id);

    let empty = egui::pos2(900.0, 600.0);
    let ctx = egui::Context::default();
    canvas_frame(&ctx, &mut app, vec![moved(empty)]);
    canvas_frame(&ctx, &mut app, vec![pressed(empty), released(empty)]);

    assert_eq!(app.interaction.selected_node, None);
}

#[test]
fn second_click_on_a_selected_edge_asks_to_delete_it() {
    let (mut app, target) = app_with_node(NodeKind::Message, (600.0, 300.0));
    let start = app.flow.start_node().unwrap();
    let edge = crate::types::FlowEdge::new(start, target, HandleKind::Output);
    let edge_id = edge.id;
    app.flow.edges.push(edge);

    // Midway between the two cards, clear of both.
    let on_edge = egui::pos2(400.0, 300.0);
    let ctx = egui::Context::default();
    canvas_frame(&ctx, &mut app, vec![moved(on_edge)]);
    canvas_frame(&ctx, &mut app, vec![pressed(on_edge), released(on_edge)]);
    assert_eq!(app.interaction.selected_edge, Some(edge_id));
    assert_eq!(app.interaction.confirm_delete_edge, None);

    canvas_frame(&ctx, &mut app, vec![pressed(on_edge), released(on_edge)]);
    assert_eq!(app.interaction.confirm_delete_edge, Some(edge_id));
    // Nothing is deleted until the dialog is confirmed.
    assert_eq!(app.flow.edges.len(), 1);
}

#[test]
fn right_click_opens_the_add_node_menu_at_the_canvas_position() {
    let mut app = FlowEditorApp::default();
    app.canvas.offset = egui::Vec2::ZERO;
    app.canvas.zoom = 1.0;

    let pos = egui::pos2(500.0, 400.0);
    let ctx = egui::Context::default();
    canvas_frame(&ctx, &mut app, vec![moved(pos)]);
    canvas_frame(
        &ctx,
        &mut app,
        vec![
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Secondary,
                pressed: true,
                modifiers: egui::Modifiers::NONE,
            },
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Secondary,
                pressed: false,
                modifiers: egui::Modifiers::NONE,
            },
        ],
    );

    assert!(app.context_menu.show);
    assert_eq!(app.context_menu.canvas_pos, (500.0, 400.0));
}

#[test]
fn template_creation_snaps_and_is_undoable() {
    let mut app = FlowEditorApp::default();
    app.context_menu.canvas_pos = (241.0, 18.0);
    let template = crate::catalog::templates()
        .iter()
        .find(|t| t.name == "Condition")
        .unwrap();

    app.create_node_from_template(template);

    let id = app.interaction.selected_node.unwrap();
    assert_eq!(app.flow.nodes[&id].position, (240.0, 20.0));
    assert!(matches!(app.flow.nodes[&id].kind, NodeKind::Condition(_)));

    app.perform_undo();
    assert!(!app.flow.nodes.contains_key(&id));
    assert_eq!(app.interaction.selected_node, None);
}

#[test]
fn duplicating_a_node_clones_it_one_cell_away() {
    let (mut app, id) = app_with_node(
        NodeKind::Condition(ConditionConfig {
            variable: "intent".into(),
            operator: crate::types::ConditionOperator::Equals,
            value: "refund".into(),
        }),
        (400.0, 280.0),
    );

    app.duplicate_node(id);

    let copy_id = app.interaction.selected_node.unwrap();
    assert_ne!(copy_id, id);
    let copy = &app.flow.nodes[&copy_id];
    assert_eq!(copy.label, "Reply");
    assert_eq!(copy.kind, app.flow.nodes[&id].kind);
    assert_eq!(copy.position, (440.0, 320.0));
    // The copy arrives unwired.
    assert!(app.flow.edges.is_empty());

    app.perform_undo();
    assert!(!app.flow.nodes.contains_key(&copy_id));
    assert!(app.flow.nodes.contains_key(&id));
}

#[test]
fn the_start_node_cannot_be_duplicated() {
    let mut app = FlowEditorApp::default();
    let start = app.flow.start_node().unwrap();

    app.duplicate_node(start);

    assert_eq!(app.flow.nodes.len(), 1);
    assert!(!app.history.can_undo());
}

#[test]
fn delete_key_asks_for_confirmation_first() {
    let (mut app, id) = app_with_node(NodeKind::Message, (400.0, 300.0));
    app.interaction.selected_node = Some(id);

    let ctx = egui::Context::default();
    let mut raw = egui::RawInput::default();
    raw.events = vec![egui::Event::Key {
        key: egui::Key::Delete,
        physical_key: None,
        pressed: true,
        repeat: false,
        modifiers: egui::Modifiers::NONE,
    }];
    let _ = ctx.run(raw, |ctx| {
        app.handle_delete_key(ctx);
    });

    assert_eq!(app.interaction.confirm_delete_node, Some(id));
    assert!(app.flow.nodes.contains_key(&id));
}

#[test]
fn delete_key_ignores_the_start_node() {
    let mut app = FlowEditorApp::default();
    let start = app.flow.start_node().unwrap();
    app.interaction.selected_node = Some(start);

    let ctx = egui::Context::default();
    let mut raw = egui::RawInput::default();
    raw.events = vec![egui::Event::Key {
        key: egui::Key::Delete,
        physical_key: None,
        pressed: true,
        repeat: false,
        modifiers: egui::Modifiers::NONE,
    }];
    let _ = ctx.run(raw, |ctx| {
        app.handle_delete_key(ctx);
    });

    assert_eq!(app.interaction.confirm_delete_node, None);
}

#[test]
fn panel_editing_burst_flushes_as_a_single_undo_entry() {
    let (mut app, id) = app_with_node(
        NodeKind::Condition(ConditionConfig::default()),
        (400.0, 300.0),
    );

    // Open an editing burst, then make several live changes the way the
    // panel does: direct mutation with the originals parked in the patch.
    app.interaction.pending_patch = Some(PendingPatch {
        node_id: id,
        old_kind: app.flow.nodes[&id].kind.clone(),
        old_label: app.flow.nodes[&id].label.clone(),
        old_content: app.flow.nodes[&id].content.clone(),
    });
    {
        let node = app.flow.nodes.get_mut(&id).unwrap();
        node.label = "Is refund?".to_owned();
        node.kind = NodeKind::Condition(ConditionConfig {
            variable: "intent".into(),
            operator: crate::types::ConditionOperator::Equals,
            value: "refund".into(),
        });
    }
    app.flush_pending_patch();

    assert!(app.history.can_undo());
    app.perform_undo();

    // One undo reverts both the label and the configuration.
    let node = &app.flow.nodes[&id];
    assert_eq!(node.label, "Reply");
    assert_eq!(node.kind, NodeKind::Condition(ConditionConfig::default()));
    assert!(!app.history.can_undo());
}

#[test]
fn pending_patch_flushes_after_the_quiet_period() {
    let (mut app, id) = app_with_node(NodeKind::Message, (400.0, 300.0));
    app.interaction.pending_patch = Some(PendingPatch {
        node_id: id,
        old_kind: app.flow.nodes[&id].kind.clone(),
        old_label: app.flow.nodes[&id].label.clone(),
        old_content: None,
    });
    app.flow.nodes.get_mut(&id).unwrap().content = Some("Hello!".to_owned());
    app.interaction.last_edit_time = 10.0;

    // Still within the quiet period: nothing flushes.
    app.interaction.now = 10.5;
    app.tick_pending_patch();
    assert!(app.interaction.pending_patch.is_some());
    assert!(!app.history.can_undo());

    // Past it: the burst becomes one undo entry and the flash arms.
    app.interaction.now = 12.0;
    app.tick_pending_patch();
    assert!(app.interaction.pending_patch.is_none());
    assert!(app.history.can_undo());
    assert!(app.interaction.saved_flash_until > app.interaction.now);
}

#[test]
fn condition_fanout_replaces_through_the_command_path() {
    let (mut app, cond) = app_with_node(
        NodeKind::Condition(ConditionConfig::default()),
        (300.0, 300.0),
    );
    let b = FlowNode::new("b", (600.0, 200.0), NodeKind::Message);
    let c = FlowNode::new("c", (600.0, 400.0), NodeKind::Message);
    let (b_id, c_id) = (b.id, c.id);
    app.flow.nodes.insert(b_id, b);
    app.flow.nodes.insert(c_id, c);

    app.apply_command(GraphCommand::AddEdge {
        edge: crate::types::FlowEdge::new(cond, b_id, HandleKind::Yes),
    });
    app.apply_command(GraphCommand::AddEdge {
        edge: crate::types::FlowEdge::new(cond, c_id, HandleKind::Yes),
    });

    assert_eq!(app.flow.edges.len(), 1);
    assert_eq!(app.flow.edges[0].target, c_id);

    // Undoing the replacement restores the original yes-branch.
    app.perform_undo();
    assert_eq!(app.flow.edges.len(), 1);
    assert_eq!(app.flow.edges[0].target, b_id);
}

#[test]
fn undo_prunes_selection_of_removed_nodes() {
    let mut app = FlowEditorApp::default();
    let node = FlowNode::new("n", (400.0, 300.0), NodeKind::Message);
    let id = node.id;
    app.apply_command(GraphCommand::AddNode { node });
    app.interaction.selected_node = Some(id);

    app.perform_undo();
    assert!(!app.flow.nodes.contains_key(&id));
    assert_eq!(app.interaction.selected_node, None);
}
