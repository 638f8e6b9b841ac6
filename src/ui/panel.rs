//! Properties side panel.
//!
//! Shows an editor for the current selection: a per-kind configuration form
//! for nodes, branch details for edges, and flow metadata when nothing is
//! selected.
//!
//! Node edits are applied to the graph immediately but coalesced into a
//! single undo entry per editing burst: the node's original values are
//! captured on the first change and flushed to the history after a quiet
//! period, or when the selection moves elsewhere. The flush also drives the
//! brief "Saved" indicator.

use crate::catalog;
use crate::commands::GraphCommand;
use crate::constants::PANEL_FLUSH_DELAY;
use crate::types::{
    ApiCallConfig, AssistantConfig, CarouselCard, CarouselConfig, Channel,
    ChannelConnectorConfig, ChannelOutputConfig, ConditionConfig, ConditionOperator, CrmConfig,
    CrmProvider, DatabaseConfig, DbOperation, DelayConfig, DelayUnit, DtmfBranch, DtmfConfig,
    EdgeId, EventTriggerConfig, ExecuteFlowConfig, FlowStatus, FunctionConfig, HttpMethod,
    InputValidation, NodeId, NodeKind, NotificationConfig, NotificationKind, PiiAction, PiiType,
    PolicyCategory, ProfanitySeverity, QuickReplyConfig, QuickReplyOption, RaiseTicketConfig,
    RiskAction, RunWorkflowConfig, SafetyConfig, TextInputConfig, TicketPriority,
    TicketingConfig, TicketingProvider, TopicAction, TransferConfig, TransferTeam,
    VariableAction, VariableConfig,
};
use crate::ui::state::{FlowEditorApp, PendingPatch};
use eframe::egui;

impl FlowEditorApp {
    /// Draws the right-hand properties panel.
    pub fn draw_properties_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("properties_panel")
            .resizable(true)
            .default_width(self.properties_panel_width)
            .min_width(260.0)
            .show(ctx, |ui| {
                self.properties_panel_width = ui.available_width();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    if let Some(node_id) = self.interaction.selected_node {
                        self.draw_node_properties(ui, node_id);
                    } else if let Some(edge_id) = self.interaction.selected_edge {
                        self.draw_edge_properties(ui, edge_id);
                    } else {
                        self.draw_flow_properties(ui);
                    }
                });
            });
    }

    /// Flushes the pending editing burst if the quiet period has elapsed.
    /// Called once per frame.
    pub fn tick_pending_patch(&mut self) {
        if self.interaction.pending_patch.is_some()
            && self.interaction.now - self.interaction.last_edit_time >= PANEL_FLUSH_DELAY
        {
            self.flush_pending_patch();
        }
    }

    /// Commits the pending editing burst as one undo entry. No-op when the
    /// burst is empty or the node has since been deleted.
    pub fn flush_pending_patch(&mut self) {
        let Some(pending) = self.interaction.pending_patch.take() else {
            return;
        };
        let Some(node) = self.flow.nodes.get(&pending.node_id) else {
            return;
        };

        let mut inverses = Vec::new();
        if node.kind != pending.old_kind {
            inverses.push(GraphCommand::PatchNode {
                id: pending.node_id,
                kind: pending.old_kind,
            });
        }
        if node.label != pending.old_label {
            inverses.push(GraphCommand::RenameNode {
                id: pending.node_id,
                label: pending.old_label,
            });
        }
        if node.content != pending.old_content {
            inverses.push(GraphCommand::SetContent {
                id: pending.node_id,
                content: pending.old_content,
            });
        }
        if inverses.is_empty() {
            return;
        }
        let inverse = if inverses.len() == 1 {
            inverses.remove(0)
        } else {
            GraphCommand::Batch(inverses)
        };
        self.history.record(inverse);
        self.interaction.saved_flash_until = self.interaction.now + 1.2;
    }

    fn draw_node_properties(&mut self, ui: &mut egui::Ui, node_id: NodeId) {
        let Some(node) = self.flow.nodes.get(&node_id) else {
            self.interaction.selected_node = None;
            return;
        };
        let original = node.clone();
        let mut draft = original.clone();
        let style = catalog::style(&draft.kind);
        let outputs = self.flow.workflow_outputs();

        ui.horizontal(|ui| {
            ui.heading(format!("{} {}", style.icon, style.title));
            if self.interaction.now < self.interaction.saved_flash_until {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.colored_label(egui::Color32::from_rgb(74, 222, 128), "Saved ✓");
                });
            }
        });
        ui.separator();

        ui.label("Label");
        ui.text_edit_singleline(&mut draft.label);

        if matches!(draft.kind, NodeKind::Message) {
            ui.add_space(6.0);
            ui.label("Message text");
            let mut content = draft.content.clone().unwrap_or_default();
            ui.add(
                egui::TextEdit::multiline(&mut content)
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            );
            token_buttons(ui, &mut content, &outputs);
            draft.content = if content.is_empty() { None } else { Some(content) };
        }

        ui.add_space(6.0);
        draw_kind_form(ui, &mut draft.kind, &outputs);

        if draft != original {
            self.stage_node_edit(&original, draft);
        }

        // The start node is permanent; everything else can be duplicated
        // and deleted here.
        if !matches!(original.kind, NodeKind::Start) {
            ui.add_space(12.0);
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Duplicate node").clicked() {
                    self.duplicate_node(node_id);
                }
                if ui
                    .button(
                        egui::RichText::new("Delete node")
                            .color(egui::Color32::from_rgb(248, 113, 113)),
                    )
                    .clicked()
                {
                    self.interaction.confirm_delete_node = Some(node_id);
                }
            });
        }
    }

    /// Applies a draft back to the graph, opening an editing burst if one is
    /// not already in progress for this node.
    fn stage_node_edit(&mut self, original: &crate::types::FlowNode, draft: crate::types::FlowNode) {
        let already_pending = self
            .interaction
            .pending_patch
            .as_ref()
            .is_some_and(|p| p.node_id == original.id);
        if !already_pending {
            self.flush_pending_patch();
            self.interaction.pending_patch = Some(PendingPatch {
                node_id: original.id,
                old_kind: original.kind.clone(),
                old_label: original.label.clone(),
                old_content: original.content.clone(),
            });
        }

        if let Some(node) = self.flow.nodes.get_mut(&original.id) {
            node.kind = draft.kind;
            node.label = draft.label;
            node.content = draft.content;
        }
        self.interaction.last_edit_time = self.interaction.now;
        self.file.has_unsaved_changes = true;
    }

    fn draw_edge_properties(&mut self, ui: &mut egui::Ui, edge_id: EdgeId) {
        let Some(edge) = self.flow.edge(edge_id).cloned() else {
            self.interaction.selected_edge = None;
            return;
        };

        ui.heading("Connection");
        ui.separator();

        let name_of = |id: NodeId| {
            self.flow
                .nodes
                .get(&id)
                .map(|n| n.label.clone())
                .unwrap_or_else(|| "(missing)".to_owned())
        };
        ui.label(format!("From: {}", name_of(edge.source)));
        ui.label(format!("To: {}", name_of(edge.target)));
        if let Some(branch) = edge.source_handle.default_label() {
            ui.label(format!("Branch: {branch}"));
        }
        if let Some(label) = &edge.label {
            ui.label(format!("Label: {label}"));
        }

        ui.add_space(12.0);
        if ui
            .button(egui::RichText::new("Delete connection").color(egui::Color32::from_rgb(248, 113, 113)))
            .clicked()
        {
            self.interaction.confirm_delete_edge = Some(edge_id);
        }
    }

    fn draw_flow_properties(&mut self, ui: &mut egui::Ui) {
        ui.heading("Flow");
        ui.separator();

        ui.label("Name");
        if ui.text_edit_singleline(&mut self.flow.name).changed() {
            self.file.has_unsaved_changes = true;
        }

        ui.add_space(6.0);
        let mut status = self.flow.status;
        combo(ui, "flow_status", "Status", &mut status, &FlowStatus::ALL, FlowStatus::label);
        if status != self.flow.status {
            self.flow.status = status;
            self.file.has_unsaved_changes = true;
        }

        ui.add_space(6.0);
        ui.label("Environment");
        if ui.text_edit_singleline(&mut self.flow.environment).changed() {
            self.file.has_unsaved_changes = true;
        }

        ui.add_space(10.0);
        ui.separator();
        ui.label(format!("Version: {}", self.flow.version));
        ui.label(format!(
            "{} nodes, {} connections",
            self.flow.nodes.len(),
            self.flow.edges.len()
        ));
        ui.add_space(6.0);
        ui.label(
            egui::RichText::new("Select a node or connection to edit it.")
                .italics()
                .weak(),
        );
    }
}

fn combo<T: Copy + PartialEq>(
    ui: &mut egui::Ui,
    id: &str,
    label: &str,
    value: &mut T,
    all: &[T],
    name: fn(T) -> &'static str,
) {
    ui.horizontal(|ui| {
        ui.label(label);
        egui::ComboBox::from_id_source(id)
            .selected_text(name(*value))
            .show_ui(ui, |ui| {
                for &option in all {
                    ui.selectable_value(value, option, name(option));
                }
            });
    });
}

fn text_row(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.text_edit_singleline(value);
}

fn multiline_row(ui: &mut egui::Ui, label: &str, value: &mut String, rows: usize) {
    ui.label(label);
    ui.add(
        egui::TextEdit::multiline(value)
            .desired_rows(rows)
            .desired_width(f32::INFINITY),
    );
}

/// Quick-insert buttons for `{{workflow.<name>}}` tokens declared by
/// run-workflow nodes elsewhere in the flow.
fn token_buttons(ui: &mut egui::Ui, target: &mut String, outputs: &[String]) {
    if outputs.is_empty() {
        return;
    }
    ui.label(egui::RichText::new("Insert workflow output").small().weak());
    ui.horizontal_wrapped(|ui| {
        for name in outputs {
            let token = format!("{{{{workflow.{name}}}}}");
            if ui.small_button(&token).clicked() {
                target.push_str(&token);
            }
        }
    });
}

fn drag_u32(ui: &mut egui::Ui, label: &str, value: &mut u32, range: std::ops::RangeInclusive<u32>) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(value).range(range));
    });
}

/// Membership checkboxes over a closed enum list backing a `Vec`.
fn vec_toggle<T: Copy + PartialEq>(
    ui: &mut egui::Ui,
    selected: &mut Vec<T>,
    all: &[T],
    name: fn(T) -> &'static str,
) {
    for &item in all {
        let mut on = selected.contains(&item);
        if ui.checkbox(&mut on, name(item)).changed() {
            if on {
                selected.push(item);
            } else {
                selected.retain(|x| *x != item);
            }
        }
    }
}

fn string_list(ui: &mut egui::Ui, id: &str, add_label: &str, items: &mut Vec<String>) {
    let mut remove = None;
    for (i, item) in items.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.push_id((id, i), |ui| {
                ui.text_edit_singleline(item);
            });
            if ui.small_button("✖").clicked() {
                remove = Some(i);
            }
        });
    }
    if let Some(i) = remove {
        items.remove(i);
    }
    if ui.small_button(add_label).clicked() {
        items.push(String::new());
    }
}

fn draw_kind_form(ui: &mut egui::Ui, kind: &mut NodeKind, outputs: &[String]) {
    match kind {
        NodeKind::Start | NodeKind::End | NodeKind::Message => {}
        NodeKind::Condition(cfg) => condition_form(ui, cfg),
        NodeKind::ApiCall(cfg) => api_call_form(ui, cfg),
        NodeKind::Transfer(cfg) => transfer_form(ui, cfg),
        NodeKind::Dtmf(cfg) => dtmf_form(ui, cfg),
        NodeKind::Assistant(cfg) => assistant_form(ui, cfg),
        NodeKind::ChannelConnector(cfg) => channel_connector_form(ui, cfg, outputs),
        NodeKind::Ticketing(cfg) => ticketing_form(ui, cfg),
        NodeKind::Crm(cfg) => crm_form(ui, cfg),
        NodeKind::TextInput(cfg) => text_input_form(ui, cfg),
        NodeKind::QuickReply(cfg) => quick_reply_form(ui, cfg),
        NodeKind::Carousel(cfg) => carousel_form(ui, cfg),
        NodeKind::ExecuteFlow(cfg) => execute_flow_form(ui, cfg),
        NodeKind::RaiseTicket(cfg) => raise_ticket_form(ui, cfg),
        NodeKind::Database(cfg) => database_form(ui, cfg),
        NodeKind::Function(cfg) => function_form(ui, cfg),
        NodeKind::Variable(cfg) => variable_form(ui, cfg),
        NodeKind::Delay(cfg) => delay_form(ui, cfg),
        NodeKind::Notification(cfg) => notification_form(ui, cfg),
        NodeKind::EventTrigger(cfg) => event_trigger_form(ui, cfg),
        NodeKind::RunWorkflow(cfg) => run_workflow_form(ui, cfg),
        NodeKind::ChannelOutput(cfg) => channel_output_form(ui, cfg, outputs),
        NodeKind::SafetyCheck(cfg) => safety_form(ui, cfg),
    }
}

fn condition_form(ui: &mut egui::Ui, cfg: &mut ConditionConfig) {
    text_row(ui, "Variable", &mut cfg.variable);
    combo(ui, "cond_op", "Operator", &mut cfg.operator, &ConditionOperator::ALL, ConditionOperator::label);
    text_row(ui, "Value", &mut cfg.value);
}

fn api_call_form(ui: &mut egui::Ui, cfg: &mut ApiCallConfig) {
    combo(ui, "http_method", "Method", &mut cfg.method, &HttpMethod::ALL, HttpMethod::label);
    text_row(ui, "URL", &mut cfg.url);
    multiline_row(ui, "Request body (JSON)", &mut cfg.body, 4);
}

fn transfer_form(ui: &mut egui::Ui, cfg: &mut TransferConfig) {
    combo(ui, "transfer_team", "Team", &mut cfg.team, &TransferTeam::ALL, TransferTeam::label);
}

fn dtmf_form(ui: &mut egui::Ui, cfg: &mut DtmfConfig) {
    multiline_row(ui, "Prompt", &mut cfg.prompt, 2);
    drag_u32(ui, "Timeout (s)", &mut cfg.timeout_secs, 1..=60);
    drag_u32(ui, "Max digits", &mut cfg.max_digits, 1..=16);

    ui.add_space(4.0);
    ui.label("Key branches");
    let mut remove = None;
    for (i, branch) in cfg.branches.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.push_id(("dtmf_branch", i), |ui| {
                ui.add(egui::TextEdit::singleline(&mut branch.key).desired_width(28.0));
                ui.text_edit_singleline(&mut branch.label);
            });
            if ui.small_button("✖").clicked() {
                remove = Some(i);
            }
        });
    }
    if let Some(i) = remove {
        cfg.branches.remove(i);
    }
    if ui.small_button("＋ Add key").clicked() {
        cfg.branches.push(DtmfBranch::default());
    }
}

fn assistant_form(ui: &mut egui::Ui, cfg: &mut AssistantConfig) {
    multiline_row(ui, "Persona", &mut cfg.persona, 3);
    text_row(ui, "Handoff condition", &mut cfg.handoff_condition);
}

fn channel_connector_form(ui: &mut egui::Ui, cfg: &mut ChannelConnectorConfig, outputs: &[String]) {
    combo(ui, "connector_channel", "Channel", &mut cfg.channel, &Channel::ALL, Channel::label);
    text_row(ui, "Recipient", &mut cfg.recipient);
    multiline_row(ui, "Template", &mut cfg.template, 3);
    token_buttons(ui, &mut cfg.template, outputs);
}

fn ticketing_form(ui: &mut egui::Ui, cfg: &mut TicketingConfig) {
    combo(ui, "ticketing_provider", "Provider", &mut cfg.provider, &TicketingProvider::ALL, TicketingProvider::label);
    text_row(ui, "Action", &mut cfg.action);
    text_row(ui, "Subject", &mut cfg.subject);
    combo(ui, "ticketing_priority", "Priority", &mut cfg.priority, &TicketPriority::ALL, TicketPriority::label);
    text_row(ui, "Assignee", &mut cfg.assignee);
    text_row(ui, "Tags", &mut cfg.tags);
}

fn crm_form(ui: &mut egui::Ui, cfg: &mut CrmConfig) {
    combo(ui, "crm_provider", "Provider", &mut cfg.provider, &CrmProvider::ALL, CrmProvider::label);
    text_row(ui, "Action", &mut cfg.action);
    text_row(ui, "Object type", &mut cfg.object_type);
    multiline_row(ui, "Field mapping", &mut cfg.field_mapping, 3);
}

fn text_input_form(ui: &mut egui::Ui, cfg: &mut TextInputConfig) {
    text_row(ui, "Placeholder", &mut cfg.placeholder);
    combo(ui, "input_validation", "Validation", &mut cfg.validation, &InputValidation::ALL, InputValidation::label);
    if cfg.validation == InputValidation::Regex {
        text_row(ui, "Pattern", &mut cfg.pattern);
    }
    ui.checkbox(&mut cfg.required, "Required");
}

fn quick_reply_form(ui: &mut egui::Ui, cfg: &mut QuickReplyConfig) {
    ui.label("Options");
    let mut remove = None;
    for (i, opt) in cfg.options.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.push_id(("qr_option", i), |ui| {
                ui.text_edit_singleline(&mut opt.label);
                ui.text_edit_singleline(&mut opt.value);
            });
            if ui.small_button("✖").clicked() {
                remove = Some(i);
            }
        });
    }
    if let Some(i) = remove {
        cfg.options.remove(i);
    }
    if ui.small_button("＋ Add option").clicked() {
        cfg.options.push(QuickReplyOption::default());
    }
    ui.checkbox(&mut cfg.allow_multiple, "Allow multiple selections");
}

fn carousel_form(ui: &mut egui::Ui, cfg: &mut CarouselConfig) {
    ui.label("Cards");
    let mut remove = None;
    for (i, card) in cfg.cards.iter_mut().enumerate() {
        ui.push_id(("carousel_card", i), |ui| {
            ui.group(|ui| {
                text_row(ui, "Title", &mut card.title);
                text_row(ui, "Subtitle", &mut card.subtitle);
                text_row(ui, "Image URL", &mut card.image_url);
                text_row(ui, "Button label", &mut card.button_label);
                if ui.small_button("Remove card").clicked() {
                    remove = Some(i);
                }
            });
        });
    }
    if let Some(i) = remove {
        cfg.cards.remove(i);
    }
    if ui.small_button("＋ Add card").clicked() {
        cfg.cards.push(CarouselCard::default());
    }
}

fn execute_flow_form(ui: &mut egui::Ui, cfg: &mut ExecuteFlowConfig) {
    text_row(ui, "Flow name", &mut cfg.flow_name);
    ui.checkbox(&mut cfg.return_after_completion, "Return after completion");
}

fn raise_ticket_form(ui: &mut egui::Ui, cfg: &mut RaiseTicketConfig) {
    combo(ui, "raise_priority", "Priority", &mut cfg.priority, &TicketPriority::ALL, TicketPriority::label);
    text_row(ui, "Department", &mut cfg.department);
    multiline_row(ui, "Message", &mut cfg.message, 3);
}

fn database_form(ui: &mut egui::Ui, cfg: &mut DatabaseConfig) {
    combo(ui, "db_operation", "Operation", &mut cfg.operation, &DbOperation::ALL, DbOperation::label);
    text_row(ui, "Table", &mut cfg.table);
    text_row(ui, "Fields", &mut cfg.fields);
    text_row(ui, "Condition", &mut cfg.condition);
}

fn function_form(ui: &mut egui::Ui, cfg: &mut FunctionConfig) {
    ui.label("Code");
    ui.add(
        egui::TextEdit::multiline(&mut cfg.code)
            .code_editor()
            .desired_rows(6)
            .desired_width(f32::INFINITY),
    );
    drag_u32(ui, "Timeout (s)", &mut cfg.timeout_secs, 1..=300);
}

fn variable_form(ui: &mut egui::Ui, cfg: &mut VariableConfig) {
    combo(ui, "var_action", "Action", &mut cfg.action, &VariableAction::ALL, VariableAction::label);
    text_row(ui, "Name", &mut cfg.name);
    match cfg.action {
        VariableAction::Set => text_row(ui, "Value", &mut cfg.value),
        VariableAction::Transform => text_row(ui, "Transform", &mut cfg.transform),
        VariableAction::Get => {}
    }
}

fn delay_form(ui: &mut egui::Ui, cfg: &mut DelayConfig) {
    drag_u32(ui, "Duration", &mut cfg.duration, 1..=86_400);
    combo(ui, "delay_unit", "Unit", &mut cfg.unit, &DelayUnit::ALL, DelayUnit::label);
}

fn notification_form(ui: &mut egui::Ui, cfg: &mut NotificationConfig) {
    combo(ui, "notify_kind", "Via", &mut cfg.kind, &NotificationKind::ALL, NotificationKind::label);
    text_row(ui, "Recipient", &mut cfg.recipient);
    text_row(ui, "Subject", &mut cfg.subject);
    multiline_row(ui, "Body", &mut cfg.body, 3);
}

fn event_trigger_form(ui: &mut egui::Ui, cfg: &mut EventTriggerConfig) {
    text_row(ui, "Event name", &mut cfg.event_name);
    multiline_row(ui, "Payload (JSON)", &mut cfg.payload, 3);
}

/// Shows the bound workflow read-only; editing the binding is an explicit
/// step so a stray click cannot detach downstream token references.
fn run_workflow_form(ui: &mut egui::Ui, cfg: &mut RunWorkflowConfig) {
    let edit_id = ui.id().with("wf_binding_edit");
    let mut editing = ui.data_mut(|d| *d.get_temp_mut_or_default::<bool>(edit_id));

    if editing {
        text_row(ui, "Workflow name", &mut cfg.workflow_name);
        ui.add_space(4.0);
        ui.label("Output variables");
        string_list(ui, "wf_output", "＋ Add output", &mut cfg.outputs);
        if ui.small_button("Done").clicked() {
            editing = false;
        }
    } else {
        ui.label(format!("Workflow: {}", workflow_binding_summary(cfg)));
        ui.label("Outputs");
        if cfg.outputs.is_empty() {
            ui.label(egui::RichText::new("(none declared)").weak());
        }
        for name in &cfg.outputs {
            ui.label(format!("{{{{workflow.{name}}}}}"));
        }
        if ui.small_button("Change binding").clicked() {
            editing = true;
        }
    }

    ui.data_mut(|d| d.insert_temp(edit_id, editing));
}

fn workflow_binding_summary(cfg: &RunWorkflowConfig) -> String {
    if cfg.workflow_name.is_empty() {
        "(not set)".to_owned()
    } else {
        cfg.workflow_name.clone()
    }
}

fn channel_output_form(ui: &mut egui::Ui, cfg: &mut ChannelOutputConfig, outputs: &[String]) {
    combo(ui, "out_channel", "Channel", &mut cfg.channel, &Channel::ALL, Channel::label);
    combo(ui, "out_format", "Format", &mut cfg.format, &crate::types::OutputFormat::ALL, crate::types::OutputFormat::label);
    multiline_row(ui, "Template", &mut cfg.template, 3);
    token_buttons(ui, &mut cfg.template, outputs);
}

fn safety_form(ui: &mut egui::Ui, cfg: &mut SafetyConfig) {
    combo(ui, "safety_bot", "Applies to", &mut cfg.bot_type, &crate::types::BotType::ALL, crate::types::BotType::label);

    egui::CollapsingHeader::new("Sentiment").show(ui, |ui| {
        ui.checkbox(&mut cfg.sentiment.enabled, "Enabled");
        ui.add(
            egui::Slider::new(&mut cfg.sentiment.threshold, 0.0..=1.0).text("Threshold"),
        );
    });

    egui::CollapsingHeader::new("PII").show(ui, |ui| {
        ui.checkbox(&mut cfg.pii.enabled, "Enabled");
        vec_toggle(ui, &mut cfg.pii.pii_types, &PiiType::ALL, PiiType::label);
        combo(ui, "pii_action", "On detection", &mut cfg.on_pii, &PiiAction::ALL, PiiAction::label);
    });

    egui::CollapsingHeader::new("Policy").show(ui, |ui| {
        ui.checkbox(&mut cfg.policy.enabled, "Enabled");
        vec_toggle(ui, &mut cfg.policy.categories, &PolicyCategory::ALL, PolicyCategory::label);
    });

    egui::CollapsingHeader::new("Profanity").show(ui, |ui| {
        ui.checkbox(&mut cfg.profanity.enabled, "Enabled");
        combo(ui, "profanity_severity", "Severity", &mut cfg.profanity.severity, &ProfanitySeverity::ALL, ProfanitySeverity::label);
        drag_u32(ui, "Grace count", &mut cfg.profanity.grace_count, 0..=10);
    });

    egui::CollapsingHeader::new("Topic guardrails").show(ui, |ui| {
        ui.checkbox(&mut cfg.topics.enabled, "Enabled");
        string_list(ui, "blocked_topic", "＋ Add topic", &mut cfg.topics.blocked_topics);
        combo(ui, "topic_action", "On detection", &mut cfg.on_sensitive_topic, &TopicAction::ALL, TopicAction::label);
    });

    ui.add_space(4.0);
    combo(ui, "high_risk", "On high risk", &mut cfg.on_high_risk, &RiskAction::ALL, RiskAction::label);
    combo(ui, "medium_risk", "On medium risk", &mut cfg.on_medium_risk, &RiskAction::ALL, RiskAction::label);

    ui.add_space(4.0);
    ui.label("Custom rules");
    ui.horizontal_wrapped(|ui| {
        for (name, rule) in SAFETY_RULE_TEMPLATES {
            if ui.small_button(*name).clicked() {
                cfg.custom_rules.push((*rule).to_owned());
            }
        }
    });
    string_list(ui, "custom_rule", "＋ Add rule", &mut cfg.custom_rules);
    ui.checkbox(&mut cfg.audit_logging, "Audit logging");
}

/// Canned rules the safety form offers as one-click additions, as
/// (button label, rule text) pairs.
const SAFETY_RULE_TEMPLATES: &[(&str, &str)] = &[
    (
        "No pricing promises",
        "Never promise discounts, refunds, or pricing changes",
    ),
    (
        "No legal advice",
        "Do not give legal advice; transfer to a human agent",
    ),
    (
        "No competitor talk",
        "Do not discuss or compare against competitor products",
    ),
];
