//! Static display catalog for node types.
//!
//! Maps every [`NodeKind`] to its canvas styling and supplies the closed
//! list of templates the add-node context menu offers. Both matches are
//! exhaustive, so extending [`NodeKind`] forces this module to follow.

use crate::types::{
    ApiCallConfig, AssistantConfig, CarouselConfig, Channel, ChannelConnectorConfig,
    ChannelOutputConfig, ConditionConfig, CrmConfig, DatabaseConfig, DelayConfig, DtmfConfig,
    EventTriggerConfig, ExecuteFlowConfig, FunctionConfig, NodeKind, NotificationConfig,
    QuickReplyConfig, RaiseTicketConfig, RunWorkflowConfig, SafetyConfig, TextInputConfig,
    TicketingConfig, TransferConfig, VariableConfig,
};
use egui::Color32;

/// Visual styling of a node card on the canvas.
#[derive(Debug, Clone, Copy)]
pub struct NodeStyle {
    /// Short type title shown as the card subtitle.
    pub title: &'static str,
    /// Icon glyph shown beside the title.
    pub icon: &'static str,
    /// Card fill color.
    pub fill: Color32,
    /// Card border color.
    pub stroke: Color32,
}

const fn style_of(
    title: &'static str,
    icon: &'static str,
    fill: Color32,
    stroke: Color32,
) -> NodeStyle {
    NodeStyle {
        title,
        icon,
        fill,
        stroke,
    }
}

// Shared palette: one fill/stroke pair per family keeps the canvas readable.
const GREEN: (Color32, Color32) = (Color32::from_rgb(26, 58, 38), Color32::from_rgb(74, 222, 128));
const RED: (Color32, Color32) = (Color32::from_rgb(61, 28, 28), Color32::from_rgb(248, 113, 113));
const BLUE: (Color32, Color32) = (Color32::from_rgb(23, 41, 77), Color32::from_rgb(96, 165, 250));
const AMBER: (Color32, Color32) = (Color32::from_rgb(66, 50, 14), Color32::from_rgb(251, 191, 36));
const PURPLE: (Color32, Color32) =
    (Color32::from_rgb(46, 27, 78), Color32::from_rgb(167, 139, 250));
const TEAL: (Color32, Color32) = (Color32::from_rgb(17, 54, 54), Color32::from_rgb(45, 212, 191));
const GRAY: (Color32, Color32) = (Color32::from_rgb(41, 44, 51), Color32::from_rgb(148, 163, 184));

/// Display style for a node kind.
pub fn style(kind: &NodeKind) -> NodeStyle {
    match kind {
        NodeKind::Start => style_of("Start", "▶", GREEN.0, GREEN.1),
        NodeKind::End => style_of("End", "⏹", RED.0, RED.1),
        NodeKind::Message => style_of("Message", "💬", BLUE.0, BLUE.1),
        NodeKind::Condition(_) => style_of("Condition", "⑂", AMBER.0, AMBER.1),
        NodeKind::ApiCall(_) => style_of("API Call", "🌐", PURPLE.0, PURPLE.1),
        NodeKind::Transfer(_) => style_of("Transfer", "👤", TEAL.0, TEAL.1),
        NodeKind::Dtmf(_) => style_of("DTMF Menu", "🔢", BLUE.0, BLUE.1),
        NodeKind::Assistant(_) => style_of("Assistant", "✨", PURPLE.0, PURPLE.1),
        NodeKind::ChannelConnector(_) => style_of("Channel", "📨", TEAL.0, TEAL.1),
        NodeKind::Ticketing(_) => style_of("Ticketing", "🎫", AMBER.0, AMBER.1),
        NodeKind::Crm(_) => style_of("CRM", "📇", AMBER.0, AMBER.1),
        NodeKind::TextInput(_) => style_of("Text Input", "⌨", BLUE.0, BLUE.1),
        NodeKind::QuickReply(_) => style_of("Quick Reply", "⚡", BLUE.0, BLUE.1),
        NodeKind::Carousel(_) => style_of("Carousel", "🗂", BLUE.0, BLUE.1),
        NodeKind::ExecuteFlow(_) => style_of("Execute Flow", "↪", PURPLE.0, PURPLE.1),
        NodeKind::RaiseTicket(_) => style_of("Raise Ticket", "🏷", AMBER.0, AMBER.1),
        NodeKind::Database(_) => style_of("Database", "🗄", GRAY.0, GRAY.1),
        NodeKind::Function(_) => style_of("Function", "ƒ", GRAY.0, GRAY.1),
        NodeKind::Variable(_) => style_of("Variable", "𝑥", GRAY.0, GRAY.1),
        NodeKind::Delay(_) => style_of("Delay", "⏱", GRAY.0, GRAY.1),
        NodeKind::Notification(_) => style_of("Notification", "🔔", TEAL.0, TEAL.1),
        NodeKind::EventTrigger(_) => style_of("Event Trigger", "⚑", PURPLE.0, PURPLE.1),
        NodeKind::RunWorkflow(_) => style_of("Run Workflow", "⚙", PURPLE.0, PURPLE.1),
        NodeKind::ChannelOutput(_) => style_of("Channel Output", "📤", TEAL.0, TEAL.1),
        NodeKind::SafetyCheck(_) => style_of("Safety Check", "🛡", RED.0, RED.1),
    }
}

/// Menu grouping for node templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateGroup {
    /// Messages, inputs and other conversation steps.
    Conversation,
    /// Branching and flow control.
    Logic,
    /// Third-party connectors.
    Integrations,
    /// Backend automation steps.
    Automation,
}

impl TemplateGroup {
    /// All groups, in menu order.
    pub const ALL: [TemplateGroup; 4] = [
        TemplateGroup::Conversation,
        TemplateGroup::Logic,
        TemplateGroup::Integrations,
        TemplateGroup::Automation,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            TemplateGroup::Conversation => "Conversation",
            TemplateGroup::Logic => "Logic",
            TemplateGroup::Integrations => "Integrations",
            TemplateGroup::Automation => "Automation",
        }
    }
}

/// One entry of the add-node menu.
pub struct NodeTemplate {
    /// Display name in the menu and default node label.
    pub name: &'static str,
    /// Menu group.
    pub group: TemplateGroup,
    /// Factory for the default kind.
    pub make: fn() -> NodeKind,
}

/// The closed list of creatable node types. `Start` is deliberately absent:
/// a flow always has exactly one, seeded at creation.
pub fn templates() -> &'static [NodeTemplate] {
    use TemplateGroup::*;
    &[
        NodeTemplate { name: "Message", group: Conversation, make: || NodeKind::Message },
        NodeTemplate {
            name: "Text Input",
            group: Conversation,
            make: || NodeKind::TextInput(TextInputConfig::default()),
        },
        NodeTemplate {
            name: "Quick Reply",
            group: Conversation,
            make: || NodeKind::QuickReply(QuickReplyConfig::default()),
        },
        NodeTemplate {
            name: "Carousel",
            group: Conversation,
            make: || NodeKind::Carousel(CarouselConfig::default()),
        },
        NodeTemplate {
            name: "DTMF Menu",
            group: Conversation,
            make: || NodeKind::Dtmf(DtmfConfig::default()),
        },
        NodeTemplate {
            name: "Assistant",
            group: Conversation,
            make: || NodeKind::Assistant(AssistantConfig::default()),
        },
        NodeTemplate {
            name: "Condition",
            group: Logic,
            make: || NodeKind::Condition(ConditionConfig::default()),
        },
        NodeTemplate {
            name: "Variable",
            group: Logic,
            make: || NodeKind::Variable(VariableConfig::default()),
        },
        NodeTemplate {
            name: "Delay",
            group: Logic,
            make: || NodeKind::Delay(DelayConfig::default()),
        },
        NodeTemplate {
            name: "Execute Flow",
            group: Logic,
            make: || NodeKind::ExecuteFlow(ExecuteFlowConfig::default()),
        },
        NodeTemplate { name: "End", group: Logic, make: || NodeKind::End },
        NodeTemplate {
            name: "API Call",
            group: Integrations,
            make: || NodeKind::ApiCall(ApiCallConfig::default()),
        },
        NodeTemplate {
            name: "Channel Connector",
            group: Integrations,
            make: || {
                NodeKind::ChannelConnector(ChannelConnectorConfig {
                    channel: Channel::WhatsApp,
                    ..Default::default()
                })
            },
        },
        NodeTemplate {
            name: "Channel Output",
            group: Integrations,
            make: || NodeKind::ChannelOutput(ChannelOutputConfig::default()),
        },
        NodeTemplate {
            name: "Ticketing",
            group: Integrations,
            make: || NodeKind::Ticketing(TicketingConfig::default()),
        },
        NodeTemplate {
            name: "CRM",
            group: Integrations,
            make: || NodeKind::Crm(CrmConfig::default()),
        },
        NodeTemplate {
            name: "Transfer",
            group: Integrations,
            make: || NodeKind::Transfer(TransferConfig::default()),
        },
        NodeTemplate {
            name: "Raise Ticket",
            group: Integrations,
            make: || NodeKind::RaiseTicket(RaiseTicketConfig::default()),
        },
        NodeTemplate {
            name: "Run Workflow",
            group: Automation,
            make: || NodeKind::RunWorkflow(RunWorkflowConfig::default()),
        },
        NodeTemplate {
            name: "Database",
            group: Automation,
            make: || NodeKind::Database(DatabaseConfig::default()),
        },
        NodeTemplate {
            name: "Function",
            group: Automation,
            make: || NodeKind::Function(FunctionConfig::default()),
        },
        NodeTemplate {
            name: "Notification",
            group: Automation,
            make: || NodeKind::Notification(NotificationConfig::default()),
        },
        NodeTemplate {
            name: "Event Trigger",
            group: Automation,
            make: || NodeKind::EventTrigger(EventTriggerConfig::default()),
        },
        NodeTemplate {
            name: "Safety Check",
            group: Automation,
            make: || NodeKind::SafetyCheck(SafetyConfig::default()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_never_create_a_start_node() {
        for t in templates() {
            assert!(
                !matches!((t.make)(), NodeKind::Start),
                "template {} creates a start node",
                t.name
            );
        }
    }

    #[test]
    fn template_names_are_unique() {
        let mut names: Vec<&str> = templates().iter().map(|t| t.name).collect();
        let before = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn every_group_has_at_least_one_template() {
        for group in TemplateGroup::ALL {
            assert!(
                templates().iter().any(|t| t.group == group),
                "empty group {:?}",
                group
            );
        }
    }

    #[test]
    fn template_title_matches_catalog_style() {
        // Spot-check that the add-node menu and the canvas agree on names.
        for t in templates() {
            let kind = (t.make)();
            let s = style(&kind);
            assert!(!s.title.is_empty());
            assert!(!s.icon.is_empty());
        }
    }
}
