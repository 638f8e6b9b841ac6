//! Core data model for flows: nodes, edges, and the flow aggregate.
//!
//! A flow is a decision graph edited on the canvas. Every node carries a
//! [`NodeKind`] — a closed tagged union whose variants own their own
//! configuration structs, so a node can never be observed with a payload
//! that belongs to a different type.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for flow nodes.
pub type NodeId = Uuid;

/// Unique identifier for flow edges.
pub type EdgeId = Uuid;

/// Named connection point on a node from which an edge originates.
///
/// Condition nodes expose `Yes` and `No`; every other non-terminal node
/// exposes a single `Output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    /// The single default output handle.
    Output,
    /// Success branch of a condition node.
    Yes,
    /// Failure branch of a condition node.
    No,
}

impl HandleKind {
    /// Human-readable edge label conventionally attached to this handle.
    pub fn default_label(self) -> Option<&'static str> {
        match self {
            HandleKind::Output => None,
            HandleKind::Yes => Some("Yes"),
            HandleKind::No => Some("No"),
        }
    }
}

/// Comparison operator for condition nodes and edge guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    /// Exact equality.
    #[default]
    Equals,
    /// Substring containment.
    Contains,
    /// Numeric greater-than.
    GreaterThan,
    /// Numeric less-than.
    LessThan,
}

impl ConditionOperator {
    /// All operators, in display order.
    pub const ALL: [ConditionOperator; 4] = [
        ConditionOperator::Equals,
        ConditionOperator::Contains,
        ConditionOperator::GreaterThan,
        ConditionOperator::LessThan,
    ];

    /// Display name used by the properties panel.
    pub fn label(self) -> &'static str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::Contains => "contains",
            ConditionOperator::GreaterThan => "greater than",
            ConditionOperator::LessThan => "less than",
        }
    }
}

/// Structured `{field, operator, value}` guard carried by some workflow edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EdgeCondition {
    /// Variable or field the guard reads.
    pub field: String,
    /// Comparison operator.
    pub operator: ConditionOperator,
    /// Comparison value.
    pub value: String,
}

/// Directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    /// Unique identifier for this edge.
    pub id: EdgeId,
    /// Source node id.
    pub source: NodeId,
    /// Target node id.
    pub target: NodeId,
    /// Which of the source node's output handles the edge leaves from.
    pub source_handle: HandleKind,
    /// Optional display label ("Yes"/"No" for condition branches).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Optional structured guard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<EdgeCondition>,
}

impl FlowEdge {
    /// Creates a new edge with a fresh id and the handle's default label.
    pub fn new(source: NodeId, target: NodeId, source_handle: HandleKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            target,
            source_handle,
            label: source_handle.default_label().map(str::to_owned),
            condition: None,
        }
    }
}

// --- Per-kind configuration payloads -------------------------------------

/// Configuration for condition nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConditionConfig {
    /// Name of the variable being tested.
    pub variable: String,
    /// Comparison operator.
    pub operator: ConditionOperator,
    /// Comparison value.
    pub value: String,
}

/// HTTP method for API-call nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// HTTP GET.
    #[default]
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP PATCH.
    Patch,
    /// HTTP DELETE.
    Delete,
}

impl HttpMethod {
    /// All methods, in display order.
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    /// Uppercase method name.
    pub fn label(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Configuration for API-call nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ApiCallConfig {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request URL.
    pub url: String,
    /// JSON request body, kept as text so partially-typed JSON is preserved.
    pub body: String,
}

/// Team a conversation can be handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransferTeam {
    /// General support queue.
    #[default]
    Support,
    /// Sales team.
    Sales,
    /// Billing team.
    Billing,
    /// Technical escalation.
    Technical,
}

impl TransferTeam {
    /// All teams, in display order.
    pub const ALL: [TransferTeam; 4] = [
        TransferTeam::Support,
        TransferTeam::Sales,
        TransferTeam::Billing,
        TransferTeam::Technical,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            TransferTeam::Support => "Support",
            TransferTeam::Sales => "Sales",
            TransferTeam::Billing => "Billing",
            TransferTeam::Technical => "Technical",
        }
    }
}

/// Configuration for transfer-to-agent nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TransferConfig {
    /// Target team.
    pub team: TransferTeam,
}

/// A single DTMF key-to-branch mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DtmfBranch {
    /// Key the caller presses ("0"–"9", "*", "#").
    pub key: String,
    /// Label describing the branch.
    pub label: String,
}

/// Configuration for DTMF (voice keypad) menu nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DtmfConfig {
    /// Prompt spoken to the caller.
    pub prompt: String,
    /// Seconds to wait for input.
    pub timeout_secs: u32,
    /// Maximum number of digits to collect.
    pub max_digits: u32,
    /// Key-to-branch mappings.
    pub branches: Vec<DtmfBranch>,
}

impl Default for DtmfConfig {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            timeout_secs: 5,
            max_digits: 1,
            branches: Vec::new(),
        }
    }
}

/// Configuration for AI-assistant nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AssistantConfig {
    /// Persona the assistant speaks as.
    pub persona: String,
    /// Condition under which the assistant hands off to a human.
    pub handoff_condition: String,
}

/// Messaging channel a connector or output node targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// WhatsApp Business.
    #[default]
    WhatsApp,
    /// Slack workspace.
    Slack,
    /// Telegram bot.
    Telegram,
    /// Microsoft Teams.
    Teams,
}

impl Channel {
    /// All channels, in display order.
    pub const ALL: [Channel; 4] = [
        Channel::WhatsApp,
        Channel::Slack,
        Channel::Telegram,
        Channel::Teams,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            Channel::WhatsApp => "WhatsApp",
            Channel::Slack => "Slack",
            Channel::Telegram => "Telegram",
            Channel::Teams => "Teams",
        }
    }
}

/// Configuration for channel-connector nodes (send into a channel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChannelConnectorConfig {
    /// Channel to deliver into.
    pub channel: Channel,
    /// Recipient or channel identifier (phone number, channel id, chat id).
    pub recipient: String,
    /// Message template, may contain `{{workflow.<name>}}` tokens.
    pub template: String,
}

/// Ticketing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketingProvider {
    /// Zendesk.
    #[default]
    Zendesk,
    /// Freshdesk.
    Freshdesk,
}

impl TicketingProvider {
    /// All providers, in display order.
    pub const ALL: [TicketingProvider; 2] =
        [TicketingProvider::Zendesk, TicketingProvider::Freshdesk];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            TicketingProvider::Zendesk => "Zendesk",
            TicketingProvider::Freshdesk => "Freshdesk",
        }
    }
}

/// Priority level shared by ticketing nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    /// Low priority.
    Low,
    /// Default priority.
    #[default]
    Normal,
    /// High priority.
    High,
    /// Urgent priority.
    Urgent,
}

impl TicketPriority {
    /// All priorities, in display order.
    pub const ALL: [TicketPriority; 4] = [
        TicketPriority::Low,
        TicketPriority::Normal,
        TicketPriority::High,
        TicketPriority::Urgent,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            TicketPriority::Low => "Low",
            TicketPriority::Normal => "Normal",
            TicketPriority::High => "High",
            TicketPriority::Urgent => "Urgent",
        }
    }
}

/// Configuration for ticketing-connector nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TicketingConfig {
    /// Backend system.
    pub provider: TicketingProvider,
    /// Action to perform ("create", "update", "close", ...).
    pub action: String,
    /// Ticket subject.
    pub subject: String,
    /// Ticket priority.
    pub priority: TicketPriority,
    /// Assignee (agent or group).
    pub assignee: String,
    /// Comma-separated tags.
    pub tags: String,
}

/// CRM backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrmProvider {
    /// Zoho CRM.
    #[default]
    Zoho,
    /// Salesforce.
    Salesforce,
    /// HubSpot.
    Hubspot,
}

impl CrmProvider {
    /// All providers, in display order.
    pub const ALL: [CrmProvider; 3] =
        [CrmProvider::Zoho, CrmProvider::Salesforce, CrmProvider::Hubspot];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            CrmProvider::Zoho => "Zoho",
            CrmProvider::Salesforce => "Salesforce",
            CrmProvider::Hubspot => "HubSpot",
        }
    }
}

/// Configuration for CRM-connector nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CrmConfig {
    /// Backend system.
    pub provider: CrmProvider,
    /// Action to perform ("create", "update", "lookup", ...).
    pub action: String,
    /// Object type the action targets ("lead", "contact", "deal", ...).
    pub object_type: String,
    /// JSON field mapping, kept as text for free-form editing.
    pub field_mapping: String,
}

/// Validation applied to a text-input node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputValidation {
    /// Accept anything.
    #[default]
    None,
    /// Must look like an email address.
    Email,
    /// Must look like a phone number.
    Phone,
    /// Must parse as a number.
    Number,
    /// Must match a custom regex pattern.
    Regex,
}

impl InputValidation {
    /// All validation kinds, in display order.
    pub const ALL: [InputValidation; 5] = [
        InputValidation::None,
        InputValidation::Email,
        InputValidation::Phone,
        InputValidation::Number,
        InputValidation::Regex,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            InputValidation::None => "None",
            InputValidation::Email => "Email",
            InputValidation::Phone => "Phone",
            InputValidation::Number => "Number",
            InputValidation::Regex => "Regex",
        }
    }
}

/// Configuration for text-input nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextInputConfig {
    /// Placeholder shown in the input field.
    pub placeholder: String,
    /// Validation applied to the reply.
    pub validation: InputValidation,
    /// Regex pattern, used when `validation` is [`InputValidation::Regex`].
    pub pattern: String,
    /// Whether an answer is required before the flow continues.
    pub required: bool,
}

/// One selectable option of a quick-reply node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QuickReplyOption {
    /// Text shown on the button.
    pub label: String,
    /// Value stored when the option is chosen.
    pub value: String,
}

/// Configuration for quick-reply nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QuickReplyConfig {
    /// Options presented to the user.
    pub options: Vec<QuickReplyOption>,
    /// Whether multiple options may be selected.
    pub allow_multiple: bool,
}

/// One card of a carousel node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CarouselCard {
    /// Card title.
    pub title: String,
    /// Card subtitle.
    pub subtitle: String,
    /// Image URL.
    pub image_url: String,
    /// Label of the card's action button.
    pub button_label: String,
}

/// Configuration for carousel nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CarouselConfig {
    /// Cards shown in the carousel.
    pub cards: Vec<CarouselCard>,
}

/// Configuration for execute-flow nodes (call another flow).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExecuteFlowConfig {
    /// Display name of the target flow.
    pub flow_name: String,
    /// Id of the target flow, when bound.
    pub flow_id: Option<Uuid>,
    /// Whether control returns here after the sub-flow completes.
    pub return_after_completion: bool,
}

/// Configuration for raise-ticket nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RaiseTicketConfig {
    /// Ticket priority.
    pub priority: TicketPriority,
    /// Department the ticket is routed to.
    pub department: String,
    /// Ticket body.
    pub message: String,
}

/// Database operation performed by a database node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DbOperation {
    /// Read a single record.
    #[default]
    Read,
    /// Insert a record.
    Write,
    /// Update matching records.
    Update,
    /// Delete matching records.
    Delete,
    /// Free-form query.
    Query,
}

impl DbOperation {
    /// All operations, in display order.
    pub const ALL: [DbOperation; 5] = [
        DbOperation::Read,
        DbOperation::Write,
        DbOperation::Update,
        DbOperation::Delete,
        DbOperation::Query,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            DbOperation::Read => "Read",
            DbOperation::Write => "Write",
            DbOperation::Update => "Update",
            DbOperation::Delete => "Delete",
            DbOperation::Query => "Query",
        }
    }
}

/// Configuration for database nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    /// Operation to perform.
    pub operation: DbOperation,
    /// Target table.
    pub table: String,
    /// Comma-separated field list.
    pub fields: String,
    /// Condition string ("status = 'open'").
    pub condition: String,
}

/// Configuration for custom-function nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionConfig {
    /// Code executed by the platform's function runner.
    pub code: String,
    /// Execution timeout in seconds.
    pub timeout_secs: u32,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            code: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Action a variable node performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VariableAction {
    /// Assign a value.
    #[default]
    Set,
    /// Read a value.
    Get,
    /// Apply a transform expression.
    Transform,
}

impl VariableAction {
    /// All actions, in display order.
    pub const ALL: [VariableAction; 3] = [
        VariableAction::Set,
        VariableAction::Get,
        VariableAction::Transform,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            VariableAction::Set => "Set",
            VariableAction::Get => "Get",
            VariableAction::Transform => "Transform",
        }
    }
}

/// Configuration for variable nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VariableConfig {
    /// What to do with the variable.
    pub action: VariableAction,
    /// Variable name.
    pub name: String,
    /// Value to assign (for `Set`).
    pub value: String,
    /// Transform expression (for `Transform`).
    pub transform: String,
}

/// Time unit for delay nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DelayUnit {
    /// Seconds.
    #[default]
    Seconds,
    /// Minutes.
    Minutes,
    /// Hours.
    Hours,
}

impl DelayUnit {
    /// All units, in display order.
    pub const ALL: [DelayUnit; 3] = [DelayUnit::Seconds, DelayUnit::Minutes, DelayUnit::Hours];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            DelayUnit::Seconds => "Seconds",
            DelayUnit::Minutes => "Minutes",
            DelayUnit::Hours => "Hours",
        }
    }
}

/// Configuration for delay nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayConfig {
    /// How long to wait.
    pub duration: u32,
    /// Unit of `duration`.
    pub unit: DelayUnit,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            duration: 5,
            unit: DelayUnit::Seconds,
        }
    }
}

/// Delivery mechanism for notification nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Email.
    #[default]
    Email,
    /// SMS text message.
    Sms,
    /// Mobile push notification.
    Push,
    /// Webhook POST.
    Webhook,
}

impl NotificationKind {
    /// All kinds, in display order.
    pub const ALL: [NotificationKind; 4] = [
        NotificationKind::Email,
        NotificationKind::Sms,
        NotificationKind::Push,
        NotificationKind::Webhook,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            NotificationKind::Email => "Email",
            NotificationKind::Sms => "SMS",
            NotificationKind::Push => "Push",
            NotificationKind::Webhook => "Webhook",
        }
    }
}

/// Configuration for notification nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NotificationConfig {
    /// Delivery mechanism.
    pub kind: NotificationKind,
    /// Recipient address, number or URL.
    pub recipient: String,
    /// Subject line (email/push).
    pub subject: String,
    /// Message body.
    pub body: String,
}

/// Configuration for event-trigger nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EventTriggerConfig {
    /// Name of the emitted event.
    pub event_name: String,
    /// JSON payload, kept as text for free-form editing.
    pub payload: String,
}

/// Configuration for run-workflow nodes (bind a backend workflow).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RunWorkflowConfig {
    /// Display name of the bound workflow.
    pub workflow_name: String,
    /// Id of the bound workflow, when bound.
    pub workflow_id: Option<Uuid>,
    /// Output variables the workflow declares; offered to message nodes as
    /// `{{workflow.<name>}}` tokens.
    pub outputs: Vec<String>,
}

/// Formatting mode for channel-output nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Plain text.
    #[default]
    PlainText,
    /// Markdown.
    Markdown,
    /// Channel-native rich blocks.
    Rich,
}

impl OutputFormat {
    /// All formats, in display order.
    pub const ALL: [OutputFormat; 3] = [
        OutputFormat::PlainText,
        OutputFormat::Markdown,
        OutputFormat::Rich,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::PlainText => "Plain text",
            OutputFormat::Markdown => "Markdown",
            OutputFormat::Rich => "Rich",
        }
    }
}

/// Configuration for channel-output nodes (formatted send on a channel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChannelOutputConfig {
    /// Channel the output is rendered for.
    pub channel: Channel,
    /// Formatting mode.
    pub format: OutputFormat,
    /// Message template.
    pub template: String,
}

// --- Safety check ---------------------------------------------------------

/// Which bot surface a safety-check node applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BotType {
    /// Voice bots only.
    Voice,
    /// Chat bots only.
    Chat,
    /// Both surfaces.
    #[default]
    Both,
}

impl BotType {
    /// All bot types, in display order.
    pub const ALL: [BotType; 3] = [BotType::Voice, BotType::Chat, BotType::Both];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            BotType::Voice => "Voice",
            BotType::Chat => "Chat",
            BotType::Both => "Both",
        }
    }
}

/// Category of personally identifiable information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiType {
    /// Email addresses.
    Email,
    /// Phone numbers.
    Phone,
    /// Credit card numbers.
    CreditCard,
    /// Government id numbers.
    GovernmentId,
    /// Street addresses.
    Address,
}

impl PiiType {
    /// All PII categories, in display order.
    pub const ALL: [PiiType; 5] = [
        PiiType::Email,
        PiiType::Phone,
        PiiType::CreditCard,
        PiiType::GovernmentId,
        PiiType::Address,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            PiiType::Email => "Email",
            PiiType::Phone => "Phone",
            PiiType::CreditCard => "Credit card",
            PiiType::GovernmentId => "Government ID",
            PiiType::Address => "Address",
        }
    }
}

/// Policy-violation category checked by the policy risk check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyCategory {
    /// Harassment or hate.
    Harassment,
    /// Violence or threats.
    Violence,
    /// Self-harm content.
    SelfHarm,
    /// Medical advice.
    MedicalAdvice,
    /// Legal advice.
    LegalAdvice,
    /// Financial advice.
    FinancialAdvice,
}

impl PolicyCategory {
    /// All categories, in display order.
    pub const ALL: [PolicyCategory; 6] = [
        PolicyCategory::Harassment,
        PolicyCategory::Violence,
        PolicyCategory::SelfHarm,
        PolicyCategory::MedicalAdvice,
        PolicyCategory::LegalAdvice,
        PolicyCategory::FinancialAdvice,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            PolicyCategory::Harassment => "Harassment",
            PolicyCategory::Violence => "Violence",
            PolicyCategory::SelfHarm => "Self-harm",
            PolicyCategory::MedicalAdvice => "Medical advice",
            PolicyCategory::LegalAdvice => "Legal advice",
            PolicyCategory::FinancialAdvice => "Financial advice",
        }
    }
}

/// Profanity severity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProfanitySeverity {
    /// Flag even mild profanity.
    Low,
    /// Flag moderate profanity.
    #[default]
    Medium,
    /// Flag only severe profanity.
    High,
}

impl ProfanitySeverity {
    /// All severities, in display order.
    pub const ALL: [ProfanitySeverity; 3] = [
        ProfanitySeverity::Low,
        ProfanitySeverity::Medium,
        ProfanitySeverity::High,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            ProfanitySeverity::Low => "Low",
            ProfanitySeverity::Medium => "Medium",
            ProfanitySeverity::High => "High",
        }
    }
}

/// Sentiment risk check settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentCheck {
    /// Whether the check runs.
    pub enabled: bool,
    /// Negative-sentiment score above which the response is flagged, 0..=1.
    pub threshold: f32,
}

impl Default for SentimentCheck {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: 0.7,
        }
    }
}

/// PII risk check settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PiiCheck {
    /// Whether the check runs.
    pub enabled: bool,
    /// PII categories to detect.
    pub pii_types: Vec<PiiType>,
}

/// Policy-violation risk check settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PolicyCheck {
    /// Whether the check runs.
    pub enabled: bool,
    /// Policy categories to detect.
    pub categories: Vec<PolicyCategory>,
}

/// Profanity risk check settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfanityCheck {
    /// Whether the check runs.
    pub enabled: bool,
    /// Severity threshold.
    pub severity: ProfanitySeverity,
    /// Number of flagged responses tolerated before the action fires.
    pub grace_count: u32,
}

impl Default for ProfanityCheck {
    fn default() -> Self {
        Self {
            enabled: false,
            severity: ProfanitySeverity::Medium,
            grace_count: 1,
        }
    }
}

/// Topic-guardrail risk check settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TopicGuardrail {
    /// Whether the check runs.
    pub enabled: bool,
    /// Free-text list of blocked topics.
    pub blocked_topics: Vec<String>,
}

/// Action taken when a high- or medium-risk response is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiskAction {
    /// Block the response entirely.
    #[default]
    Block,
    /// Rephrase and retry.
    Rephrase,
    /// Escalate to a human agent.
    EscalateHuman,
    /// Let it through but record it.
    LogOnly,
}

impl RiskAction {
    /// All actions, in display order.
    pub const ALL: [RiskAction; 4] = [
        RiskAction::Block,
        RiskAction::Rephrase,
        RiskAction::EscalateHuman,
        RiskAction::LogOnly,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            RiskAction::Block => "Block response",
            RiskAction::Rephrase => "Rephrase",
            RiskAction::EscalateHuman => "Escalate to human",
            RiskAction::LogOnly => "Log only",
        }
    }
}

/// Action taken when PII is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PiiAction {
    /// Mask the detected spans.
    #[default]
    Mask,
    /// Block the response.
    Block,
    /// Allow unchanged.
    Allow,
}

impl PiiAction {
    /// All actions, in display order.
    pub const ALL: [PiiAction; 3] = [PiiAction::Mask, PiiAction::Block, PiiAction::Allow];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            PiiAction::Mask => "Mask",
            PiiAction::Block => "Block",
            PiiAction::Allow => "Allow",
        }
    }
}

/// Action taken when a sensitive topic is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TopicAction {
    /// Deflect with a canned response.
    #[default]
    Deflect,
    /// Block the response.
    Block,
    /// Transfer to a human agent.
    Transfer,
}

impl TopicAction {
    /// All actions, in display order.
    pub const ALL: [TopicAction; 3] =
        [TopicAction::Deflect, TopicAction::Block, TopicAction::Transfer];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            TopicAction::Deflect => "Deflect",
            TopicAction::Block => "Block",
            TopicAction::Transfer => "Transfer",
        }
    }
}

/// Configuration for safety-check nodes: content-moderation policy applied
/// to bot responses before they are delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SafetyConfig {
    /// Which bot surface the checks apply to.
    pub bot_type: BotType,
    /// Sentiment risk check.
    pub sentiment: SentimentCheck,
    /// PII risk check.
    pub pii: PiiCheck,
    /// Policy-violation risk check.
    pub policy: PolicyCheck,
    /// Profanity risk check.
    pub profanity: ProfanityCheck,
    /// Topic-guardrail risk check.
    pub topics: TopicGuardrail,
    /// Action on high-risk responses.
    pub on_high_risk: RiskAction,
    /// Action on medium-risk responses.
    pub on_medium_risk: RiskAction,
    /// Action when PII is detected.
    pub on_pii: PiiAction,
    /// Action when a sensitive topic is detected.
    pub on_sensitive_topic: TopicAction,
    /// Free-text custom moderation rules.
    pub custom_rules: Vec<String>,
    /// Whether every check result is written to the audit log.
    pub audit_logging: bool,
}

// --- Node kind ------------------------------------------------------------

/// The closed set of node types, each owning its configuration payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "snake_case")]
pub enum NodeKind {
    /// Entry point; exactly one per flow, cannot be deleted, has no input.
    Start,
    /// Terminal node; has no output handles.
    End,
    /// Sends the node's `content` text, with `{{workflow.<name>}}` tokens.
    Message,
    /// Two-way branch on a variable comparison.
    Condition(ConditionConfig),
    /// HTTP call to an external API.
    ApiCall(ApiCallConfig),
    /// Hand the conversation to a human team.
    Transfer(TransferConfig),
    /// Voice keypad menu.
    Dtmf(DtmfConfig),
    /// AI-assistant turn with handoff condition.
    Assistant(AssistantConfig),
    /// Send into a messaging channel.
    ChannelConnector(ChannelConnectorConfig),
    /// Ticketing-system action.
    Ticketing(TicketingConfig),
    /// CRM action.
    Crm(CrmConfig),
    /// Collect free-text input with validation.
    TextInput(TextInputConfig),
    /// Present quick-reply buttons.
    QuickReply(QuickReplyConfig),
    /// Present a card carousel.
    Carousel(CarouselConfig),
    /// Invoke another flow.
    ExecuteFlow(ExecuteFlowConfig),
    /// Open a support ticket.
    RaiseTicket(RaiseTicketConfig),
    /// Read or write platform data.
    Database(DatabaseConfig),
    /// Run a custom function.
    Function(FunctionConfig),
    /// Set, get, or transform a conversation variable.
    Variable(VariableConfig),
    /// Pause the flow.
    Delay(DelayConfig),
    /// Send an out-of-band notification.
    Notification(NotificationConfig),
    /// Emit a platform event.
    EventTrigger(EventTriggerConfig),
    /// Invoke a bound backend workflow and expose its outputs.
    RunWorkflow(RunWorkflowConfig),
    /// Formatted channel output.
    ChannelOutput(ChannelOutputConfig),
    /// Content-moderation policy node.
    SafetyCheck(SafetyConfig),
}

impl NodeKind {
    /// Whether nodes of this kind accept incoming edges.
    pub fn has_input(&self) -> bool {
        !matches!(self, NodeKind::Start)
    }

    /// The output handles nodes of this kind expose, in rendering order.
    pub fn output_handles(&self) -> &'static [HandleKind] {
        match self {
            NodeKind::End => &[],
            NodeKind::Condition(_) => &[HandleKind::Yes, HandleKind::No],
            _ => &[HandleKind::Output],
        }
    }

    /// Whether `handle` is a legal origin on nodes of this kind.
    pub fn allows_handle(&self, handle: HandleKind) -> bool {
        self.output_handles().contains(&handle)
    }
}

/// A single node on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    /// Unique identifier for this node.
    pub id: NodeId,
    /// User-displayable label.
    pub label: String,
    /// Optional free-text content (the message body for message nodes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Position in canvas space as (x, y). Mutated only by drag operations
    /// or programmatic placement.
    pub position: (f32, f32),
    /// The type and configuration of this node.
    pub kind: NodeKind,
}

impl FlowNode {
    /// Creates a new node with a fresh id.
    pub fn new(label: impl Into<String>, position: (f32, f32), kind: NodeKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            content: None,
            position,
            kind,
        }
    }
}

/// Lifecycle status of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    /// Editable working copy.
    #[default]
    Draft,
    /// Live and executable.
    Published,
    /// Retired, read-only.
    Archived,
}

impl FlowStatus {
    /// All statuses, in display order.
    pub const ALL: [FlowStatus; 3] =
        [FlowStatus::Draft, FlowStatus::Published, FlowStatus::Archived];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            FlowStatus::Draft => "Draft",
            FlowStatus::Published => "Published",
            FlowStatus::Archived => "Archived",
        }
    }
}

/// The persisted flow aggregate: metadata plus its nodes and edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flow {
    /// Unique identifier for this flow.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: FlowStatus,
    /// Deployment environment ("production", "staging", ...).
    pub environment: String,
    /// Monotonically increasing version.
    pub version: u32,
    /// All nodes, indexed by id.
    pub nodes: HashMap<NodeId, FlowNode>,
    /// All edges.
    pub edges: Vec<FlowEdge>,
}

impl Default for Flow {
    fn default() -> Self {
        Self::new("Untitled flow")
    }
}

impl Flow {
    /// Creates a new draft flow seeded with its single start node.
    pub fn new(name: impl Into<String>) -> Self {
        let start = FlowNode::new("Start", (100.0, 300.0), NodeKind::Start);
        let mut nodes = HashMap::new();
        nodes.insert(start.id, start);
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: FlowStatus::Draft,
            environment: "production".to_owned(),
            version: 1,
            nodes,
            edges: Vec::new(),
        }
    }

    /// Serializes the flow to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a flow from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The id of the flow's start node.
    pub fn start_node(&self) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|n| matches!(n.kind, NodeKind::Start))
            .map(|n| n.id)
    }

    /// The edge leaving `source` from `handle`, if one exists.
    pub fn edge_from_handle(&self, source: NodeId, handle: HandleKind) -> Option<&FlowEdge> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.source_handle == handle)
    }

    /// Looks up an edge by id.
    pub fn edge(&self, id: EdgeId) -> Option<&FlowEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Declared output-variable names of every run-workflow node, sorted and
    /// deduplicated. Message nodes offer these as `{{workflow.<name>}}`
    /// insertion tokens.
    pub fn workflow_outputs(&self) -> Vec<String> {
        let mut outputs: Vec<String> = self
            .nodes
            .values()
            .filter_map(|n| match &n.kind {
                NodeKind::RunWorkflow(cfg) => Some(cfg.outputs.iter().cloned()),
                _ => None,
            })
            .flatten()
            .filter(|name| !name.is_empty())
            .collect();
        outputs.sort();
        outputs.dedup();
        outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_flow_has_exactly_one_start_node() {
        let flow = Flow::new("Onboarding");
        let starts = flow
            .nodes
            .values()
            .filter(|n| matches!(n.kind, NodeKind::Start))
            .count();
        assert_eq!(starts, 1);
        assert!(flow.start_node().is_some());
        assert_eq!(flow.status, FlowStatus::Draft);
        assert_eq!(flow.version, 1);
    }

    #[test]
    fn start_has_no_input_and_end_has_no_outputs() {
        assert!(!NodeKind::Start.has_input());
        assert!(NodeKind::End.has_input());
        assert!(NodeKind::End.output_handles().is_empty());
        assert_eq!(NodeKind::Start.output_handles(), &[HandleKind::Output]);
    }

    #[test]
    fn condition_exposes_yes_and_no_handles_only() {
        let kind = NodeKind::Condition(ConditionConfig::default());
        assert_eq!(kind.output_handles(), &[HandleKind::Yes, HandleKind::No]);
        assert!(kind.allows_handle(HandleKind::Yes));
        assert!(kind.allows_handle(HandleKind::No));
        assert!(!kind.allows_handle(HandleKind::Output));
    }

    #[test]
    fn non_condition_nodes_expose_single_output() {
        let kind = NodeKind::Message;
        assert_eq!(kind.output_handles(), &[HandleKind::Output]);
        assert!(!kind.allows_handle(HandleKind::Yes));
    }

    #[test]
    fn edge_from_condition_handle_gets_default_label() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(
            FlowEdge::new(a, b, HandleKind::Yes).label.as_deref(),
            Some("Yes")
        );
        assert_eq!(FlowEdge::new(a, b, HandleKind::Output).label, None);
    }

    #[test]
    fn workflow_outputs_are_sorted_and_deduplicated() {
        let mut flow = Flow::new("f");
        let mk = |outputs: &[&str]| {
            NodeKind::RunWorkflow(RunWorkflowConfig {
                workflow_name: "lookup".into(),
                workflow_id: None,
                outputs: outputs.iter().map(|s| s.to_string()).collect(),
            })
        };
        let n1 = FlowNode::new("w1", (0.0, 0.0), mk(&["order_status", "eta"]));
        let n2 = FlowNode::new("w2", (0.0, 0.0), mk(&["eta", "", "carrier"]));
        flow.nodes.insert(n1.id, n1);
        flow.nodes.insert(n2.id, n2);

        assert_eq!(flow.workflow_outputs(), vec!["carrier", "eta", "order_status"]);
    }

    #[test]
    fn node_kind_serializes_with_snake_case_tag() {
        let kind = NodeKind::SafetyCheck(SafetyConfig::default());
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "safety_check");

        let handle = serde_json::to_value(HandleKind::Yes).unwrap();
        assert_eq!(handle, "yes");
    }

    #[test]
    fn flow_round_trips_through_json() {
        let mut flow = Flow::new("Support triage");
        let msg = FlowNode::new("Greeting", (300.0, 300.0), NodeKind::Message);
        let cond = FlowNode::new(
            "VIP?",
            (500.0, 300.0),
            NodeKind::Condition(ConditionConfig {
                variable: "tier".into(),
                operator: ConditionOperator::Equals,
                value: "vip".into(),
            }),
        );
        let msg_id = msg.id;
        let cond_id = cond.id;
        flow.nodes.insert(msg.id, msg);
        flow.nodes.insert(cond.id, cond);
        flow.edges.push(FlowEdge::new(msg_id, cond_id, HandleKind::Output));

        let restored = Flow::from_json(&flow.to_json().unwrap()).unwrap();
        assert_eq!(restored.nodes.len(), 3);
        assert_eq!(restored.edges.len(), 1);
        assert_eq!(restored.edges[0].source, msg_id);
        assert_eq!(restored.edges[0].source_handle, HandleKind::Output);
        assert_eq!(restored.nodes[&cond_id].label, "VIP?");
    }

    #[test]
    fn safety_config_defaults_are_conservative() {
        let cfg = SafetyConfig::default();
        assert_eq!(cfg.bot_type, BotType::Both);
        assert!(!cfg.sentiment.enabled);
        assert_eq!(cfg.on_high_risk, RiskAction::Block);
        assert_eq!(cfg.on_pii, PiiAction::Mask);
        assert_eq!(cfg.on_sensitive_topic, TopicAction::Deflect);
        assert!(cfg.custom_rules.is_empty());
    }
}
