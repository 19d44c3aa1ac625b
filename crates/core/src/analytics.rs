//! Analytics and organization settings payloads.

use crate::types::ConversationStatus;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeType {
    Kept,
    Exchanged,
    Disposal,
    Returned,
    Pending,
}

impl OutcomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kept => "kept",
            Self::Exchanged => "exchanged",
            Self::Disposal => "disposal",
            Self::Returned => "returned",
            Self::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    FitSizing,
    QualityDefects,
    ExpectationsMismatch,
    Other,
    ExtractionFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceTone {
    Friendly,
    Professional,
    Casual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerLength {
    Concise,
    Standard,
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationStatus {
    Active,
    Error,
    Pending,
    Disconnected,
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Inclusive date window, `YYYY-MM-DD`. Server defaults apply when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InterventionFilter {
    pub status: Option<ConversationStatus>,
    pub outcome_type: Option<OutcomeType>,
    pub range: DateRange,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutcomesBreakdown {
    pub kept: u64,
    pub exchanged: u64,
    pub disposal: u64,
    pub returned: u64,
    pub pending: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewMetrics {
    pub active_checkins: u64,
    pub checkins_sent: u64,
    /// 0..=1
    pub response_rate: f64,
    pub avg_resolution_time_seconds: Option<f64>,
    pub outcomes: OutcomesBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentActivityItem {
    pub conversation_id: String,
    /// Masked by the server.
    pub customer_phone: String,
    pub status: ConversationStatus,
    pub outcome_type: Option<OutcomeType>,
    pub last_message_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    pub metrics: OverviewMetrics,
    #[serde(default)]
    pub recent_activity: Vec<RecentActivityItem>,
    pub period_start: String,
    pub period_end: String,
}

// ---------------------------------------------------------------------------
// Interventions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionItem {
    pub conversation_id: String,
    pub customer_phone: String,
    pub customer_name: Option<String>,
    pub status: ConversationStatus,
    pub outcome_type: Option<OutcomeType>,
    pub product_title: Option<String>,
    pub issue_category: Option<IssueCategory>,
    pub message_count: u32,
    pub created_at: String,
    pub resolved_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionList {
    pub interventions: Vec<InterventionItem>,
    pub pagination: PaginationMeta,
    pub period_start: String,
    pub period_end: String,
}

// ---------------------------------------------------------------------------
// Products & issues
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemProduct {
    pub product_id: String,
    pub title: String,
    pub vendor: Option<String>,
    pub image_url: Option<String>,
    pub conversation_count: u64,
    pub issue_count: u64,
    /// 0..=1
    pub return_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopProducts {
    pub products: Vec<ProblemProduct>,
    pub total_products: u64,
    pub period_start: String,
    pub period_end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub product_id: String,
    pub shopify_product_id: String,
    pub title: String,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductIssueBreakdown {
    pub fit_sizing: u64,
    pub quality_defects: u64,
    pub expectations_mismatch: u64,
    pub other: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConversationSummary {
    pub conversation_id: String,
    pub customer_phone: String,
    pub status: String,
    pub issue_category: Option<IssueCategory>,
    pub outcome_type: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: ProductSnapshot,
    pub issue_breakdown: ProductIssueBreakdown,
    pub total_conversations: u64,
    pub total_issues: u64,
    #[serde(default)]
    pub conversations: Vec<ProductConversationSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueCategoryCount {
    pub category: IssueCategory,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingIssues {
    pub issues: Vec<IssueCategoryCount>,
    pub total_issues: u64,
    pub period_start: String,
    pub period_end: String,
}

// ---------------------------------------------------------------------------
// Complaint search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductMention {
    pub product_id: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMention {
    pub conversation_id: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintSearch {
    /// Markdown with embedded links.
    pub answer: String,
    #[serde(default)]
    pub products_mentioned: Vec<ProductMention>,
    #[serde(default)]
    pub conversations_mentioned: Vec<ConversationMention>,
    pub query_tokens: u64,
    pub rate_limit_remaining: u64,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSettings {
    pub org_ai_setting_id: Option<String>,
    pub organization_id: String,
    pub voice_tone: VoiceTone,
    pub answer_length: AnswerLength,
    pub custom_procedures: Option<Map<String, Value>>,
    pub response_templates: Option<Map<String, Value>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiSettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_tone: Option<VoiceTone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_length: Option<AnswerLength>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_procedures: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_templates: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integrations {
    pub shopify_connected: bool,
    pub shopify_shop_domain: Option<String>,
    pub status: IntegrationStatus,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrationsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopify_shop_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopify_access_token: Option<String>,
}
