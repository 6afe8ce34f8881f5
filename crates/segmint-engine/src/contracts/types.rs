use serde::Serialize;

use crate::rfm::types::ScoredCustomer;

/// One validation finding tied to a source row (1-based, data rows only).
#[derive(Debug, Clone, Serialize)]
pub struct RowIssue {
    pub row: i64,
    pub field: String,
    pub code: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredCustomerRow {
    pub customer_id: String,
    pub first_branch: String,
    pub first_route: String,
    pub recency_days: i64,
    pub frequency: i64,
    pub monetary: i64,
    pub r_score: u8,
    pub f_score: u8,
    pub m_score: u8,
    pub composite: String,
    pub composite_value: i64,
    pub segment: String,
}

impl From<&ScoredCustomer> for ScoredCustomerRow {
    fn from(scored: &ScoredCustomer) -> Self {
        Self {
            customer_id: scored.metrics.customer_id.clone(),
            first_branch: scored.metrics.first_branch.clone(),
            first_route: scored.metrics.first_route.clone(),
            recency_days: scored.metrics.recency_days,
            frequency: scored.metrics.frequency,
            monetary: scored.metrics.monetary,
            r_score: scored.r_score,
            f_score: scored.f_score,
            m_score: scored.m_score,
            composite: scored.composite.clone(),
            composite_value: scored.composite_value,
            segment: scored.segment.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreSummary {
    pub transactions_read: i64,
    pub customers_scored: i64,
    pub rows_returned: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentCount {
    pub segment: String,
    pub customers: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompositeCount {
    pub composite: String,
    pub customers: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
}

/// Full `score` command payload. `rows` reflects any read-only filters;
/// the distributions and summary always describe the complete run.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreData {
    pub as_of: String,
    pub policy: String,
    pub policy_version: String,
    pub summary: ScoreSummary,
    pub filters: ScoreFilters,
    pub rows: Vec<ScoredCustomerRow>,
    pub segment_distribution: Vec<SegmentCount>,
    pub composite_distribution: Vec<CompositeCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateRow {
    pub customer_id: String,
    pub branch: String,
    pub route: String,
    pub purchase_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateData {
    pub headers: Vec<String>,
    pub rows: Vec<TemplateRow>,
    pub csv_body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_to: Option<String>,
}
