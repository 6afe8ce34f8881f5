use serde_json::{Value, json};
use thiserror::Error;

use crate::contracts::types::RowIssue;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct EngineError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl EngineError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::new(
            "invalid_argument",
            message,
            vec!["Run `segmint --help` for usage.".to_string()],
        )
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    /// The input table does not carry the required transaction columns.
    pub fn schema_mismatch(required_headers: Vec<String>, actual_headers: Vec<String>) -> Self {
        Self::new(
            "schema_mismatch",
            "Input columns do not satisfy the transaction schema.",
            vec![
                "Include exactly the required headers: customer_id, branch, route, purchase_date."
                    .to_string(),
                "Run `segmint template` to get a valid example file.".to_string(),
            ],
        )
        .with_data(json!({
            "required_headers": required_headers,
            "actual_headers": actual_headers,
        }))
    }

    /// One or more rows left a required transaction field empty.
    pub fn schema_missing_field(issues: Vec<RowIssue>) -> Self {
        let row_count = affected_rows(&issues);
        Self::new(
            "schema_missing_field",
            &format!("{row_count} rows are missing required transaction fields."),
            vec![
                "Fill customer_id, branch, route, and purchase_date on every row.".to_string(),
                "Rerun `segmint score <path>` once the rows are fixed.".to_string(),
            ],
        )
        .with_data(json!({ "issues": issues }))
    }

    /// One or more purchase dates could not be parsed.
    pub fn date_parse_failed(issues: Vec<RowIssue>) -> Self {
        let row_count = affected_rows(&issues);
        Self::new(
            "date_parse_failed",
            &format!("{row_count} rows carry purchase dates that are not valid YYYY-MM-DD dates."),
            vec![
                "Format every purchase_date as YYYY-MM-DD with real calendar values.".to_string(),
                "Rerun `segmint score <path>` once the dates are fixed.".to_string(),
            ],
        )
        .with_data(json!({ "issues": issues }))
    }

    /// A metric distribution cannot be split into 4 non-empty quartiles.
    pub fn degenerate_distribution(metric: &str, customers: usize, distinct_values: usize) -> Self {
        Self::new(
            "degenerate_distribution",
            &format!(
                "Cannot form 4 quartiles for {metric}: {customers} customers with {distinct_values} distinct values."
            ),
            vec![
                "Provide at least 4 customers with at least 4 distinct values per metric."
                    .to_string(),
            ],
        )
        .with_data(json!({
            "metric": metric,
            "customers": customers,
            "distinct_values": distinct_values,
        }))
    }

    /// A classification table does not cover the composite-score range
    /// exhaustively and disjointly.
    pub fn classification_config_invalid(policy: &str, detail: &str) -> Self {
        Self::new(
            "classification_config_invalid",
            &format!("Segment policy `{policy}` is misconfigured: {detail}"),
            vec!["Fix the policy table so every reachable score resolves to exactly one segment."
                .to_string()],
        )
        .with_data(json!({ "policy": policy }))
    }

    pub fn export_write_failed(path: &str, detail: &str) -> Self {
        Self::new(
            "export_write_failed",
            &format!("Could not write results to `{path}`: {detail}"),
            vec![format!("Verify `{path}` is writable and retry.")],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

fn affected_rows(issues: &[RowIssue]) -> usize {
    let mut rows = issues.iter().map(|issue| issue.row).collect::<Vec<i64>>();
    rows.sort_unstable();
    rows.dedup();
    rows.len()
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use crate::contracts::types::RowIssue;

    use super::EngineError;

    fn issue(row: i64, field: &str) -> RowIssue {
        RowIssue {
            row,
            field: field.to_string(),
            code: "missing_required_field".to_string(),
            description: format!("{field} must be present and non-empty."),
            received: Some(String::new()),
        }
    }

    #[test]
    fn missing_field_error_counts_distinct_rows() {
        let error = EngineError::schema_missing_field(vec![
            issue(1, "branch"),
            issue(1, "route"),
            issue(3, "customer_id"),
        ]);
        assert_eq!(error.code, "schema_missing_field");
        assert!(error.message.starts_with("2 rows"));
    }

    #[test]
    fn degenerate_distribution_error_names_the_metric() {
        let error = EngineError::degenerate_distribution("recency", 3, 3);
        assert_eq!(error.code, "degenerate_distribution");
        assert!(error.message.contains("recency"));
        assert!(error.message.contains("3 customers"));
    }
}
