use std::path::Path;

use crate::contracts::types::ScoredCustomerRow;
use crate::error::{EngineError, EngineResult};

const EXPORT_HEADERS: [&str; 12] = [
    "customer_id",
    "first_branch",
    "first_route",
    "recency_days",
    "frequency",
    "monetary",
    "r_score",
    "f_score",
    "m_score",
    "composite",
    "composite_value",
    "segment",
];

/// Writes the full scored table to a CSV file. customer_id leads as the row
/// identifier and every engine-produced column is preserved.
pub fn write_scored_csv(path: &Path, rows: &[ScoredCustomerRow]) -> EngineResult<()> {
    let display_path = path.display().to_string();
    let mut writer = csv::Writer::from_path(path)
        .map_err(|error| EngineError::export_write_failed(&display_path, &error.to_string()))?;

    writer
        .write_record(EXPORT_HEADERS)
        .map_err(|error| EngineError::export_write_failed(&display_path, &error.to_string()))?;

    for row in rows {
        writer
            .write_record([
                row.customer_id.as_str(),
                row.first_branch.as_str(),
                row.first_route.as_str(),
                &row.recency_days.to_string(),
                &row.frequency.to_string(),
                &row.monetary.to_string(),
                &row.r_score.to_string(),
                &row.f_score.to_string(),
                &row.m_score.to_string(),
                row.composite.as_str(),
                &row.composite_value.to_string(),
                row.segment.as_str(),
            ])
            .map_err(|error| EngineError::export_write_failed(&display_path, &error.to_string()))?;
    }

    writer
        .flush()
        .map_err(|error| EngineError::export_write_failed(&display_path, &error.to_string()))
}
