use std::collections::HashMap;

use serde_json::Value;

use crate::error::{EngineError, EngineResult};
use crate::input::invalid_input_error;

pub const REQUIRED_HEADERS: [&str; 4] = ["customer_id", "branch", "route", "purchase_date"];

/// One tabular input row before validation. Fields stay optional so a
/// missing value is representable and can be reported per row.
#[derive(Debug, Clone)]
pub struct RawTransaction {
    pub row: i64,
    pub customer_id: Option<String>,
    pub branch: Option<String>,
    pub route: Option<String>,
    pub purchase_date: Option<String>,
}

/// Parses raw source content into transaction rows. Accepts a CSV document
/// with a header row or a top-level JSON array of objects.
pub fn parse_source(content: &str) -> EngineResult<Vec<RawTransaction>> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(invalid_input_error("Transaction source is empty."));
    }

    if trimmed.starts_with('[') {
        return parse_json_array(trimmed);
    }

    if looks_like_csv(trimmed) {
        return parse_csv(trimmed);
    }

    if serde_json::from_str::<Value>(trimmed).is_ok() {
        return Err(invalid_input_error(
            "JSON input must be a top-level array of transaction objects.",
        ));
    }

    Err(invalid_input_error(
        "Unsupported input format. Provide CSV with headers or a JSON array.",
    ))
}

fn parse_json_array(content: &str) -> EngineResult<Vec<RawTransaction>> {
    let parsed = serde_json::from_str::<Value>(content)
        .map_err(|_| invalid_input_error("Invalid JSON input. Provide a valid JSON array."))?;

    let Some(items) = parsed.as_array() else {
        return Err(invalid_input_error(
            "JSON input must be a top-level array of transaction objects.",
        ));
    };

    let mut rows = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let Some(object) = item.as_object() else {
            return Err(invalid_input_error(
                "JSON array entries must all be objects with transaction fields.",
            ));
        };

        let unknown_keys = object
            .keys()
            .filter(|key| !REQUIRED_HEADERS.contains(&key.as_str()))
            .cloned()
            .collect::<Vec<String>>();
        if !unknown_keys.is_empty() {
            return Err(EngineError::schema_mismatch(
                required_headers(),
                object.keys().cloned().collect(),
            ));
        }

        rows.push(RawTransaction {
            row: (index as i64) + 1,
            customer_id: read_optional_string(object.get("customer_id")),
            branch: read_optional_string(object.get("branch")),
            route: read_optional_string(object.get("route")),
            purchase_date: read_optional_string(object.get("purchase_date")),
        });
    }

    Ok(rows)
}

fn parse_csv(content: &str) -> EngineResult<Vec<RawTransaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| invalid_input_error("CSV header row is missing or unreadable."))?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();

    if !headers_are_valid(&headers) {
        return Err(EngineError::schema_mismatch(required_headers(), headers));
    }

    let index_by_name = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.to_string(), index))
        .collect::<HashMap<String, usize>>();

    let mut rows = Vec::new();
    for (row_index, result_row) in reader.records().enumerate() {
        let record =
            result_row.map_err(|_| invalid_input_error("CSV rows are malformed or not UTF-8."))?;

        rows.push(RawTransaction {
            row: (row_index as i64) + 1,
            customer_id: value_for(&record, &index_by_name, "customer_id"),
            branch: value_for(&record, &index_by_name, "branch"),
            route: value_for(&record, &index_by_name, "route"),
            purchase_date: value_for(&record, &index_by_name, "purchase_date"),
        });
    }

    Ok(rows)
}

fn value_for(
    record: &csv::StringRecord,
    index_by_name: &HashMap<String, usize>,
    field_name: &str,
) -> Option<String> {
    let index = index_by_name.get(field_name)?;
    let value = record.get(*index)?;
    Some(value.to_string())
}

fn read_optional_string(value: Option<&Value>) -> Option<String> {
    let current = value?;

    if current.is_null() {
        return None;
    }

    if let Some(string_value) = current.as_str() {
        return Some(string_value.to_string());
    }

    if let Some(number_value) = current.as_f64() {
        return Some(number_value.to_string());
    }

    Some(current.to_string())
}

fn looks_like_csv(content: &str) -> bool {
    let Some(first_line) = content.lines().find(|line| !line.trim().is_empty()) else {
        return false;
    };
    first_line.contains(',')
}

/// Exactly the four required headers, each appearing once. The length check
/// rules out duplicated headers, which would otherwise silently shadow a
/// column in the name-to-index map.
fn headers_are_valid(actual_headers: &[String]) -> bool {
    if actual_headers.len() != REQUIRED_HEADERS.len() {
        return false;
    }

    for required in REQUIRED_HEADERS {
        if !actual_headers.iter().any(|value| value == required) {
            return false;
        }
    }

    actual_headers
        .iter()
        .all(|header| REQUIRED_HEADERS.contains(&header.as_str()))
}

fn required_headers() -> Vec<String> {
    REQUIRED_HEADERS
        .iter()
        .map(|value| value.to_string())
        .collect()
}
