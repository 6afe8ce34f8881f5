use std::io;

use serde_json::Value;

use super::format::{self, Align, Column};

pub fn render_score(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("score output requires rows"))?;

    let as_of = data.get("as_of").and_then(Value::as_str).unwrap_or("unknown");
    let policy = data.get("policy").and_then(Value::as_str).unwrap_or("unknown");
    let customers_scored = summary_count(data, "customers_scored");
    let transactions_read = summary_count(data, "transactions_read");

    let mut lines = vec![
        format!("Scored {customers_scored} customers as of {as_of} ({policy} policy)."),
        String::new(),
        "Summary:".to_string(),
    ];
    lines.extend(format::key_value_rows(
        &[
            ("Transactions read:", transactions_read.to_string()),
            ("Customers scored:", customers_scored.to_string()),
            ("Rows shown:", rows.len().to_string()),
        ],
        2,
    ));

    if let Some(filter_note) = describe_filters(data) {
        lines.push(String::new());
        lines.push(filter_note);
    }

    if rows.is_empty() {
        lines.push(String::new());
        lines.push("No customers match the given filters.".to_string());
    } else {
        lines.push(String::new());
        lines.push("Customers:".to_string());
        lines.extend(customer_table(rows));
    }

    if let Some(chart) = segment_chart(data) {
        lines.push(String::new());
        lines.push("Segments:".to_string());
        lines.extend(chart);
    }

    if let Some(export_path) = data.get("export_path").and_then(Value::as_str) {
        lines.push(String::new());
        lines.push(format!("Full results written to {export_path}."));
    }

    Ok(lines.join("\n"))
}

fn customer_table(rows: &[Value]) -> Vec<String> {
    let columns = [
        Column {
            name: "Customer",
            align: Align::Left,
        },
        Column {
            name: "Branch",
            align: Align::Left,
        },
        Column {
            name: "Route",
            align: Align::Left,
        },
        Column {
            name: "Recency",
            align: Align::Right,
        },
        Column {
            name: "Freq",
            align: Align::Right,
        },
        Column {
            name: "Mon",
            align: Align::Right,
        },
        Column {
            name: "Score",
            align: Align::Right,
        },
        Column {
            name: "Segment",
            align: Align::Left,
        },
    ];

    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                text_cell(row, "customer_id"),
                text_cell(row, "first_branch"),
                text_cell(row, "first_route"),
                number_cell(row, "recency_days"),
                number_cell(row, "frequency"),
                number_cell(row, "monetary"),
                text_cell(row, "composite"),
                text_cell(row, "segment"),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    format::render_table(&columns, &table_rows)
}

fn segment_chart(data: &Value) -> Option<Vec<String>> {
    let distribution = data.get("segment_distribution").and_then(Value::as_array)?;
    if distribution.is_empty() {
        return None;
    }

    let max_count = distribution
        .iter()
        .filter_map(|entry| entry.get("customers").and_then(Value::as_i64))
        .max()
        .unwrap_or(0);
    let label_width = distribution
        .iter()
        .map(|entry| text_cell(entry, "segment").len())
        .max()
        .unwrap_or(0);

    let lines = distribution
        .iter()
        .map(|entry| {
            let label = text_cell(entry, "segment");
            let count = entry.get("customers").and_then(Value::as_i64).unwrap_or(0);
            format!(
                "  {label:<label_width$}  {count:>4}  {}",
                format::bar(count, max_count)
            )
        })
        .collect::<Vec<String>>();

    Some(lines)
}

fn describe_filters(data: &Value) -> Option<String> {
    let filters = data.get("filters")?;
    let customer = filters.get("customer").and_then(Value::as_str);
    let segment = filters.get("segment").and_then(Value::as_str);

    match (customer, segment) {
        (Some(needle), Some(label)) => Some(format!(
            "Filtered to customers matching `{needle}` in segment `{label}`."
        )),
        (Some(needle), None) => Some(format!("Filtered to customers matching `{needle}`.")),
        (None, Some(label)) => Some(format!("Filtered to segment `{label}`.")),
        (None, None) => None,
    }
}

fn summary_count(data: &Value, key: &str) -> i64 {
    data.get("summary")
        .and_then(|summary| summary.get(key))
        .and_then(Value::as_i64)
        .unwrap_or(0)
}

fn text_cell(row: &Value, key: &str) -> String {
    row.get(key).and_then(Value::as_str).unwrap_or("").to_string()
}

fn number_cell(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_i64)
        .map(|value| value.to_string())
        .unwrap_or_default()
}
