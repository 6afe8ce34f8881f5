use std::fs;

use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{TemplateData, TemplateRow};
use crate::error::{EngineError, EngineResult};
use crate::input::parse::REQUIRED_HEADERS;

#[derive(Debug, Default)]
pub struct TemplateRunOptions {
    /// When set, the template CSV is also written to this path.
    pub out: Option<String>,
}

pub fn run() -> EngineResult<SuccessEnvelope> {
    run_with_options(TemplateRunOptions::default())
}

/// Emits a minimal example dataset matching the transaction schema, ready
/// to be filled in and fed back to `segmint score`.
pub fn run_with_options(options: TemplateRunOptions) -> EngineResult<SuccessEnvelope> {
    let rows = template_rows();
    let csv_body = render_csv(&rows);

    let written_to = match options.out.as_deref() {
        Some(out) => {
            fs::write(out, &csv_body)
                .map_err(|error| EngineError::export_write_failed(out, &error.to_string()))?;
            Some(out.to_string())
        }
        None => None,
    };

    let data = TemplateData {
        headers: REQUIRED_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows,
        csv_body,
        written_to,
    };

    success("template", data)
}

fn template_rows() -> Vec<TemplateRow> {
    vec![
        TemplateRow {
            customer_id: "Cust1".to_string(),
            branch: "A".to_string(),
            route: "X".to_string(),
            purchase_date: "2023-01-01".to_string(),
        },
        TemplateRow {
            customer_id: "Cust2".to_string(),
            branch: "B".to_string(),
            route: "Y".to_string(),
            purchase_date: "2023-02-15".to_string(),
        },
        TemplateRow {
            customer_id: "Cust3".to_string(),
            branch: "C".to_string(),
            route: "Z".to_string(),
            purchase_date: "2023-03-10".to_string(),
        },
    ]
}

fn render_csv(rows: &[TemplateRow]) -> String {
    let mut lines = vec![REQUIRED_HEADERS.join(",")];
    for row in rows {
        lines.push(format!(
            "{},{},{},{}",
            row.customer_id, row.branch, row.route, row.purchase_date
        ));
    }
    lines.join("\n") + "\n"
}
