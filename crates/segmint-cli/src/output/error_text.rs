use serde_json::Value;

use segmint_engine::EngineError;

const MAX_ISSUE_LINES: usize = 10;

pub fn render_error(error: &EngineError) -> String {
    let mut lines = vec![
        "Something went wrong, but it's easy to fix.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    lines.extend(issue_lines(error));

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}

/// Row-level findings attached to schema and date errors, capped so a
/// large broken file does not flood the terminal.
fn issue_lines(error: &EngineError) -> Vec<String> {
    let Some(issues) = error
        .data
        .as_ref()
        .and_then(|data| data.get("issues"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };
    if issues.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![String::new(), "  Rows with issues:".to_string()];
    for issue in issues.iter().take(MAX_ISSUE_LINES) {
        let row = issue.get("row").and_then(Value::as_i64).unwrap_or(0);
        let field = issue.get("field").and_then(Value::as_str).unwrap_or("");
        let description = issue
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("");
        lines.push(format!("    row {row} ({field}): {description}"));
    }

    if issues.len() > MAX_ISSUE_LINES {
        lines.push(format!(
            "    ... and {} more rows",
            issues.len() - MAX_ISSUE_LINES
        ));
    }

    lines
}
