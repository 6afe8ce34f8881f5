use std::io;

use serde_json::Value;

pub fn render_template(data: &Value) -> io::Result<String> {
    let csv_body = data
        .get("csv_body")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("template output requires csv_body"))?;

    let mut lines = vec![
        "Example transaction file (fill in your own rows):".to_string(),
        String::new(),
    ];
    lines.extend(csv_body.lines().map(|line| format!("  {line}")));

    lines.push(String::new());
    if let Some(written_to) = data.get("written_to").and_then(Value::as_str) {
        lines.push(format!("Template written to {written_to}."));
    } else {
        lines.push("Save this as a .csv file, then run `segmint score <path>`.".to_string());
    }

    Ok(lines.join("\n"))
}
