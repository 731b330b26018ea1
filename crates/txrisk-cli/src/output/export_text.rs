use std::io;

use serde_json::Value;

use super::fields;

/// Without a destination file the CSV body itself is the output, so it can
/// be redirected straight into a file.
pub fn render_export(data: &Value) -> io::Result<String> {
    if let Some(body) = fields::text(data, "csv") {
        return Ok(body.to_string());
    }

    let path = fields::text(data, "path")
        .ok_or_else(|| io::Error::other("export output requires `csv` or `path`"))?;
    let summary = data.get("summary").unwrap_or(&Value::Null);
    let scope = match fields::text(data, "scope") {
        Some("flagged_only") => "flagged rows only",
        _ => "all rows",
    };

    Ok([
        format!(
            "Wrote {} rows to `{path}` ({scope}).",
            fields::count(data, "rows_written")
        ),
        format!(
            "Screened {} transactions: {} flagged, {} clear.",
            fields::count(summary, "total_count"),
            fields::count(summary, "flagged_count"),
            fields::count(summary, "clear_count")
        ),
    ]
    .join("\n"))
}
