use std::io;

use serde_json::Value;

use super::amount::format_amount;
use super::fields::{self, or_dash, required};
use super::rules_text::describe_source;
use super::table::{self, Align, Column, label_rows};

pub fn render_classify(data: &Value) -> io::Result<String> {
    let summary = required(data, "summary", "classify")?;
    let rows = required(data, "rows", "classify")?
        .as_array()
        .ok_or_else(|| io::Error::other("classify output requires a rows array"))?;
    let flagged_only = fields::text(data, "scope") == Some("flagged_only");

    let mut lines = vec![
        fields::text(data, "message")
            .unwrap_or("Screening complete.")
            .to_string(),
        String::new(),
    ];
    lines.extend(label_rows(&overview_entries(data)));

    lines.push(String::new());
    lines.push("By risk label:".to_string());
    lines.extend(label_rows(&label_entries(summary)));

    lines.push(String::new());
    lines.push("Triggered rules:".to_string());
    lines.extend(label_rows(&reason_entries(data, summary)));

    lines.push(String::new());
    if flagged_only {
        lines.push("Flagged transactions:".to_string());
    } else {
        lines.push("Transactions:".to_string());
    }
    if rows.is_empty() {
        lines.push(if flagged_only {
            "  No transactions were flagged.".to_string()
        } else {
            "  The input has a header row but no transactions.".to_string()
        });
    } else {
        lines.extend(render_rows(rows, table::terminal_width()));
    }

    if let Some(export) = data.get("export") {
        lines.push(String::new());
        lines.push(format!(
            "Exported {} rows to `{}`.",
            fields::count(export, "rows_written"),
            fields::text(export, "path").unwrap_or("unknown")
        ));
    }

    Ok(lines.join("\n"))
}

fn overview_entries(data: &Value) -> Vec<(&'static str, String)> {
    let source = data.get("source").unwrap_or(&Value::Null);
    let source_text = match (
        fields::text(source, "kind"),
        fields::text(source, "reference"),
    ) {
        (Some("file"), Some(path)) => path.to_string(),
        (Some("stdin"), _) => "stdin".to_string(),
        (Some("text"), _) => "pasted text".to_string(),
        (kind, _) => or_dash(kind),
    };
    let rules_text = data
        .get("rules")
        .map(describe_source)
        .unwrap_or_else(|| "unknown".to_string());

    vec![
        ("Source", source_text),
        ("Rules", rules_text),
        ("Run", or_dash(fields::text(data, "analysis_id"))),
    ]
}

fn label_entries(summary: &Value) -> Vec<(&'static str, String)> {
    let amounts = summary.get("amount_by_label").unwrap_or(&Value::Null);
    let describe = |count: u64, amount: f64| {
        let noun = if count == 1 { "row" } else { "rows" };
        format!("{count} {noun}, {} total", format_amount(amount))
    };
    vec![
        (
            "Low",
            describe(
                fields::count(summary, "clear_count"),
                fields::number(amounts, "low"),
            ),
        ),
        (
            "High",
            describe(
                fields::count(summary, "flagged_count"),
                fields::number(amounts, "high"),
            ),
        ),
    ]
}

/// Rules that were not configured say so instead of reporting zero hits.
fn reason_entries(data: &Value, summary: &Value) -> Vec<(String, String)> {
    let statuses = data
        .get("rules")
        .and_then(|rules| rules.get("rules"))
        .and_then(Value::as_array);
    let is_configured = |code: &str| {
        statuses
            .and_then(|items| {
                items
                    .iter()
                    .find(|item| fields::text(item, "code") == Some(code))
            })
            .and_then(|item| item.get("configured"))
            .and_then(Value::as_bool)
            .unwrap_or(true)
    };

    summary
        .get("reason_counts")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    let description = or_dash(fields::text(item, "description"));
                    let configured = fields::text(item, "rule").is_none_or(is_configured);
                    let value = if configured {
                        fields::count(item, "count").to_string()
                    } else {
                        "not configured".to_string()
                    };
                    (description, value)
                })
                .collect()
        })
        .unwrap_or_default()
}

fn render_rows(rows: &[Value], width: usize) -> Vec<String> {
    let columns = [
        Column::fixed("Row", Align::Right),
        Column::truncatable("Customer"),
        Column::fixed("Amount", Align::Right),
        Column::truncatable("Country"),
        Column::fixed("Time", Align::Left),
        Column::fixed("Risk", Align::Left),
        Column::truncatable("Reasons"),
    ];
    let cells = rows
        .iter()
        .map(|row| {
            vec![
                fields::count(row, "row").to_string(),
                or_dash(fields::text(row, "customer")),
                format_amount(fields::number(row, "amount")),
                or_dash(fields::text(row, "country")),
                or_dash(fields::text(row, "time")),
                or_dash(fields::text(row, "risk_label")),
                or_dash(fields::text(row, "fraud_check")),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    table::render(&columns, &cells, width, "Transaction")
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{render_classify, render_rows};

    fn payload(scope: &str, rows: Value) -> Value {
        json!({
            "analysis_id": "run_01jabcdefghjkmnpqrstvwxyz0",
            "message": "Screened 3 transactions: 1 flagged, 2 clear.",
            "source": { "kind": "file", "reference": "rows.csv" },
            "rules": {
                "amount_threshold": 10000.0,
                "country_allow_list": null,
                "time_prefix": null,
                "source": "default",
                "config_path": null,
                "overridden": [],
                "rules": [
                    { "code": "amount_over_threshold", "description": "High transaction amount", "configured": true },
                    { "code": "country_not_allowed", "description": "Unusual country", "configured": false },
                    { "code": "time_pattern_match", "description": "Odd transaction time", "configured": false },
                ],
            },
            "summary": {
                "total_count": 3,
                "flagged_count": 1,
                "clear_count": 2,
                "amount_by_label": { "low": 150.0, "high": 15000.0 },
                "reason_counts": [
                    { "rule": "amount_over_threshold", "description": "High transaction amount", "count": 1 },
                    { "rule": "country_not_allowed", "description": "Unusual country", "count": 0 },
                    { "rule": "time_pattern_match", "description": "Odd transaction time", "count": 0 },
                ],
            },
            "scope": scope,
            "rows": rows,
        })
    }

    fn flagged_row() -> Value {
        json!({
            "row": 1,
            "amount": 15000.0,
            "country": "USA",
            "time": null,
            "customer": "ana",
            "risk_label": "High",
            "flagged": true,
            "reasons": ["amount_over_threshold"],
            "fraud_check": "High transaction amount",
        })
    }

    #[test]
    fn renders_summary_sections_and_rows() {
        let rendered = render_classify(&payload("all", json!([flagged_row()])));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Screened 3 transactions: 1 flagged, 2 clear."));
            assert!(text.contains("  Source  rows.csv"));
            assert!(text.contains("  Rules   built-in defaults"));
            assert!(text.contains("  Low   2 rows, 150.00 total"));
            assert!(text.contains("  High  1 row, 15,000.00 total"));
            assert!(text.contains("  High transaction amount  1"));
            assert!(text.contains("  Unusual country          not configured"));
            assert!(text.contains("Transactions:"));
            assert!(text.contains("High transaction amount"));
            assert!(!text.contains("Exported"));
        }
    }

    #[test]
    fn flagged_only_without_hits_says_so() {
        let rendered = render_classify(&payload("flagged_only", json!([])));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Flagged transactions:"));
            assert!(text.contains("  No transactions were flagged."));
        }
    }

    #[test]
    fn export_line_names_the_file() {
        let mut data = payload("all", json!([flagged_row()]));
        data["export"] = json!({ "scope": "all", "path": "out.csv", "rows_written": 3 });
        let rendered = render_classify(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.ends_with("Exported 3 rows to `out.csv`."));
        }
    }

    #[test]
    fn missing_optional_cells_render_as_dashes() {
        let lines = render_rows(&[flagged_row()], 120);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Customer"));
        assert!(lines[2].contains("15,000.00"));
        assert!(lines[2].contains(" - "));
    }

    #[test]
    fn missing_summary_is_an_error() {
        assert!(render_classify(&json!({ "rows": [] })).is_err());
    }
}
