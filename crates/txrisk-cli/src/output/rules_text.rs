use std::io;

use serde_json::Value;

use super::amount::format_amount;
use super::fields::{self, required};
use super::table::label_rows;

pub fn render_rules(data: &Value) -> io::Result<String> {
    let rules = required(data, "rules", "rules")?;

    let mut lines = vec![format!("Active rules ({})", describe_source(rules)), String::new()];
    lines.extend(label_rows(&rule_entries(rules)));

    let overridden = string_list(rules, "overridden");
    if !overridden.is_empty() {
        lines.push(String::new());
        lines.push(format!("Overridden by flags: {}", overridden.join(", ")));
    }

    lines.push(String::new());
    lines.push("Rules run in this order; every match is listed as a reason.".to_string());
    Ok(lines.join("\n"))
}

/// One line per rule: description, then the active condition.
pub(super) fn rule_entries(rules: &Value) -> Vec<(&'static str, String)> {
    let threshold = format_amount(fields::number(rules, "amount_threshold"));
    let countries = string_list(rules, "country_allow_list");
    let prefix = fields::text(rules, "time_prefix");

    vec![
        ("High transaction amount", format!("Amount > {threshold}")),
        (
            "Unusual country",
            if countries.is_empty() {
                "not configured (no allow-list)".to_string()
            } else {
                format!("Country not in: {}", countries.join(", "))
            },
        ),
        (
            "Odd transaction time",
            match prefix {
                Some(prefix) => format!("Time starts with \"{prefix}\""),
                None => "not configured (no time prefix)".to_string(),
            },
        ),
    ]
}

pub(super) fn describe_source(rules: &Value) -> String {
    match (
        fields::text(rules, "source"),
        fields::text(rules, "config_path"),
    ) {
        (Some("file"), Some(path)) => format!("from `{path}`"),
        _ => "built-in defaults".to_string(),
    }
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
