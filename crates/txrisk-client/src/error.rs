use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const CLASSIFY_HELP_COMMAND: &str = "txrisk classify --help";

pub const EMPTY_INPUT_CODE: &str = "empty_input";
pub const MALFORMED_INPUT_CODE: &str = "malformed_input";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
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

    /// Source row (1-based, header excluded) attached to a malformed-input error.
    pub fn row(&self) -> Option<usize> {
        let value = self.data.as_ref()?.get("row")?.as_u64()?;
        usize::try_from(value).ok()
    }

    pub fn is_empty_input(&self) -> bool {
        self.code == EMPTY_INPUT_CODE
    }

    pub fn is_malformed_input(&self) -> bool {
        self.code == MALFORMED_INPUT_CODE
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `txrisk {cmd} --help` for usage."),
            None => "Run `txrisk --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn empty_input(message: &str) -> Self {
        Self::new(
            EMPTY_INPUT_CODE,
            message,
            vec![
                "Pass a CSV file path, pipe CSV via stdin, or paste rows with --text.".to_string(),
                format!("Run `{CLASSIFY_HELP_COMMAND}` to see the expected columns."),
            ],
        )
    }

    pub fn malformed_input(message: &str, row: Option<usize>) -> Self {
        let error = Self::new(
            MALFORMED_INPUT_CODE,
            message,
            vec![
                "Fix the listed problem in your CSV source.".to_string(),
                "Make sure the header row includes an `Amount` column.".to_string(),
                format!("Run `{CLASSIFY_HELP_COMMAND}` to review the input format."),
            ],
        );
        match row {
            Some(row) => error.with_data(json!({ "row": row })),
            None => error,
        }
    }

    pub fn missing_amount_column(actual_headers: Vec<String>) -> Self {
        Self::malformed_input("CSV headers do not include the required `Amount` column.", None)
            .with_data(json!({
                "required_headers": ["Amount"],
                "optional_headers": ["Country", "Time", "Customer"],
                "actual_headers": actual_headers,
            }))
    }

    pub fn invalid_amount(row: usize, received: &str) -> Self {
        let message = if received.trim().is_empty() {
            format!("Row {row}: Amount must be present and numeric.")
        } else {
            format!("Row {row}: Amount must be numeric; got \"{received}\".")
        };
        Self::malformed_input(&message, Some(row)).with_data(json!({
            "row": row,
            "field": "Amount",
            "received": received,
            "expected": "number (e.g. 1250.50)",
        }))
    }

    pub fn invalid_config(path: Option<&Path>, detail: &str) -> Self {
        let (message, location) = match path {
            Some(path) => {
                let location = path.display().to_string();
                (
                    format!("Rules config at `{location}` is invalid: {detail}"),
                    Some(location),
                )
            }
            None => (format!("Rule settings are invalid: {detail}"), None),
        };
        let error = Self::new(
            "invalid_config",
            &message,
            vec![
                "Check `amount_threshold`, `country_allow_list`, and `time_prefix` values."
                    .to_string(),
                "Run `txrisk rules` to inspect the resolved rule set.".to_string(),
            ],
        );
        match location {
            Some(location) => error.with_data(json!({ "config_path": location })),
            None => error,
        }
    }

    pub fn export_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "export_failed",
            &format!("Could not write export to `{location}`: {detail}"),
            vec![
                format!("Check that the directory for `{location}` exists and is writable."),
                "Or omit --output to print the CSV to stdout.".to_string(),
            ],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
