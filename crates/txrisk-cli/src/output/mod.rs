mod amount;
mod classify_text;
mod error_text;
mod export_text;
mod fields;
mod json;
mod mode;
mod rules_text;
mod table;

use std::io;

use txrisk_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_block;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_block(&body)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_block(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "classify" => classify_text::render_classify(&success.data),
        "export" => export_text::render_export(&success.data),
        "rules" => rules_text::render_rules(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
