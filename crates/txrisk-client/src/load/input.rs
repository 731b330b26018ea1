use std::fs;
use std::io::{IsTerminal, Read};

use serde::Serialize;

use crate::error::CLASSIFY_HELP_COMMAND;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    File,
    Stdin,
    Text,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Stdin => "stdin",
            Self::Text => "text",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub source_kind: SourceKind,
    pub source_ref: Option<String>,
    /// Raw bytes; UTF-8 is checked per row by the loader.
    pub content: Vec<u8>,
}

/// Picks exactly one input source: inline text, a file path, or stdin.
///
/// A path of `-` reads stdin explicitly. With no path, non-empty piped stdin
/// is used. `stdin_override` stands in for the process stdin.
pub fn resolve_source(
    path: Option<String>,
    text: Option<String>,
    stdin_override: Option<String>,
) -> ClientResult<ResolvedSource> {
    if let Some(text_value) = text {
        if path.is_some() {
            return Err(ClientError::invalid_argument_with_recovery(
                "Both a path and --text were provided. Pass exactly one source.",
                vec!["Drop either the path argument or the --text option.".to_string()],
            ));
        }
        if text_value.trim().is_empty() {
            return Err(ClientError::empty_input(
                "The pasted --text input is empty.",
            ));
        }
        return Ok(ResolvedSource {
            source_kind: SourceKind::Text,
            source_ref: None,
            content: text_value.into_bytes(),
        });
    }

    let stdin_body = read_stdin(stdin_override)?;

    if let Some(path_value) = path {
        if path_value == "-" {
            if let Some(stdin_value) = stdin_body {
                return Ok(ResolvedSource {
                    source_kind: SourceKind::Stdin,
                    source_ref: None,
                    content: stdin_value,
                });
            }

            return Err(ClientError::empty_input(
                "Path `-` means stdin input, but stdin was empty. Pipe CSV input or pass a file path.",
            ));
        }

        let file_body = fs::read(&path_value).map_err(|error| {
            ClientError::invalid_argument_with_recovery(
                &format!("Could not read transactions file `{path_value}`: {error}"),
                vec![
                    "Verify the path exists and is readable.".to_string(),
                    "Rerun txrisk classify <path>.".to_string(),
                ],
            )
        })?;

        if stdin_body.is_some() {
            return Err(ClientError::invalid_argument_with_recovery(
                "Both stdin and file input were provided. Pass exactly one source: either a file path or piped stdin.",
                vec!["Stop piping stdin, or pass `-` instead of a file path.".to_string()],
            ));
        }

        tracing::debug!(path = %path_value, bytes = file_body.len(), "read transactions file");
        return Ok(ResolvedSource {
            source_kind: SourceKind::File,
            source_ref: Some(path_value),
            content: file_body,
        });
    }

    if let Some(stdin_value) = stdin_body {
        return Ok(ResolvedSource {
            source_kind: SourceKind::Stdin,
            source_ref: None,
            content: stdin_value,
        });
    }

    Err(ClientError::empty_input(
        "No transactions were provided. Pass a file path, pipe CSV via stdin, or use --text.",
    ))
}

fn read_stdin(stdin_override: Option<String>) -> ClientResult<Option<Vec<u8>>> {
    let body = match stdin_override {
        Some(value) => value.into_bytes(),
        None => {
            if std::io::stdin().is_terminal() {
                return Ok(None);
            }

            let mut buffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buffer)
                .map_err(|error| {
                    ClientError::invalid_argument_with_recovery(
                        &format!("Could not read stdin: {error}"),
                        vec![
                            "Retry with an explicit file path argument.".to_string(),
                            format!("Run `{CLASSIFY_HELP_COMMAND}` to review input options."),
                        ],
                    )
                })?;
            buffer
        }
    };

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    Ok(Some(body))
}
