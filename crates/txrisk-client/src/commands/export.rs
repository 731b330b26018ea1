use std::path::PathBuf;

use crate::ClientResult;
use crate::commands::common::{InputOptions, analyze, source_info};
use crate::config::RuleOverrides;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ExportData;
use crate::export::{ExportScope, export_csv, write_export};

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub input: InputOptions,
    pub rules: RuleOverrides,
    pub flagged_only: bool,
    pub output: Option<PathBuf>,
}

/// Renders the classified input as CSV. Without `output` the body travels
/// back in the payload so the caller can print it.
pub fn run(options: ExportOptions) -> ClientResult<SuccessEnvelope> {
    let analysis = analyze(options.input, &options.rules)?;
    let scope = ExportScope::from_flagged_only(options.flagged_only);
    let rendered = export_csv(&analysis.frame.headers, &analysis.classified, scope)?;

    let (path, csv, message) = match &options.output {
        Some(path) => {
            write_export(path, &rendered)?;
            let location = path.display().to_string();
            let message = format!("Wrote {} rows to `{location}`.", rendered.rows_written);
            (Some(location), None, message)
        }
        None => {
            let message = format!("Rendered {} rows as CSV.", rendered.rows_written);
            (None, Some(rendered.body.clone()), message)
        }
    };

    let data = ExportData {
        analysis_id: analysis.analysis_id.clone(),
        message,
        source: source_info(&analysis.source),
        scope,
        rows_written: rendered.rows_written,
        summary: analysis.summary,
        path,
        csv,
    };

    success("export", data)
}
