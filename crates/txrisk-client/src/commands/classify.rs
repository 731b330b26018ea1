use std::path::PathBuf;

use crate::ClientResult;
use crate::commands::common::{
    InputOptions, analyze, classified_row, rules_view, source_info, summary_message,
};
use crate::config::RuleOverrides;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{ClassifiedRow, ClassifyData, ExportInfo};
use crate::export::{ExportScope, export_csv, write_export};

#[derive(Debug, Clone, Default)]
pub struct ClassifyOptions {
    pub input: InputOptions,
    pub rules: RuleOverrides,
    pub flagged_only: bool,
    pub output: Option<PathBuf>,
}

/// Loads, classifies, and summarizes one input. With `output` set, the same
/// rows shown in the result are also written there as CSV.
pub fn run(options: ClassifyOptions) -> ClientResult<SuccessEnvelope> {
    let analysis = analyze(options.input, &options.rules)?;
    let scope = ExportScope::from_flagged_only(options.flagged_only);

    let export = match &options.output {
        Some(path) => {
            let rendered = export_csv(&analysis.frame.headers, &analysis.classified, scope)?;
            write_export(path, &rendered)?;
            Some(ExportInfo {
                scope,
                path: path.display().to_string(),
                rows_written: rendered.rows_written,
            })
        }
        None => None,
    };

    let rows = analysis
        .classified
        .iter()
        .filter(|item| scope.includes(item))
        .map(classified_row)
        .collect::<Vec<ClassifiedRow>>();

    let data = ClassifyData {
        analysis_id: analysis.analysis_id.clone(),
        message: summary_message(&analysis.summary),
        source: source_info(&analysis.source),
        rules: rules_view(&analysis.resolved),
        summary: analysis.summary,
        scope,
        rows,
        export,
    };

    success("classify", data)
}
