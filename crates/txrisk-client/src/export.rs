use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::risk::ClassifiedTransaction;
use crate::{ClientError, ClientResult};

pub const RISK_LABEL_COLUMN: &str = "Risk_Label";
pub const FLAGGED_COLUMN: &str = "Flagged";
pub const FRAUD_CHECK_COLUMN: &str = "Fraud_Check";

/// Columns appended to every export. The loader drops them on the way back in
/// when they close out the header row.
pub const DERIVED_COLUMNS: [&str; 3] = [RISK_LABEL_COLUMN, FLAGGED_COLUMN, FRAUD_CHECK_COLUMN];

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportScope {
    #[default]
    All,
    FlaggedOnly,
}

impl ExportScope {
    pub fn from_flagged_only(flagged_only: bool) -> Self {
        if flagged_only {
            Self::FlaggedOnly
        } else {
            Self::All
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::FlaggedOnly => "flagged_only",
        }
    }

    pub fn includes(self, item: &ClassifiedTransaction) -> bool {
        match self {
            Self::All => true,
            Self::FlaggedOnly => item.result.flagged,
        }
    }
}

/// Index where a previous export's derived columns begin, if the header row
/// ends with exactly those columns in export order.
pub fn derived_columns_start(headers: &[String]) -> Option<usize> {
    let start = headers.len().checked_sub(DERIVED_COLUMNS.len())?;
    let tail_matches = headers[start..]
        .iter()
        .zip(DERIVED_COLUMNS)
        .all(|(header, column)| header.trim() == column);
    tail_matches.then_some(start)
}

#[derive(Debug, Clone)]
pub struct CsvExport {
    pub body: String,
    pub rows_written: usize,
}

/// Writes the source columns unchanged, followed by the derived risk columns.
pub fn export_csv(
    headers: &[String],
    classified: &[ClassifiedTransaction],
    scope: ExportScope,
) -> ClientResult<CsvExport> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header_row = headers.to_vec();
    header_row.extend(DERIVED_COLUMNS.iter().map(|column| column.to_string()));
    writer
        .write_record(&header_row)
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;

    let mut rows_written = 0usize;
    for item in classified.iter().filter(|item| scope.includes(item)) {
        let mut row = item.record.fields.clone();
        row.push(item.result.risk_label.as_str().to_string());
        row.push(item.result.flagged.to_string());
        row.push(item.result.fraud_check());
        writer
            .write_record(&row)
            .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
        rows_written += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
    let body = String::from_utf8(bytes)
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;

    tracing::debug!(rows = rows_written, scope = scope.as_str(), "rendered csv export");
    Ok(CsvExport { body, rows_written })
}

pub fn write_export(path: &Path, export: &CsvExport) -> ClientResult<()> {
    fs::write(path, export.body.as_bytes())
        .map_err(|error| ClientError::export_failed(path, &error.to_string()))?;
    tracing::info!(path = %path.display(), rows = export.rows_written, "wrote csv export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ExportScope, derived_columns_start, export_csv};
    use crate::load::load_transactions;
    use crate::risk::{RuleSet, classify_frame};

    const SOURCE: &str = "Id,Amount,Country\ntx-1,15000,USA\ntx-2,100,France\ntx-3,50,UK\n";

    #[test]
    fn appends_derived_columns_to_every_row() {
        let frame = load_transactions(SOURCE);
        assert!(frame.is_ok());
        if let Ok(frame) = frame {
            let classified = classify_frame(&frame, &RuleSet::default());
            let export = export_csv(&frame.headers, &classified, ExportScope::All);
            assert!(export.is_ok());
            if let Ok(export) = export {
                assert_eq!(export.rows_written, 3);
                let lines = export.body.lines().collect::<Vec<&str>>();
                assert_eq!(lines[0], "Id,Amount,Country,Risk_Label,Flagged,Fraud_Check");
                assert_eq!(lines[1], "tx-1,15000,USA,High,true,High transaction amount");
                assert_eq!(lines[2], "tx-2,100,France,Low,false,Legit");
            }
        }
    }

    #[test]
    fn flagged_only_scope_skips_clear_rows() {
        let frame = load_transactions(SOURCE);
        assert!(frame.is_ok());
        if let Ok(frame) = frame {
            let rules = RuleSet::default().with_country_allow_list(["USA", "UK"]);
            let classified = classify_frame(&frame, &rules);
            let export = export_csv(&frame.headers, &classified, ExportScope::FlaggedOnly);
            assert!(export.is_ok());
            if let Ok(export) = export {
                assert_eq!(export.rows_written, 2);
                assert!(export.body.contains("tx-1"));
                assert!(export.body.contains("tx-2,100,France,High,true,Unusual country"));
                assert!(!export.body.contains("tx-3"));
            }
        }
    }

    #[test]
    fn multiple_reasons_are_quoted() {
        let frame = load_transactions("Amount,Country\n20000,Peru\n");
        assert!(frame.is_ok());
        if let Ok(frame) = frame {
            let rules = RuleSet::default().with_country_allow_list(["USA"]);
            let classified = classify_frame(&frame, &rules);
            let export = export_csv(&frame.headers, &classified, ExportScope::All);
            assert!(export.is_ok());
            if let Ok(export) = export {
                assert!(
                    export
                        .body
                        .contains("\"High transaction amount, Unusual country\"")
                );
            }
        }
    }

    #[test]
    fn reloading_an_export_reproduces_the_records() {
        let source = "Customer,Amount,Country,Time,Note\nana,15000,USA,14:00,\"a, b\"\nbo, 99.50 ,,23:10,\n";
        let frame = load_transactions(source);
        assert!(frame.is_ok());
        if let Ok(frame) = frame {
            let rules = RuleSet::default().with_time_prefix("2");
            let classified = classify_frame(&frame, &rules);
            let export = export_csv(&frame.headers, &classified, ExportScope::All);
            assert!(export.is_ok());
            if let Ok(export) = export {
                let reloaded = load_transactions(&export.body);
                assert!(reloaded.is_ok());
                if let Ok(reloaded) = reloaded {
                    assert_eq!(reloaded, frame);
                }
            }
        }
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn derived_columns_are_recognized_only_as_the_exported_tail() {
        assert_eq!(
            derived_columns_start(&headers(&[
                "Amount",
                "Risk_Label",
                "Flagged",
                "Fraud_Check"
            ])),
            Some(1)
        );
        assert_eq!(
            derived_columns_start(&headers(&["Id", "Amount", "Flagged"])),
            None
        );
        assert_eq!(
            derived_columns_start(&headers(&[
                "Amount",
                "Flagged",
                "Risk_Label",
                "Fraud_Check"
            ])),
            None
        );
        assert_eq!(
            derived_columns_start(&headers(&[
                "Amount",
                "risk_label",
                "flagged",
                "fraud_check"
            ])),
            None
        );
        assert_eq!(derived_columns_start(&headers(&["Flagged"])), None);
    }

    #[test]
    fn source_column_named_like_a_derived_column_survives_export() {
        let frame = load_transactions("Id,Amount,Flagged\ntx-1,50,yes\n");
        assert!(frame.is_ok());
        if let Ok(frame) = frame {
            assert_eq!(frame.headers, vec!["Id", "Amount", "Flagged"]);
            let classified = classify_frame(&frame, &RuleSet::default());
            let export = export_csv(&frame.headers, &classified, ExportScope::All);
            assert!(export.is_ok());
            if let Ok(export) = export {
                assert_eq!(
                    export.body,
                    "Id,Amount,Flagged,Risk_Label,Flagged,Fraud_Check\ntx-1,50,yes,Low,false,Legit\n"
                );
                let reloaded = load_transactions(&export.body);
                assert!(reloaded.is_ok());
                if let Ok(reloaded) = reloaded {
                    assert_eq!(reloaded, frame);
                }
            }
        }
    }
}
