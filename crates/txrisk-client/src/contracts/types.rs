use serde::Serialize;

use crate::config::ConfigSource;
use crate::export::ExportScope;
use crate::risk::{RiskLabel, RuleKind, SummaryStats};

#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub kind: String,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleStatus {
    pub code: RuleKind,
    pub description: String,
    pub configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RulesView {
    pub amount_threshold: f64,
    pub country_allow_list: Option<Vec<String>>,
    pub time_prefix: Option<String>,
    pub source: ConfigSource,
    pub config_path: Option<String>,
    pub overridden: Vec<String>,
    pub rules: Vec<RuleStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedRow {
    pub row: usize,
    pub amount: f64,
    pub country: Option<String>,
    pub time: Option<String>,
    pub customer: Option<String>,
    pub risk_label: RiskLabel,
    pub flagged: bool,
    pub reasons: Vec<RuleKind>,
    pub fraud_check: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportInfo {
    pub scope: ExportScope,
    pub path: String,
    pub rows_written: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyData {
    pub analysis_id: String,
    pub message: String,
    pub source: SourceInfo,
    pub rules: RulesView,
    pub summary: SummaryStats,
    pub scope: ExportScope,
    pub rows: Vec<ClassifiedRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportData {
    pub analysis_id: String,
    pub message: String,
    pub source: SourceInfo,
    pub scope: ExportScope,
    pub rows_written: usize,
    pub summary: SummaryStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RulesData {
    pub rules: RulesView,
}
