use ulid::Ulid;

use crate::ClientResult;
use crate::config::{ResolvedRules, RuleOverrides, resolve_rules};
use crate::contracts::types::{ClassifiedRow, RuleStatus, RulesView, SourceInfo};
use crate::load::input::{ResolvedSource, resolve_source};
use crate::load::{TransactionFrame, load_transactions};
use crate::risk::{ClassifiedTransaction, RuleKind, SummaryStats, classify_frame, summarize};

/// Where the transactions come from. `stdin_override` replaces the process
/// stdin, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct InputOptions {
    pub path: Option<String>,
    pub text: Option<String>,
    pub stdin_override: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct Analysis {
    pub(crate) analysis_id: String,
    pub(crate) source: ResolvedSource,
    pub(crate) resolved: ResolvedRules,
    pub(crate) frame: TransactionFrame,
    pub(crate) classified: Vec<ClassifiedTransaction>,
    pub(crate) summary: SummaryStats,
}

/// One isolated load, classify, summarize pass.
pub(crate) fn analyze(input: InputOptions, overrides: &RuleOverrides) -> ClientResult<Analysis> {
    let analysis_id = new_analysis_id();
    let span = tracing::info_span!("analysis", analysis_id = %analysis_id);
    let _entered = span.enter();

    let resolved = resolve_rules(overrides)?;
    let source = resolve_source(input.path, input.text, input.stdin_override)?;
    let frame = load_transactions(&source.content)?;
    let classified = classify_frame(&frame, &resolved.rules);
    let summary = summarize(&classified);

    tracing::info!(
        source = source.source_kind.as_str(),
        total = summary.total_count,
        flagged = summary.flagged_count,
        "analysis complete"
    );

    Ok(Analysis {
        analysis_id,
        source,
        resolved,
        frame,
        classified,
        summary,
    })
}

pub(crate) fn new_analysis_id() -> String {
    format!("run_{}", Ulid::new().to_string().to_lowercase())
}

pub(crate) fn source_info(source: &ResolvedSource) -> SourceInfo {
    SourceInfo {
        kind: source.source_kind.as_str().to_string(),
        reference: source.source_ref.clone(),
    }
}

pub(crate) fn rules_view(resolved: &ResolvedRules) -> RulesView {
    let rules = &resolved.rules;
    RulesView {
        amount_threshold: rules.amount_threshold,
        country_allow_list: rules
            .country_allow_list
            .as_ref()
            .map(|allowed| allowed.iter().cloned().collect()),
        time_prefix: rules.time_prefix.clone(),
        source: resolved.source,
        config_path: resolved
            .config_path
            .as_ref()
            .map(|path| path.display().to_string()),
        overridden: resolved
            .overridden
            .iter()
            .map(|name| name.to_string())
            .collect(),
        rules: RuleKind::ALL
            .into_iter()
            .map(|kind| RuleStatus {
                code: kind,
                description: kind.description().to_string(),
                configured: rules.is_configured(kind),
            })
            .collect(),
    }
}

pub(crate) fn classified_row(item: &ClassifiedTransaction) -> ClassifiedRow {
    ClassifiedRow {
        row: item.record.row,
        amount: item.record.amount,
        country: item.record.country.clone(),
        time: item.record.time.clone(),
        customer: item.record.customer.clone(),
        risk_label: item.result.risk_label,
        flagged: item.result.flagged,
        reasons: item.result.reasons.clone(),
        fraud_check: item.result.fraud_check(),
    }
}

pub(crate) fn summary_message(summary: &SummaryStats) -> String {
    let noun = if summary.total_count == 1 {
        "transaction"
    } else {
        "transactions"
    };
    format!(
        "Screened {} {noun}: {} flagged, {} clear.",
        summary.total_count, summary.flagged_count, summary.clear_count
    )
}
