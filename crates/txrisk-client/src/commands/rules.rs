use crate::ClientResult;
use crate::commands::common::rules_view;
use crate::config::{RuleOverrides, resolve_rules};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::RulesData;

pub fn show(overrides: &RuleOverrides) -> ClientResult<SuccessEnvelope> {
    let resolved = resolve_rules(overrides)?;
    success(
        "rules",
        RulesData {
            rules: rules_view(&resolved),
        },
    )
}
