use serde::Serialize;

use crate::load::{TransactionFrame, TransactionRecord};
use crate::risk::rules::{RuleKind, RuleSet};

pub const CLEAR_FRAUD_CHECK: &str = "Legit";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum RiskLabel {
    Low,
    High,
}

impl RiskLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub risk_label: RiskLabel,
    pub reasons: Vec<RuleKind>,
    pub flagged: bool,
}

impl ClassificationResult {
    fn from_reasons(reasons: Vec<RuleKind>) -> Self {
        let flagged = !reasons.is_empty();
        Self {
            risk_label: if flagged {
                RiskLabel::High
            } else {
                RiskLabel::Low
            },
            reasons,
            flagged,
        }
    }

    /// Reason descriptions joined with `", "`, or `Legit` when nothing fired.
    pub fn fraud_check(&self) -> String {
        if self.reasons.is_empty() {
            return CLEAR_FRAUD_CHECK.to_string();
        }
        self.reasons
            .iter()
            .map(|reason| reason.description())
            .collect::<Vec<&str>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedTransaction {
    pub record: TransactionRecord,
    pub result: ClassificationResult,
}

pub fn classify(record: &TransactionRecord, rules: &RuleSet) -> ClassificationResult {
    let reasons = RuleKind::ALL
        .into_iter()
        .filter(|kind| rules.fires(*kind, record))
        .collect();
    ClassificationResult::from_reasons(reasons)
}

pub fn classify_frame(frame: &TransactionFrame, rules: &RuleSet) -> Vec<ClassifiedTransaction> {
    let classified = frame
        .records
        .iter()
        .map(|record| ClassifiedTransaction {
            record: record.clone(),
            result: classify(record, rules),
        })
        .collect::<Vec<ClassifiedTransaction>>();

    tracing::debug!(
        rows = classified.len(),
        flagged = classified.iter().filter(|item| item.result.flagged).count(),
        "classified transactions"
    );

    classified
}

#[cfg(test)]
mod tests {
    use super::{RiskLabel, classify, classify_frame};
    use crate::load::{TransactionRecord, load_transactions};
    use crate::risk::rules::{RuleKind, RuleSet};

    fn record(amount: f64, country: Option<&str>, time: Option<&str>) -> TransactionRecord {
        TransactionRecord {
            row: 1,
            amount,
            country: country.map(str::to_string),
            time: time.map(str::to_string),
            customer: None,
            fields: Vec::new(),
        }
    }

    fn reference_rules() -> RuleSet {
        RuleSet::default()
            .with_amount_threshold(10_000.0)
            .with_country_allow_list(["Nigeria", "USA", "UK"])
            .with_time_prefix("2")
    }

    #[test]
    fn large_amount_flags_only_the_amount_rule() {
        let result = classify(&record(15_000.0, Some("USA"), Some("14:00")), &reference_rules());
        assert!(result.flagged);
        assert_eq!(result.risk_label, RiskLabel::High);
        assert_eq!(result.reasons, vec![RuleKind::AmountOverThreshold]);
        assert_eq!(result.fraud_check(), "High transaction amount");
    }

    #[test]
    fn unlisted_country_flags_only_the_country_rule() {
        let rules = RuleSet::default().with_country_allow_list(["Nigeria", "USA", "UK"]);
        let result = classify(&record(100.0, Some("France"), None), &rules);
        assert!(result.flagged);
        assert_eq!(result.reasons, vec![RuleKind::CountryNotAllowed]);
    }

    #[test]
    fn ordinary_record_is_clear() {
        let result = classify(&record(100.0, Some("USA"), None), &reference_rules());
        assert!(!result.flagged);
        assert_eq!(result.risk_label, RiskLabel::Low);
        assert!(result.reasons.is_empty());
        assert_eq!(result.fraud_check(), "Legit");
    }

    #[test]
    fn reasons_follow_rule_declaration_order() {
        let result = classify(&record(20_000.0, Some("Peru"), Some("23:59")), &reference_rules());
        assert_eq!(
            result.reasons,
            vec![
                RuleKind::AmountOverThreshold,
                RuleKind::CountryNotAllowed,
                RuleKind::TimePatternMatch,
            ]
        );
        assert_eq!(
            result.fraud_check(),
            "High transaction amount, Unusual country, Odd transaction time"
        );
    }

    #[test]
    fn amount_at_threshold_is_not_flagged() {
        let result = classify(&record(10_000.0, None, None), &RuleSet::default());
        assert!(!result.flagged);
    }

    #[test]
    fn classification_is_deterministic() {
        let rules = reference_rules();
        let input = record(12_500.0, Some("Chile"), Some("21:00"));
        assert_eq!(classify(&input, &rules), classify(&input, &rules));
    }

    #[test]
    fn label_flag_and_reasons_agree() {
        let rules = reference_rules();
        let amounts = [0.0, 9_999.99, 10_000.0, 10_000.01, 50_000.0];
        let countries = [None, Some("USA"), Some("Brazil")];
        let times = [None, Some("09:00"), Some("22:00")];
        for amount in amounts {
            for country in countries {
                for time in times {
                    let result = classify(&record(amount, country, time), &rules);
                    assert_eq!(result.flagged, !result.reasons.is_empty());
                    assert_eq!(result.flagged, result.risk_label == RiskLabel::High);
                }
            }
        }
    }

    #[test]
    fn classify_frame_keeps_source_order() {
        let frame = load_transactions("Amount\n20000\n5\n30000\n");
        assert!(frame.is_ok());
        if let Ok(frame) = frame {
            let classified = classify_frame(&frame, &RuleSet::default());
            let flags = classified
                .iter()
                .map(|item| (item.record.row, item.result.flagged))
                .collect::<Vec<(usize, bool)>>();
            assert_eq!(flags, vec![(1, true), (2, false), (3, true)]);
        }
    }
}
