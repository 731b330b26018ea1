use serde::Serialize;

use crate::risk::classify::{ClassifiedTransaction, RiskLabel};
use crate::risk::rules::RuleKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_count: usize,
    pub flagged_count: usize,
    pub clear_count: usize,
    pub amount_by_label: AmountByLabel,
    pub reason_counts: Vec<ReasonCount>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AmountByLabel {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReasonCount {
    pub rule: RuleKind,
    pub description: String,
    pub count: usize,
}

/// Reduces one analysis into counts and per-label amount totals.
pub fn summarize(classified: &[ClassifiedTransaction]) -> SummaryStats {
    let mut amount_by_label = AmountByLabel::default();
    let mut flagged_count = 0usize;

    for item in classified {
        match item.result.risk_label {
            RiskLabel::High => amount_by_label.high += item.record.amount,
            RiskLabel::Low => amount_by_label.low += item.record.amount,
        }
        if item.result.flagged {
            flagged_count += 1;
        }
    }

    let reason_counts = RuleKind::ALL
        .into_iter()
        .map(|rule| ReasonCount {
            rule,
            description: rule.description().to_string(),
            count: classified
                .iter()
                .filter(|item| item.result.reasons.contains(&rule))
                .count(),
        })
        .collect();

    SummaryStats {
        total_count: classified.len(),
        flagged_count,
        clear_count: classified.len() - flagged_count,
        amount_by_label,
        reason_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::summarize;
    use crate::load::load_transactions;
    use crate::risk::classify::classify_frame;
    use crate::risk::rules::{RuleKind, RuleSet};

    #[test]
    fn totals_split_by_label() {
        let frame = load_transactions(
            "Amount,Country\n15000,USA\n100,France\n250.5,UK\n20000,Peru\n",
        );
        assert!(frame.is_ok());
        if let Ok(frame) = frame {
            let rules = RuleSet::default().with_country_allow_list(["Nigeria", "USA", "UK"]);
            let summary = summarize(&classify_frame(&frame, &rules));

            assert_eq!(summary.total_count, 4);
            assert_eq!(summary.flagged_count, 3);
            assert_eq!(summary.clear_count, 1);
            assert_eq!(summary.amount_by_label.high, 35_100.0);
            assert_eq!(summary.amount_by_label.low, 250.5);

            let counts = summary
                .reason_counts
                .iter()
                .map(|entry| (entry.rule, entry.count))
                .collect::<Vec<(RuleKind, usize)>>();
            assert_eq!(
                counts,
                vec![
                    (RuleKind::AmountOverThreshold, 2),
                    (RuleKind::CountryNotAllowed, 2),
                    (RuleKind::TimePatternMatch, 0),
                ]
            );
        }
    }

    #[test]
    fn empty_analysis_summarizes_to_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_count, 0);
        assert_eq!(summary.flagged_count + summary.clear_count, 0);
        assert_eq!(summary.amount_by_label.high, 0.0);
        assert_eq!(summary.amount_by_label.low, 0.0);
    }

    #[test]
    fn flagged_and_clear_always_cover_every_row() {
        let bodies = [
            "Amount\n1\n",
            "Amount\n10001\n10000\n9999\n",
            "Amount,Time\n5,23:00\n5,11:00\n",
        ];
        let rules = RuleSet::default().with_time_prefix("2");
        for body in bodies {
            let frame = load_transactions(body);
            assert!(frame.is_ok());
            if let Ok(frame) = frame {
                let summary = summarize(&classify_frame(&frame, &rules));
                assert_eq!(
                    summary.flagged_count + summary.clear_count,
                    summary.total_count
                );
                assert_eq!(summary.total_count, frame.len());
            }
        }
    }
}
