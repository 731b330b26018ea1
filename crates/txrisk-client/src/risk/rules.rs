use std::collections::BTreeSet;

use serde::Serialize;

use crate::load::TransactionRecord;

pub const DEFAULT_AMOUNT_THRESHOLD: f64 = 10_000.0;

/// The rules a record can trigger, in evaluation order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    AmountOverThreshold,
    CountryNotAllowed,
    TimePatternMatch,
}

impl RuleKind {
    pub const ALL: [RuleKind; 3] = [
        RuleKind::AmountOverThreshold,
        RuleKind::CountryNotAllowed,
        RuleKind::TimePatternMatch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AmountOverThreshold => "amount_over_threshold",
            Self::CountryNotAllowed => "country_not_allowed",
            Self::TimePatternMatch => "time_pattern_match",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::AmountOverThreshold => "High transaction amount",
            Self::CountryNotAllowed => "Unusual country",
            Self::TimePatternMatch => "Odd transaction time",
        }
    }
}

/// Threshold, membership, and prefix predicates applied to every record.
///
/// Notes:
/// - The amount rule is always active and uses a strict `>` comparison.
/// - The country and time rules only run when configured, and only against
///   records that carry the field. A missing field never fires a rule.
/// - The country and time predicates are illustrative placeholders, not
///   validated fraud signals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSet {
    pub amount_threshold: f64,
    pub country_allow_list: Option<BTreeSet<String>>,
    pub time_prefix: Option<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            amount_threshold: DEFAULT_AMOUNT_THRESHOLD,
            country_allow_list: None,
            time_prefix: None,
        }
    }
}

impl RuleSet {
    pub fn with_amount_threshold(mut self, amount_threshold: f64) -> Self {
        self.amount_threshold = amount_threshold;
        self
    }

    /// Entries are trimmed; an empty list leaves the country rule unconfigured.
    pub fn with_country_allow_list<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = countries
            .into_iter()
            .map(|country| country.as_ref().trim().to_string())
            .collect::<BTreeSet<String>>();
        self.country_allow_list = if allowed.is_empty() {
            None
        } else {
            Some(allowed)
        };
        self
    }

    /// Trimmed to match how `Time` cells are read.
    pub fn with_time_prefix(mut self, prefix: &str) -> Self {
        self.time_prefix = Some(prefix.trim().to_string());
        self
    }

    pub fn is_configured(&self, kind: RuleKind) -> bool {
        match kind {
            RuleKind::AmountOverThreshold => true,
            RuleKind::CountryNotAllowed => self.country_allow_list.is_some(),
            RuleKind::TimePatternMatch => self.time_prefix.is_some(),
        }
    }

    pub fn fires(&self, kind: RuleKind, record: &TransactionRecord) -> bool {
        match kind {
            RuleKind::AmountOverThreshold => record.amount > self.amount_threshold,
            RuleKind::CountryNotAllowed => {
                match (&self.country_allow_list, record.country.as_deref()) {
                    (Some(allowed), Some(country)) => !allowed.contains(country),
                    _ => false,
                }
            }
            RuleKind::TimePatternMatch => match (&self.time_prefix, record.time.as_deref()) {
                (Some(prefix), Some(time)) => time.starts_with(prefix.as_str()),
                _ => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_AMOUNT_THRESHOLD, RuleKind, RuleSet};
    use crate::load::TransactionRecord;

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

    #[test]
    fn default_rule_set_only_checks_amount() {
        let rules = RuleSet::default();
        assert_eq!(rules.amount_threshold, DEFAULT_AMOUNT_THRESHOLD);
        assert!(rules.is_configured(RuleKind::AmountOverThreshold));
        assert!(!rules.is_configured(RuleKind::CountryNotAllowed));
        assert!(!rules.is_configured(RuleKind::TimePatternMatch));
    }

    #[test]
    fn amount_rule_is_strictly_greater_than() {
        let rules = RuleSet::default().with_amount_threshold(5000.0);
        assert!(!rules.fires(RuleKind::AmountOverThreshold, &record(5000.0, None, None)));
        assert!(rules.fires(RuleKind::AmountOverThreshold, &record(5000.01, None, None)));
    }

    #[test]
    fn country_rule_skips_records_without_country() {
        let rules = RuleSet::default().with_country_allow_list(["Nigeria", "USA", "UK"]);
        assert!(!rules.fires(RuleKind::CountryNotAllowed, &record(1.0, None, None)));
        assert!(!rules.fires(RuleKind::CountryNotAllowed, &record(1.0, Some("UK"), None)));
        assert!(rules.fires(RuleKind::CountryNotAllowed, &record(1.0, Some("France"), None)));
    }

    #[test]
    fn country_rule_is_inactive_without_allow_list() {
        let rules = RuleSet::default();
        assert!(!rules.fires(RuleKind::CountryNotAllowed, &record(1.0, Some("France"), None)));
    }

    #[test]
    fn empty_allow_list_leaves_rule_unconfigured() {
        let rules = RuleSet::default().with_country_allow_list(Vec::<String>::new());
        assert!(!rules.is_configured(RuleKind::CountryNotAllowed));
    }

    #[test]
    fn allow_list_entries_are_trimmed() {
        let rules = RuleSet::default().with_country_allow_list([" USA "]);
        assert!(!rules.fires(RuleKind::CountryNotAllowed, &record(1.0, Some("USA"), None)));
    }

    #[test]
    fn time_rule_matches_prefix() {
        let rules = RuleSet::default().with_time_prefix("2");
        assert!(rules.fires(RuleKind::TimePatternMatch, &record(1.0, None, Some("23:15"))));
        assert!(!rules.fires(RuleKind::TimePatternMatch, &record(1.0, None, Some("14:00"))));
        assert!(!rules.fires(RuleKind::TimePatternMatch, &record(1.0, None, None)));
    }

    #[test]
    fn time_prefix_is_trimmed() {
        let rules = RuleSet::default().with_time_prefix(" 2 ");
        assert_eq!(rules.time_prefix.as_deref(), Some("2"));
        assert!(rules.fires(RuleKind::TimePatternMatch, &record(1.0, None, Some("23:15"))));
    }

    #[test]
    fn rule_kinds_have_stable_codes() {
        let codes = RuleKind::ALL.map(RuleKind::as_str);
        assert_eq!(
            codes,
            [
                "amount_over_threshold",
                "country_not_allowed",
                "time_pattern_match"
            ]
        );
    }
}
