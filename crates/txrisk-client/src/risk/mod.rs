pub mod classify;
pub mod rules;
pub mod summary;

pub use classify::{
    ClassificationResult, ClassifiedTransaction, RiskLabel, classify, classify_frame,
};
pub use rules::{DEFAULT_AMOUNT_THRESHOLD, RuleKind, RuleSet};
pub use summary::{AmountByLabel, ReasonCount, SummaryStats, summarize};
