pub mod input;
pub(crate) mod parse;

use serde::Serialize;

pub use parse::load_transactions;

pub const AMOUNT_COLUMN: &str = "Amount";
pub const COUNTRY_COLUMN: &str = "Country";
pub const TIME_COLUMN: &str = "Time";
pub const CUSTOMER_COLUMN: &str = "Customer";

/// One parsed input row.
///
/// `fields` keeps every raw cell of the row in header order so an export
/// can reproduce the source exactly, including columns no rule reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub row: usize,
    pub amount: f64,
    pub country: Option<String>,
    pub time: Option<String>,
    pub customer: Option<String>,
    #[serde(skip)]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionFrame {
    pub headers: Vec<String>,
    pub records: Vec<TransactionRecord>,
}

impl TransactionFrame {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
