//! Generic ledger layout ("batch entry" style) for exported statements.
//!
//! Columns, in order:
//! Date, Description, Reference, Debit, Credit, Amount, Type

use ledgerlift_core::{Transaction, TransactionType};

/// (header, display width in characters)
pub const COLUMNS: [(&str, f64); 7] = [
    ("Date", 12.0),
    ("Description", 40.0),
    ("Reference", 15.0),
    ("Debit", 12.0),
    ("Credit", 12.0),
    ("Amount", 12.0),
    ("Type", 10.0),
];

/// One exported row. Exactly one of `debit`/`credit` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub date: String,
    pub description: String,
    /// Empty when the statement had no reference
    pub reference: String,
    pub debit: Option<f64>,
    pub credit: Option<f64>,
    /// Negative for debits
    pub amount: f64,
    pub kind: TransactionType,
}

impl LedgerRow {
    pub fn from_transaction(t: &Transaction) -> Self {
        let (debit, credit) = match t.kind {
            TransactionType::Debit => (Some(t.amount), None),
            TransactionType::Credit => (None, Some(t.amount)),
        };
        Self {
            date: t.date.format("%Y-%m-%d").to_string(),
            description: t.description.clone(),
            reference: t.reference.clone().unwrap_or_default(),
            debit,
            credit,
            amount: t.signed_amount(),
            kind: t.kind,
        }
    }

    pub fn from_transactions(txns: &[Transaction]) -> Vec<Self> {
        txns.iter().map(Self::from_transaction).collect()
    }
}

pub fn header() -> [&'static str; 7] {
    COLUMNS.map(|(name, _)| name)
}
