//! Transaction types produced by statement extraction

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::bank::BankIdentity;

/// Direction of money movement. Amounts are unsigned; this carries the sign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    #[serde(rename = "DEBIT")]
    Debit,
    #[serde(rename = "CREDIT")]
    Credit,
}

impl TransactionType {
    /// Wire form, as the extraction service and the exported sheet spell it.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Debit => "DEBIT",
            TransactionType::Credit => "CREDIT",
        }
    }
}

/// A single statement line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Posting date (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Vendor / payee only, codes and store numbers stripped
    pub description: String,
    /// Always >= 0
    #[serde(deserialize_with = "unsigned_amount")]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Check number or reference id, when the statement shows one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Transaction {
    /// Create a transaction; the amount is stored as its absolute value.
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        kind: TransactionType,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount: amount.abs(),
            kind,
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn is_debit(&self) -> bool {
        self.kind == TransactionType::Debit
    }

    pub fn is_credit(&self) -> bool {
        self.kind == TransactionType::Credit
    }

    /// Negative for debits, positive for credits
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Debit => -self.amount,
            TransactionType::Credit => self.amount,
        }
    }
}

fn unsigned_amount<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    f64::deserialize(d).map(f64::abs)
}

/// Everything one successful document call produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionResult {
    pub bank: BankIdentity,
    /// In extraction order, not necessarily chronological
    pub transactions: Vec<Transaction>,
    /// Pretty-printed service payload, kept for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl ExtractionResult {
    pub fn new(bank: BankIdentity, transactions: Vec<Transaction>) -> Self {
        Self {
            bank,
            transactions,
            raw_text: None,
        }
    }

    pub fn with_raw_text(mut self, raw: impl Into<String>) -> Self {
        self.raw_text = Some(raw.into());
        self
    }
}
