use ledgerlift_core::{Transaction, TransactionType};

/// Totals shown next to an extracted statement
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatementSummary {
    pub count: usize,
    pub total_debits: f64,
    pub total_credits: f64,
}

impl StatementSummary {
    pub fn from_transactions(txns: &[Transaction]) -> Self {
        txns.iter().fold(Self::default(), |mut s, t| {
            s.count += 1;
            match t.kind {
                TransactionType::Debit => s.total_debits += t.amount,
                TransactionType::Credit => s.total_credits += t.amount,
            }
            s
        })
    }

    /// Credits minus debits
    pub fn net(&self) -> f64 {
        self.total_credits - self.total_debits
    }
}
