//! ledgerlift-core: statement data model shared by extraction, batching and export.

pub mod bank;
pub mod outcome;
pub mod progress;
pub mod statement;

pub use bank::BankIdentity;
pub use outcome::{FileOutcome, OutcomeStatus};
pub use progress::BatchProgress;
pub use statement::{ExtractionResult, Transaction, TransactionType};
