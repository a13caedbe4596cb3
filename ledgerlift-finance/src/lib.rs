//! ledgerlift-finance: ledger row mapping, spreadsheet/CSV export and statement totals

pub mod export;
pub mod filename;
pub mod ledger;
pub mod summary;

pub use export::{export_statement, export_statement_unique, write_rows, ExportError, ExportFormat};
pub use filename::{export_filename, ExportNames};
pub use ledger::{LedgerRow, COLUMNS};
pub use summary::StatementSummary;
