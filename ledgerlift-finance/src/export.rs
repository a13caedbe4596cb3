//! Write ledger rows to an XLSX workbook or a CSV file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ledgerlift_core::{BankIdentity, Transaction};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filename::{export_filename, ExportNames};
use crate::ledger::{header, LedgerRow, COLUMNS};

pub const SHEET_NAME: &str = "Transactions";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("spreadsheet write failed: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not create {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format {other:?} (expected xlsx or csv)")),
        }
    }
}

/// Export one statement into `out_dir`, returning the written path.
///
/// The file name follows `export_filename`, using today's local date when no
/// original file name is given. An existing file of that name is replaced.
pub fn export_statement(
    transactions: &[Transaction],
    bank: BankIdentity,
    original_filename: Option<&str>,
    out_dir: &Path,
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    let name = export_filename(bank, original_filename, today(), format);
    write_statement(transactions, bank, out_dir, out_dir.join(name), format)
}

/// Like `export_statement`, but never replaces a file written earlier in the
/// run or already on disk; the name gets a ` (n)` suffix instead.
pub fn export_statement_unique(
    transactions: &[Transaction],
    bank: BankIdentity,
    original_filename: Option<&str>,
    out_dir: &Path,
    format: ExportFormat,
    names: &mut ExportNames,
) -> Result<PathBuf, ExportError> {
    let name = export_filename(bank, original_filename, today(), format);
    let path = names.claim(out_dir, &name);
    write_statement(transactions, bank, out_dir, path, format)
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn write_statement(
    transactions: &[Transaction],
    bank: BankIdentity,
    out_dir: &Path,
    path: PathBuf,
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
        path: out_dir.display().to_string(),
        source,
    })?;

    let rows = LedgerRow::from_transactions(transactions);
    write_rows(&path, &rows, format)?;

    tracing::info!(path = %path.display(), rows = rows.len(), %bank, "statement exported");
    Ok(path)
}

pub fn write_rows(path: &Path, rows: &[LedgerRow], format: ExportFormat) -> Result<(), ExportError> {
    match format {
        ExportFormat::Xlsx => write_xlsx(path, rows),
        ExportFormat::Csv => write_csv(path, rows),
    }
}

fn write_xlsx(path: &Path, rows: &[LedgerRow]) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, (name, width)) in COLUMNS.iter().enumerate() {
            let col = col as u16;
            sheet.set_column_width(col, *width)?;
            sheet.write_string_with_format(0, col, *name, &bold)?;
        }

        for (i, row) in rows.iter().enumerate() {
            let r = (i + 1) as u32;
            sheet.write_string(r, 0, &row.date)?;
            sheet.write_string(r, 1, &row.description)?;
            sheet.write_string(r, 2, &row.reference)?;
            // Blank cell on the side that doesn't apply
            if let Some(debit) = row.debit {
                sheet.write_number(r, 3, debit)?;
            }
            if let Some(credit) = row.credit {
                sheet.write_number(r, 4, credit)?;
            }
            sheet.write_number(r, 5, row.amount)?;
            sheet.write_string(r, 6, row.kind.as_str())?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_csv(path: &Path, rows: &[LedgerRow]) -> Result<(), ExportError> {
    let mut w = csv::Writer::from_path(path)?;
    w.write_record(header())?;

    let money = |v: Option<f64>| v.map(|x| format!("{x:.2}")).unwrap_or_default();
    for row in rows {
        w.write_record([
            row.date.as_str(),
            row.description.as_str(),
            row.reference.as_str(),
            money(row.debit).as_str(),
            money(row.credit).as_str(),
            format!("{:.2}", row.amount).as_str(),
            row.kind.as_str(),
        ])?;
    }

    w.flush().map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}
