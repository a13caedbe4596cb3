use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use ledgerlift_core::BankIdentity;
use regex::Regex;

use crate::export::ExportFormat;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Name of the exported file.
///
/// - with an original file name: `<name minus final extension>_parsed.<ext>`
/// - without: `<Bank_Name>_Statement_<YYYY-MM-DD>.<ext>`
pub fn export_filename(
    bank: BankIdentity,
    original: Option<&str>,
    today: NaiveDate,
    format: ExportFormat,
) -> String {
    let ext = format.extension();
    match original {
        Some(name) => {
            // Only the base name; callers may hand us a full path.
            let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
            let stem = base.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(base);
            format!("{stem}_parsed.{ext}")
        }
        None => {
            let bank_part = WHITESPACE_RUN.replace_all(bank.display_name(), "_");
            format!("{bank_part}_Statement_{}.{ext}", today.format("%Y-%m-%d"))
        }
    }
}

/// Output paths handed out during one run.
///
/// A name that was already handed out, or that exists on disk, gets a
/// ` (n)` suffix before its extension: `jan_parsed (1).xlsx`.
#[derive(Debug, Default)]
pub struct ExportNames {
    taken: HashSet<PathBuf>,
}

impl ExportNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, dir: &Path, name: &str) -> PathBuf {
        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (name, None),
        };

        let mut path = dir.join(name);
        let mut n = 1;
        while self.taken.contains(&path) || path.exists() {
            let next = match ext {
                Some(ext) => format!("{stem} ({n}).{ext}"),
                None => format!("{stem} ({n})"),
            };
            path = dir.join(next);
            n += 1;
        }

        self.taken.insert(path.clone());
        path
    }
}
