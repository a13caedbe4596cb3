//! Terminal front end for a batch run: progress, results list, per-file export.

use anyhow::{Context, Result};
use ledgerlift_core::{BatchProgress, FileOutcome};
use ledgerlift_finance::{export_statement, export_statement_unique, ExportFormat, ExportNames, StatementSummary};
use ledgerlift_ingest::payload::decode_payload;
use ledgerlift_ingest::{BatchEvent, BatchSession, FileInput, StatementExtractor};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const BAR_WIDTH: usize = 24;

#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub out_dir: PathBuf,
    pub format: ExportFormat,
    pub export: bool,
    pub dump_raw: bool,
}

/// Run one batch over `paths` and export every successful file.
pub async fn run_process<E>(extractor: &E, paths: Vec<PathBuf>, opts: &ProcessOptions) -> Result<()>
where
    E: StatementExtractor + ?Sized,
{
    let files: Vec<FileInput> = paths.into_iter().map(FileInput::from_path).collect();
    let mut session = BatchSession::new();

    let outcomes = session
        .run(extractor, files, |ev| match ev {
            BatchEvent::Progress(p) => {
                if let Some(line) = progress_line(p) {
                    eprintln!("{line}");
                }
            }
            BatchEvent::Outcomes(all) => {
                if let Some(last) = all.last() {
                    println!("{}", outcome_line(last));
                    io::stdout().flush().ok();
                }
            }
        })
        .await?;

    println!("\n{}", completion_line(outcomes));

    let mut names = ExportNames::new();
    if opts.dump_raw {
        dump_raw_payloads(outcomes, &opts.out_dir, &mut names);
    }
    if opts.export {
        export_outcomes(outcomes, &opts.out_dir, opts.format, &mut names);
    }

    Ok(())
}

/// Per-file export; a failed export is reported and the rest still run.
fn export_outcomes(outcomes: &[FileOutcome], out_dir: &Path, format: ExportFormat, names: &mut ExportNames) -> Vec<PathBuf> {
    let mut written = Vec::new();
    for o in outcomes {
        let Some(r) = o.result() else { continue };
        match export_statement_unique(&r.transactions, r.bank, Some(o.file_name.as_str()), out_dir, format, names) {
            Ok(p) => {
                println!("Exported {} -> {}", o.file_name, p.display());
                written.push(p);
            }
            Err(e) => eprintln!("Export failed for {}: {e}", o.file_name),
        }
    }
    written
}

/// Same failure scoping as `export_outcomes`.
fn dump_raw_payloads(outcomes: &[FileOutcome], out_dir: &Path, names: &mut ExportNames) -> Vec<PathBuf> {
    let mut written = Vec::new();
    for o in outcomes {
        let Some(raw) = o.result().and_then(|r| r.raw_text.as_deref()) else { continue };
        match write_raw_dump(out_dir, &o.file_name, raw, names) {
            Ok(p) => {
                println!("Raw payload: {}", p.display());
                written.push(p);
            }
            Err(e) => eprintln!("Raw dump failed for {}: {e:#}", o.file_name),
        }
    }
    written
}

/// Re-export a saved raw payload, replacing an earlier export of the same
/// name. Without `filename` the name is derived from the bank and today's date.
pub fn run_export(input: &Path, filename: Option<&str>, out_dir: &Path, format: ExportFormat) -> Result<PathBuf> {
    let text = fs::read_to_string(input).with_context(|| format!("read {}", input.display()))?;
    let result = decode_payload(&text).with_context(|| format!("decode {}", input.display()))?;
    let summary = StatementSummary::from_transactions(&result.transactions);
    println!("{} • {}", result.bank, summary_text(&summary));

    let p = export_statement(&result.transactions, result.bank, filename, out_dir, format)
        .with_context(|| format!("export {}", input.display()))?;
    println!("Exported -> {}", p.display());
    Ok(p)
}

fn write_raw_dump(out_dir: &Path, file_name: &str, raw: &str, names: &mut ExportNames) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    let stem = file_name.rsplit_once('.').map(|(s, _)| s).unwrap_or(file_name);
    let p = names.claim(out_dir, &format!("{stem}_raw.json"));
    fs::write(&p, raw).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn progress_line(p: &BatchProgress) -> Option<String> {
    match p {
        BatchProgress::Processing {
            total,
            current,
            file_name: Some(name),
        } => {
            let filled = ((p.fraction() * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
            Some(format!(
                "[{}{}] Processing {} of {}: {}",
                "#".repeat(filled),
                "-".repeat(BAR_WIDTH - filled),
                current,
                total,
                name
            ))
        }
        _ => None,
    }
}

pub fn outcome_line(o: &FileOutcome) -> String {
    match (o.result(), o.error()) {
        (Some(r), _) => {
            let s = StatementSummary::from_transactions(&r.transactions);
            format!("  ok   {} | {} • {}", o.file_name, r.bank, summary_text(&s))
        }
        (None, msg) => format!("  FAIL {} | {}", o.file_name, msg.unwrap_or("Unknown error")),
    }
}

fn summary_text(s: &StatementSummary) -> String {
    format!(
        "{} transactions | debits ${:.2} | credits ${:.2}",
        s.count, s.total_debits, s.total_credits
    )
}

pub fn completion_line(outcomes: &[FileOutcome]) -> String {
    let ok = outcomes.iter().filter(|o| o.is_success()).count();
    let failed = outcomes.len() - ok;
    if failed > 0 {
        format!("Processing complete. Successfully parsed {ok} files. Failed: {failed}.")
    } else {
        format!("Processing complete. Successfully parsed {ok} files.")
    }
}
