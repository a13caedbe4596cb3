//! BatchSession: runs a user's file selection through an extractor.
//!
//! Files are processed strictly one at a time: each extraction is awaited
//! before the next starts, and the caller is notified between files. A failing
//! file becomes a failed outcome; it never stops the batch.

use ledgerlift_core::{BatchProgress, ExtractionResult, FileOutcome};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::extractor::StatementExtractor;
use crate::types::FileInput;

pub const NO_VALID_FILES_MESSAGE: &str = "Please upload valid PDF or Image files.";

/// Batch-level rejection, raised before any file is processed.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BatchError {
    #[error("{}", NO_VALID_FILES_MESSAGE)]
    NoValidFiles,
}

/// Notifications emitted while a batch runs.
#[derive(Debug, Clone, Copy)]
pub enum BatchEvent<'a> {
    /// Progress changed (replaces the previous value)
    Progress(&'a BatchProgress),
    /// A file finished; carries every outcome recorded so far
    Outcomes(&'a [FileOutcome]),
}

/// Owns the state of one batch run. Starting another run resets it.
#[derive(Debug, Default)]
pub struct BatchSession {
    progress: BatchProgress,
    outcomes: Vec<FileOutcome>,
}

impl BatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> &BatchProgress {
        &self.progress
    }

    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    pub fn reset(&mut self) {
        self.progress = BatchProgress::Idle;
        self.outcomes.clear();
    }

    fn set_progress(&mut self, progress: BatchProgress, on_event: &mut impl FnMut(BatchEvent<'_>)) {
        self.progress = progress;
        on_event(BatchEvent::Progress(&self.progress));
    }

    /// Process `files` in order and return the outcomes.
    ///
    /// Files outside the accepted MIME types are dropped without an outcome.
    /// If that leaves nothing, the batch fails with `NoValidFiles`.
    pub async fn run<E>(
        &mut self,
        extractor: &E,
        files: Vec<FileInput>,
        mut on_event: impl FnMut(BatchEvent<'_>),
    ) -> Result<&[FileOutcome], BatchError>
    where
        E: StatementExtractor + ?Sized,
    {
        self.reset();

        let selected = files.len();
        let accepted: Vec<FileInput> = files
            .into_iter()
            .filter(|f| {
                let ok = f.is_accepted();
                if !ok {
                    debug!(file = %f.name, mime_type = %f.mime_type, "skipping unsupported file");
                }
                ok
            })
            .collect();

        if accepted.is_empty() {
            warn!(selected, "no supported files in selection");
            self.set_progress(
                BatchProgress::Error {
                    message: NO_VALID_FILES_MESSAGE.to_string(),
                },
                &mut on_event,
            );
            return Err(BatchError::NoValidFiles);
        }

        let total = accepted.len();
        info!(total, skipped = selected - total, "batch started");
        self.set_progress(
            BatchProgress::Processing {
                total,
                current: 0,
                file_name: None,
            },
            &mut on_event,
        );

        for (i, file) in accepted.iter().enumerate() {
            self.set_progress(
                BatchProgress::Processing {
                    total,
                    current: i + 1,
                    file_name: Some(file.name.clone()),
                },
                &mut on_event,
            );

            let outcome = match process_file(extractor, file).await {
                Ok(result) => {
                    debug!(file = %file.name, transactions = result.transactions.len(), "file processed");
                    FileOutcome::success(&file.name, result)
                }
                Err(e) => {
                    warn!(file = %file.name, error = %e, local = e.is_local(), "file failed");
                    FileOutcome::failure(&file.name, e.to_string())
                }
            };

            self.outcomes.push(outcome);
            on_event(BatchEvent::Outcomes(&self.outcomes));
        }

        self.set_progress(BatchProgress::Complete, &mut on_event);
        let failed = self.outcomes.iter().filter(|o| !o.is_success()).count();
        info!(total, failed, "batch complete");

        Ok(&self.outcomes)
    }
}

async fn process_file<E>(extractor: &E, file: &FileInput) -> Result<ExtractionResult, ExtractionError>
where
    E: StatementExtractor + ?Sized,
{
    let bytes = file.load().await?;
    extractor.extract(&bytes, &file.mime_type).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{GeminiClient, GeminiSettings};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use ledgerlift_core::{BankIdentity, Transaction, TransactionType};
    use std::sync::Mutex;

    /// Documents whose bytes are `b"fail"` error out; others yield one
    /// transaction described by the document text.
    #[derive(Default)]
    struct ScriptedExtractor {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl StatementExtractor for ScriptedExtractor {
        async fn extract(
            &self,
            document: &[u8],
            _mime_type: &str,
        ) -> Result<ExtractionResult, ExtractionError> {
            let text = String::from_utf8_lossy(document).to_string();
            self.calls.lock().unwrap().push(text.clone());
            if text == "fail" {
                return Err(ExtractionError::EmptyResponse);
            }
            let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
            Ok(ExtractionResult::new(
                BankIdentity::Oriental,
                vec![Transaction::new(date, text, 10.0, TransactionType::Debit)],
            ))
        }
    }

    fn pdf(name: &str, body: &str) -> FileInput {
        FileInput::from_bytes(name, "application/pdf", body.as_bytes().to_vec())
    }

    #[derive(Default)]
    struct Recorded {
        progress: Vec<BatchProgress>,
        outcome_lengths: Vec<usize>,
    }

    async fn run_recorded<E: StatementExtractor>(
        session: &mut BatchSession,
        extractor: &E,
        files: Vec<FileInput>,
    ) -> (Result<usize, BatchError>, Recorded) {
        let mut rec = Recorded::default();
        let res = session
            .run(extractor, files, |ev| match ev {
                BatchEvent::Progress(p) => rec.progress.push(p.clone()),
                BatchEvent::Outcomes(o) => rec.outcome_lengths.push(o.len()),
            })
            .await
            .map(|o| o.len());
        (res, rec)
    }

    #[tokio::test]
    async fn test_no_accepted_files_is_global_error() {
        let ex = ScriptedExtractor::default();
        let mut session = BatchSession::new();
        let files = vec![
            FileInput::from_bytes("notes.txt", "text/plain", b"x".to_vec()),
            FileInput::from_bytes("pic.gif", "image/gif", b"x".to_vec()),
        ];

        let (res, rec) = run_recorded(&mut session, &ex, files).await;

        assert_eq!(res, Err(BatchError::NoValidFiles));
        assert!(session.outcomes().is_empty());
        assert!(ex.calls.lock().unwrap().is_empty());
        assert_eq!(
            rec.progress,
            vec![BatchProgress::Error {
                message: NO_VALID_FILES_MESSAGE.to_string()
            }]
        );
        assert!(rec.outcome_lengths.is_empty());
    }

    #[tokio::test]
    async fn test_empty_selection_is_global_error() {
        let ex = ScriptedExtractor::default();
        let mut session = BatchSession::new();
        let (res, _) = run_recorded(&mut session, &ex, vec![]).await;
        assert_eq!(res, Err(BatchError::NoValidFiles));
    }

    #[tokio::test]
    async fn test_middle_failure_does_not_abort() {
        let ex = ScriptedExtractor::default();
        let mut session = BatchSession::new();
        let files = vec![pdf("one.pdf", "first"), pdf("two.pdf", "fail"), pdf("three.pdf", "third")];

        let (res, rec) = run_recorded(&mut session, &ex, files).await;
        assert_eq!(res, Ok(3));

        let out = session.outcomes();
        assert_eq!(out.len(), 3);
        assert!(out[0].is_success());
        assert!(!out[1].is_success());
        assert!(!out[1].error().unwrap().is_empty());
        assert!(out[2].is_success());

        assert_eq!(out[0].file_name, "one.pdf");
        assert_eq!(out[0].result().unwrap().transactions[0].description, "first");
        assert_eq!(out[2].result().unwrap().transactions[0].description, "third");
        assert_eq!(out[2].result().unwrap().bank, BankIdentity::Oriental);

        assert_eq!(session.progress(), &BatchProgress::Complete);
        assert_eq!(rec.outcome_lengths, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_progress_indices_rise_one_by_one() {
        let ex = ScriptedExtractor::default();
        let mut session = BatchSession::new();
        let files = vec![pdf("a.pdf", "a"), pdf("b.pdf", "b"), pdf("c.pdf", "c"), pdf("d.pdf", "d")];

        let (_, rec) = run_recorded(&mut session, &ex, files).await;

        let indices: Vec<usize> = rec
            .progress
            .iter()
            .filter_map(|p| match p {
                BatchProgress::Processing { current, file_name: Some(_), total } => {
                    assert_eq!(*total, 4);
                    Some(*current)
                }
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);

        assert_eq!(
            rec.progress.first(),
            Some(&BatchProgress::Processing {
                total: 4,
                current: 0,
                file_name: None
            })
        );
        assert_eq!(rec.progress.last(), Some(&BatchProgress::Complete));
    }

    #[tokio::test]
    async fn test_unsupported_files_dropped_silently_and_order_kept() {
        let ex = ScriptedExtractor::default();
        let mut session = BatchSession::new();
        let files = vec![
            pdf("z.pdf", "z"),
            FileInput::from_bytes("skip.txt", "text/plain", b"skip".to_vec()),
            FileInput::from_bytes("a.png", "image/png", b"a".to_vec()),
            FileInput::from_bytes("m.webp", "image/webp", b"m".to_vec()),
            FileInput::from_bytes("k.jpg", "image/jpeg", b"k".to_vec()),
        ];

        let (res, _) = run_recorded(&mut session, &ex, files).await;
        assert_eq!(res, Ok(4));

        let names: Vec<_> = session.outcomes().iter().map(|o| o.file_name.as_str()).collect();
        assert_eq!(names, vec!["z.pdf", "a.png", "m.webp", "k.jpg"]);
        assert_eq!(*ex.calls.lock().unwrap(), vec!["z", "a", "m", "k"]);
    }

    #[tokio::test]
    async fn test_new_batch_discards_previous_state() {
        let ex = ScriptedExtractor::default();
        let mut session = BatchSession::new();
        run_recorded(&mut session, &ex, vec![pdf("a.pdf", "a"), pdf("b.pdf", "b")]).await;
        assert_eq!(session.outcomes().len(), 2);

        run_recorded(&mut session, &ex, vec![pdf("c.pdf", "c")]).await;
        assert_eq!(session.outcomes().len(), 1);
        assert_eq!(session.outcomes()[0].file_name, "c.pdf");
    }

    #[tokio::test]
    async fn test_unreadable_file_is_a_file_failure() {
        let ex = ScriptedExtractor::default();
        let mut session = BatchSession::new();
        let files = vec![FileInput::from_path("/no/such/dir/missing.pdf"), pdf("ok.pdf", "ok")];

        let (res, _) = run_recorded(&mut session, &ex, files).await;
        assert_eq!(res, Ok(2));
        assert!(session.outcomes()[0].error().unwrap().contains("missing.pdf"));
        assert!(session.outcomes()[1].is_success());
        assert_eq!(session.progress(), &BatchProgress::Complete);
    }

    #[tokio::test]
    async fn test_missing_credential_fails_every_file_the_same_way() {
        let client = GeminiClient::new(None, GeminiSettings::default()).unwrap();
        let mut session = BatchSession::new();
        let files = vec![pdf("a.pdf", "a"), pdf("b.pdf", "b"), pdf("c.pdf", "c")];

        let (res, _) = run_recorded(&mut session, &client, files).await;
        assert_eq!(res, Ok(3));

        let expected = ExtractionError::MissingCredential.to_string();
        for o in session.outcomes() {
            assert_eq!(o.error(), Some(expected.as_str()));
        }
        assert_eq!(session.progress(), &BatchProgress::Complete);
    }

    #[tokio::test]
    async fn test_ids_unique_within_batch() {
        let ex = ScriptedExtractor::default();
        let mut session = BatchSession::new();
        let files = (0..20).map(|i| pdf(&format!("{i}.pdf"), "x")).collect();
        run_recorded(&mut session, &ex, files).await;

        let mut ids: Vec<_> = session.outcomes().iter().map(|o| o.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }
}
