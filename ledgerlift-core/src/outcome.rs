//! Per-file terminal record of a batch run

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::statement::ExtractionResult;

/// Either the extracted data or a human-readable failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success { data: ExtractionResult },
    Error { message: String },
}

/// One processed input file. Built once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileOutcome {
    /// Opaque id, unique within a batch
    pub id: String,
    /// Original file name as selected by the user
    pub file_name: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl FileOutcome {
    pub fn success(file_name: impl Into<String>, data: ExtractionResult) -> Self {
        Self {
            id: new_outcome_id(),
            file_name: file_name.into(),
            status: OutcomeStatus::Success { data },
        }
    }

    pub fn failure(file_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: new_outcome_id(),
            file_name: file_name.into(),
            status: OutcomeStatus::Error {
                message: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Success { .. })
    }

    pub fn result(&self) -> Option<&ExtractionResult> {
        match &self.status {
            OutcomeStatus::Success { data } => Some(data),
            OutcomeStatus::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Success { .. } => None,
            OutcomeStatus::Error { message } => Some(message),
        }
    }
}

fn new_outcome_id() -> String {
    Uuid::new_v4().simple().to_string()
}
