//! Batch progress state.
//!
//! Lifecycle: `Idle -> Processing (index rises by one per file) -> Complete`,
//! or `Idle -> Error` when the batch is rejected before any file runs.
//! Each transition replaces the whole value.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchProgress {
    #[default]
    Idle,
    Processing {
        total: usize,
        /// 1-based index of the file in flight; 0 before the first starts
        current: usize,
        file_name: Option<String>,
    },
    Complete,
    Error {
        message: String,
    },
}

impl BatchProgress {
    /// Share of the batch started so far, for a progress bar.
    pub fn fraction(&self) -> f64 {
        match self {
            BatchProgress::Processing { total, current, .. } if *total > 0 => {
                *current as f64 / *total as f64
            }
            BatchProgress::Complete => 1.0,
            _ => 0.0,
        }
    }
}
