//! Per-document extraction failures.
//!
//! Every variant is scoped to one file: the batch loop turns it into that
//! file's outcome message and moves on.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error(
        "API key is missing. Set GEMINI_API_KEY (or API_KEY), or run: ledgerlift auth paste-api-key"
    )]
    MissingCredential,

    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("extraction request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("extraction service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("no data returned from the extraction service")]
    EmptyResponse,

    #[error("unexpected extraction payload: {0}")]
    MalformedPayload(String),
}

impl ExtractionError {
    /// True for failures raised before anything was sent over the network.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ExtractionError::MissingCredential | ExtractionError::Read { .. }
        )
    }
}
