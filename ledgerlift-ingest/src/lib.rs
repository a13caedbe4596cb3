//! ledgerlift-ingest: statement extraction through a generative-AI service and
//! sequential batch orchestration over uploaded documents.

pub mod batch;
pub mod error;
pub mod extractor;
pub mod gemini;
pub mod payload;
pub mod prompt;
pub mod types;

pub use batch::{BatchError, BatchEvent, BatchSession};
pub use error::ExtractionError;
pub use extractor::StatementExtractor;
pub use gemini::{GeminiClient, GeminiSettings};
pub use types::{FileContent, FileInput, ACCEPTED_MIME_TYPES};
