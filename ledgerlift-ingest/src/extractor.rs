use async_trait::async_trait;
use ledgerlift_core::ExtractionResult;

use crate::error::ExtractionError;

/// Turns one document into a transaction list.
///
/// Implementations make at most one remote call per invocation and never retry;
/// the caller decides what to do with a failure.
#[async_trait]
pub trait StatementExtractor: Send + Sync {
    async fn extract(
        &self,
        document: &[u8],
        mime_type: &str,
    ) -> Result<ExtractionResult, ExtractionError>;
}
