use async_trait::async_trait;

use crate::domain::{AdapterError, GenerateRequest};

/// Transport to the generation endpoint.
///
/// Implementors return the raw response body of a successful (2xx) call and
/// map transport failures and error statuses to [`AdapterError::Unreachable`].
/// Decoding the body is left to the caller, because the document and image
/// paths receive differently shaped bodies from the same endpoint.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, AdapterError>;
}
