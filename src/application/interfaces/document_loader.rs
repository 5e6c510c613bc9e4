use std::path::Path;

use async_trait::async_trait;

use crate::domain::{AdapterError, SourceArtifact};

/// Turns an uploaded file into the artifact a chat session is about.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Read and decode the file at `path`.
    async fn load_path(&self, path: &Path) -> Result<SourceArtifact, AdapterError>;

    /// Decode already-read bytes. `file_name` is only used to detect the type.
    ///
    /// Files outside the accepted types fail with
    /// [`AdapterError::UnsupportedInput`].
    fn load_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<SourceArtifact, AdapterError>;
}
