use async_trait::async_trait;

use crate::domain::{AdapterError, ModelIdentifier};

/// Model-management side of the server: what is installed, and fetching more.
#[async_trait]
pub trait ModelRegistry: Send + Sync {
    /// Names of the models installed on the server.
    async fn list_models(&self) -> Result<Vec<ModelIdentifier>, AdapterError>;

    /// Block until `model` is available locally. Any failure is reported as
    /// [`AdapterError::ProvisioningFailure`].
    async fn pull_model(&self, model: &ModelIdentifier) -> Result<(), AdapterError>;
}
