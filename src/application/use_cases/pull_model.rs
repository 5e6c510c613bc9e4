use std::sync::Arc;

use tracing::{info, warn};

use crate::application::ModelRegistry;
use crate::domain::{AdapterError, ModelIdentifier};

/// Download a model onto the server. Blocks until the server reports the
/// outcome; there is no retry and no progress reporting.
pub struct PullModelUseCase {
    registry: Arc<dyn ModelRegistry>,
}

impl PullModelUseCase {
    pub fn new(registry: Arc<dyn ModelRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self, model: &ModelIdentifier) -> Result<(), AdapterError> {
        info!("Pulling model: {}", model);

        match self.registry.pull_model(model).await {
            Ok(()) => {
                info!("Downloaded model: {}", model);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to download model {}: {}", model, e);
                Err(e)
            }
        }
    }
}
