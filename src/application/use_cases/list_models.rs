use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;

use crate::application::use_cases::filter_models::availability;
use crate::application::ModelRegistry;
use crate::domain::{AdapterError, AllowList, ModelAvailability};

pub struct ListModelsUseCase {
    registry: Arc<dyn ModelRegistry>,
}

impl ListModelsUseCase {
    pub fn new(registry: Arc<dyn ModelRegistry>) -> Self {
        Self { registry }
    }

    /// Installed models filtered through `allow_list`, plus the permitted ones
    /// that could still be pulled.
    pub async fn execute(&self, allow_list: &AllowList) -> Result<ModelAvailability, AdapterError> {
        let available: BTreeSet<_> = self.registry.list_models().await?.into_iter().collect();
        let result = availability(&available, allow_list);
        info!(
            "{} models installed, {} allowed, {} missing",
            available.len(),
            result.allowed.len(),
            result.missing.len()
        );
        Ok(result)
    }
}
