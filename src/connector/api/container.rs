use std::sync::Arc;

use tracing::debug;

use crate::application::{DocumentLoader, GenerationClient, ModelRegistry};
use crate::connector::adapter::{FileDocumentLoader, OllamaClient};
use crate::domain::{AllowList, Capability, ModelIdentifier};
use crate::{ChatTurnUseCase, ListModelsUseCase, PullModelUseCase};

pub struct ContainerConfig {
    /// Base URL of the Ollama server.
    pub host: String,
    /// Models offered for document chat.
    pub text_models: AllowList,
    /// Models offered for image chat.
    pub vision_models: AllowList,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            host: crate::connector::adapter::DEFAULT_HOST.to_string(),
            text_models: AllowList::text_default(),
            vision_models: AllowList::vision_default(),
        }
    }
}

pub struct Container {
    generation_client: Arc<dyn GenerationClient>,
    model_registry: Arc<dyn ModelRegistry>,
    loader: Arc<dyn DocumentLoader>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Self {
        debug!("Using Ollama server at {}", config.host);
        let client = Arc::new(OllamaClient::new(config.host.clone()));

        Self {
            generation_client: client.clone(),
            model_registry: client,
            loader: Arc::new(FileDocumentLoader::new()),
            config,
        }
    }

    pub fn chat_turn_use_case(&self) -> ChatTurnUseCase {
        ChatTurnUseCase::new(self.generation_client.clone())
    }

    pub fn list_models_use_case(&self) -> ListModelsUseCase {
        ListModelsUseCase::new(self.model_registry.clone())
    }

    pub fn pull_model_use_case(&self) -> PullModelUseCase {
        PullModelUseCase::new(self.model_registry.clone())
    }

    pub fn loader(&self) -> Arc<dyn DocumentLoader> {
        self.loader.clone()
    }

    pub fn allow_list(&self, capability: Capability) -> &AllowList {
        match capability {
            Capability::Text => &self.config.text_models,
            Capability::Vision => &self.config.vision_models,
        }
    }

    /// Whether `model` is on the text or the vision allow-list.
    pub fn is_permitted(&self, model: &ModelIdentifier) -> bool {
        self.config.text_models.contains(model) || self.config.vision_models.contains(model)
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }
}
