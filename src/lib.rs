pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    AskDocumentUseCase, AskImageUseCase, ChatTurnUseCase, DocumentLoader, GenerationClient,
    ListModelsUseCase, ModelRegistry, PullModelUseCase,
};

pub use cli::Commands;

pub use connector::api::{Container, ContainerConfig, Router};
pub use connector::{FileDocumentLoader, OllamaClient};

pub use domain::{
    AdapterError, AllowList, Capability, ChatMessage, ChatSession, DocumentKind, EncodedImage,
    GenerateRequest, ModelAvailability, ModelIdentifier, Role, SourceArtifact,
};
