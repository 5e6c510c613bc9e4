mod document_loader;
mod generation_client;
mod model_registry;

pub use document_loader::*;
pub use generation_client::*;
pub use model_registry::*;
