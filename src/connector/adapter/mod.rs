mod file_document_loader;
mod ollama_client;

pub use file_document_loader::*;
pub use ollama_client::*;
