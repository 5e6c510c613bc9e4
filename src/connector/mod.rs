//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Ollama HTTP client (generation, model listing and pulls)
//! - Upload decoding (CSV, text, Word documents, images)
//! - Container, router and controllers driving the use cases

pub mod adapter;
pub mod api;

pub use adapter::*;
