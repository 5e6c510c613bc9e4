//! # Domain Layer
//!
//! Chat sessions, uploaded artifacts, model identifiers and the error taxonomy.
//! This layer knows nothing about HTTP or the terminal.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
