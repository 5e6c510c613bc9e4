mod ask_document;
mod ask_image;
mod chat_turn;
pub mod filter_models;
mod list_models;
mod pull_model;
pub mod reassemble_stream;

pub use ask_document::*;
pub use ask_image::*;
pub use chat_turn::*;
pub use filter_models::{allowed, availability, missing};
pub use list_models::*;
pub use pull_model::*;
pub use reassemble_stream::{reassemble, ResponseFragment};
