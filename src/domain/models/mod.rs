mod allow_list;
mod chat_message;
mod chat_session;
mod generate_request;
mod model_identifier;
mod source_artifact;

pub use allow_list::*;
pub use chat_message::*;
pub use chat_session::*;
pub use generate_request::*;
pub use model_identifier::*;
pub use source_artifact::*;
