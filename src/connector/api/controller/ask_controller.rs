use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::domain::ModelIdentifier;

use super::super::Container;
use super::chat_controller::{ChatController, ChatEvent, ChatOutcome};

/// Single question about a file, without an interactive loop.
pub struct AskController<'a> {
    chat: ChatController<'a>,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            chat: ChatController::new(container),
        }
    }

    pub async fn ask(
        &self,
        file: PathBuf,
        model: Option<ModelIdentifier>,
        question: String,
    ) -> Result<String> {
        let (mut state, started) = self.chat.start(&file, model).await?;
        if state.model().is_none() {
            bail!("{}", started.render());
        }

        match self.chat.dispatch(&mut state, ChatEvent::Ask(question)).await {
            ChatOutcome::Error(msg) => bail!(msg),
            outcome => Ok(outcome.render()),
        }
    }
}
