use anyhow::{bail, Result};

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ModelsController};

pub struct Router<'a> {
    models_controller: ModelsController<'a>,
    ask_controller: AskController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            models_controller: ModelsController::new(container),
            ask_controller: AskController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Models => self.models_controller.models().await,
            Commands::Pull { model } => self.models_controller.pull(model).await,
            Commands::Ask {
                file,
                model,
                question,
            } => self.ask_controller.ask(file, model, question).await,
            Commands::Chat { .. } => bail!("chat runs interactively and is not routed"),
        }
    }
}
