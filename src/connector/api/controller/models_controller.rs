use anyhow::{bail, Result};

use crate::connector::api::spinner::with_spinner;
use crate::domain::{Capability, ModelIdentifier};

use super::super::Container;
use super::chat_controller::format_availability;

pub struct ModelsController<'a> {
    container: &'a Container,
}

impl<'a> ModelsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn models(&self) -> Result<String> {
        let use_case = self.container.list_models_use_case();
        let mut sections = Vec::with_capacity(2);

        for capability in [Capability::Text, Capability::Vision] {
            let availability = use_case
                .execute(self.container.allow_list(capability))
                .await?;
            sections.push(format_availability(capability, &availability));
        }

        Ok(format!(
            "Ollama server: {}\n\n{}",
            self.container.host(),
            sections.join("\n\n")
        ))
    }

    pub async fn pull(&self, model: ModelIdentifier) -> Result<String> {
        if !self.container.is_permitted(&model) {
            bail!("{model} is not an allowed model");
        }
        let use_case = self.container.pull_model_use_case();
        with_spinner(format!("Downloading {model}..."), use_case.execute(&model)).await?;
        Ok(format!("Downloaded model: {model}"))
    }
}
