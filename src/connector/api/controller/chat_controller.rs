use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::connector::api::spinner::with_spinner;
use crate::domain::{
    AdapterError, Capability, ChatMessage, ChatSession, ModelAvailability, ModelIdentifier,
    SourceArtifact,
};

use super::super::Container;

/// Characters of document text shown when a session starts.
const PREVIEW_CHARS: usize = 2_000;

/// One user action in an interactive chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Ask a question about the current artifact.
    Ask(String),
    /// Replace the artifact. Always starts a new session.
    Upload(PathBuf),
    /// Download a model. On success the session restarts.
    Pull(ModelIdentifier),
    /// Switch to another allowed model.
    UseModel(ModelIdentifier),
    /// Show allowed and downloadable models for the current artifact.
    Models,
    /// Show the messages of the current session.
    History,
}

/// What a dispatched event produced, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Answer {
        model: ModelIdentifier,
        text: String,
    },
    /// The model answered with an empty string.
    NoResponse {
        model: ModelIdentifier,
    },
    SessionStarted {
        preview: String,
        model: Option<ModelIdentifier>,
        missing: Vec<ModelIdentifier>,
    },
    SessionRestarted {
        pulled: ModelIdentifier,
        model: Option<ModelIdentifier>,
    },
    ModelSelected(ModelIdentifier),
    Models {
        capability: Capability,
        availability: ModelAvailability,
    },
    History(Vec<ChatMessage>),
    Error(String),
}

impl ChatOutcome {
    pub fn render(&self) -> String {
        match self {
            ChatOutcome::Answer { text, .. } => text.clone(),
            ChatOutcome::NoResponse { model } => format!("No response received from {model}."),
            ChatOutcome::SessionStarted {
                preview,
                model,
                missing,
            } => {
                let mut out = format!("{preview}\n\n");
                match model {
                    Some(m) => out.push_str(&format!("Chatting with {m}. Type /help for commands.")),
                    None => {
                        out.push_str("No allowed models are available.");
                        if !missing.is_empty() {
                            out.push_str(&format!(
                                "\nDownload one with /pull <model>: {}",
                                join(missing.iter())
                            ));
                        }
                    }
                }
                out
            }
            ChatOutcome::SessionRestarted { pulled, model } => {
                let mut out = format!("Downloaded model: {pulled}. Session restarted.");
                if let Some(m) = model {
                    out.push_str(&format!("\nChatting with {m}."));
                }
                out
            }
            ChatOutcome::ModelSelected(m) => format!("Chatting with {m}."),
            ChatOutcome::Models {
                capability,
                availability,
            } => format_availability(*capability, availability),
            ChatOutcome::History(messages) => {
                if messages.is_empty() {
                    "No messages yet.".to_string()
                } else {
                    messages
                        .iter()
                        .map(ChatMessage::display_line)
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            ChatOutcome::Error(msg) => format!("Error: {msg}"),
        }
    }
}

pub(crate) fn format_availability(capability: Capability, availability: &ModelAvailability) -> String {
    let mut out = String::new();
    if !availability.has_allowed() {
        out.push_str(&format!("No allowed {} models are available.", capability.as_str()));
    } else {
        out.push_str(&format!("Available {} models:\n", capability.as_str()));
        for m in &availability.allowed {
            out.push_str(&format!("  {m}\n"));
        }
        out.pop();
    }
    if !availability.missing.is_empty() {
        out.push_str("\nDownloadable:\n");
        for m in &availability.missing {
            out.push_str(&format!("  {m}\n"));
        }
        out.pop();
    }
    out
}

fn join<'a>(models: impl Iterator<Item = &'a ModelIdentifier>) -> String {
    models.map(|m| m.as_str()).collect::<Vec<_>>().join(", ")
}

/// State of one interactive chat, owned by the caller and threaded through
/// every [`ChatController::dispatch`] call.
#[derive(Debug, Clone)]
pub struct ChatState {
    session: ChatSession,
    model: Option<ModelIdentifier>,
}

impl ChatState {
    pub fn new(session: ChatSession, model: Option<ModelIdentifier>) -> Self {
        Self { session, model }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn model(&self) -> Option<&ModelIdentifier> {
        self.model.as_ref()
    }
}

struct ModelChoice {
    model: Option<ModelIdentifier>,
    missing: Vec<ModelIdentifier>,
}

/// Turns chat events into calls on the use cases. Every failure is reported
/// as [`ChatOutcome::Error`]; nothing here ends the interaction.
pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Load `path` and open a session on it.
    pub async fn start(
        &self,
        path: &Path,
        requested: Option<ModelIdentifier>,
    ) -> Result<(ChatState, ChatOutcome), AdapterError> {
        let artifact = self.container.loader().load_path(path).await?;
        let choice = self.choose_model(artifact.capability(), requested).await?;
        Ok(self.open(artifact, choice))
    }

    fn open(&self, artifact: SourceArtifact, choice: ModelChoice) -> (ChatState, ChatOutcome) {
        let preview = artifact.preview(PREVIEW_CHARS);
        let session = ChatSession::new(artifact);
        info!("Started session {}", session.id());

        let outcome = ChatOutcome::SessionStarted {
            preview,
            model: choice.model.clone(),
            missing: choice.missing,
        };
        (ChatState::new(session, choice.model), outcome)
    }

    pub async fn dispatch(&self, state: &mut ChatState, event: ChatEvent) -> ChatOutcome {
        match event {
            ChatEvent::Ask(question) => self.ask(state, &question).await,
            ChatEvent::Upload(path) => self.upload(state, &path).await,
            ChatEvent::Pull(model) => self.pull(state, model).await,
            ChatEvent::UseModel(model) => self.use_model(state, model),
            ChatEvent::Models => self.models(state).await,
            ChatEvent::History => ChatOutcome::History(state.session.messages().to_vec()),
        }
    }

    async fn ask(&self, state: &mut ChatState, question: &str) -> ChatOutcome {
        if question.trim().is_empty() {
            return ChatOutcome::Error("Question must not be empty.".to_string());
        }
        let Some(model) = state.model.clone() else {
            return ChatOutcome::Error(
                "No allowed models are available. Use /models and /pull <model>.".to_string(),
            );
        };

        let turn = self.container.chat_turn_use_case();
        match turn.execute(&mut state.session, &model, question).await {
            Ok(text) if text.is_empty() => ChatOutcome::NoResponse { model },
            Ok(text) => ChatOutcome::Answer { model, text },
            Err(e) => ChatOutcome::Error(e.to_string()),
        }
    }

    async fn upload(&self, state: &mut ChatState, path: &Path) -> ChatOutcome {
        let artifact = match self.container.loader().load_path(path).await {
            Ok(a) => a,
            Err(e) => return ChatOutcome::Error(e.to_string()),
        };

        let capability = artifact.capability();
        let keep = state
            .model
            .as_ref()
            .filter(|m| self.container.allow_list(capability).contains(m))
            .cloned();
        let choice = match keep {
            Some(model) => ModelChoice {
                model: Some(model),
                missing: Vec::new(),
            },
            None => match self.choose_model(capability, None).await {
                Ok(choice) => choice,
                Err(e) => return ChatOutcome::Error(e.to_string()),
            },
        };

        let (fresh, outcome) = self.open(artifact, choice);
        *state = fresh;
        outcome
    }

    async fn pull(&self, state: &mut ChatState, model: ModelIdentifier) -> ChatOutcome {
        if !self.container.is_permitted(&model) {
            return ChatOutcome::Error(format!("{model} is not an allowed model."));
        }

        let use_case = self.container.pull_model_use_case();
        let result = with_spinner(
            format!("Downloading {model}..."),
            use_case.execute(&model),
        )
        .await;

        if let Err(e) = result {
            return ChatOutcome::Error(e.to_string());
        }

        // A successful download discards the conversation.
        state.session = state.session.restart();
        info!("Restarted session as {}", state.session.id());

        if state.model.is_none() {
            match self.choose_model(state.session.artifact().capability(), None).await {
                Ok(choice) => state.model = choice.model,
                Err(e) => warn!("Could not pick a model after download: {}", e),
            }
        }

        ChatOutcome::SessionRestarted {
            pulled: model,
            model: state.model.clone(),
        }
    }

    fn use_model(&self, state: &mut ChatState, model: ModelIdentifier) -> ChatOutcome {
        let capability = state.session.artifact().capability();
        if !self.container.allow_list(capability).contains(&model) {
            return ChatOutcome::Error(format!(
                "{model} is not an allowed {} model.",
                capability.as_str()
            ));
        }
        state.model = Some(model.clone());
        ChatOutcome::ModelSelected(model)
    }

    async fn models(&self, state: &ChatState) -> ChatOutcome {
        let capability = state.session.artifact().capability();
        let allow_list = self.container.allow_list(capability);
        match self.container.list_models_use_case().execute(allow_list).await {
            Ok(availability) => ChatOutcome::Models {
                capability,
                availability,
            },
            Err(e) => ChatOutcome::Error(e.to_string()),
        }
    }

    /// An explicitly requested model must be on the allow-list; otherwise the
    /// first allowed model installed on the server is used. A server that
    /// cannot be listed leaves the session without a model.
    async fn choose_model(
        &self,
        capability: Capability,
        requested: Option<ModelIdentifier>,
    ) -> Result<ModelChoice, AdapterError> {
        let allow_list = self.container.allow_list(capability);

        if let Some(model) = requested {
            if !allow_list.contains(&model) {
                return Err(AdapterError::invalid_input(format!(
                    "{model} is not an allowed {} model",
                    capability.as_str()
                )));
            }
            return Ok(ModelChoice {
                model: Some(model),
                missing: Vec::new(),
            });
        }

        match self.container.list_models_use_case().execute(allow_list).await {
            Ok(availability) => Ok(ModelChoice {
                model: availability.first_allowed().cloned(),
                missing: availability.missing.into_iter().collect(),
            }),
            Err(e) => {
                warn!("Could not list models: {}", e);
                Ok(ModelChoice {
                    model: None,
                    missing: Vec::new(),
                })
            }
        }
    }
}
