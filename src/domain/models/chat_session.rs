use uuid::Uuid;

use super::{ChatMessage, SourceArtifact};

/// Ordered, append-only conversation about exactly one uploaded artifact.
///
/// The session is owned by whoever drives the interaction and is passed
/// explicitly into every turn. Replacing the artifact means building a new
/// session; messages are never edited or removed.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: String,
    artifact: SourceArtifact,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(artifact: SourceArtifact) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            artifact,
            messages: Vec::new(),
        }
    }

    /// A fresh, empty session over the same artifact.
    pub fn restart(&self) -> Self {
        Self::new(self.artifact.clone())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn artifact(&self) -> &SourceArtifact {
        &self.artifact
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }
}
