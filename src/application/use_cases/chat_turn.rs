use std::sync::Arc;

use tracing::{info, warn};

use crate::application::use_cases::{AskDocumentUseCase, AskImageUseCase};
use crate::application::GenerationClient;
use crate::domain::{AdapterError, ChatSession, ModelIdentifier, SourceArtifact};

/// One question/answer exchange against the session's artifact.
///
/// The user's question is appended before the call. The answer is appended
/// only when the call succeeds, so a failed turn leaves the question without a
/// reply and the user can simply ask again.
pub struct ChatTurnUseCase {
    document: AskDocumentUseCase,
    image: AskImageUseCase,
}

impl ChatTurnUseCase {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            document: AskDocumentUseCase::new(client.clone()),
            image: AskImageUseCase::new(client),
        }
    }

    pub async fn execute(
        &self,
        session: &mut ChatSession,
        model: &ModelIdentifier,
        question: &str,
    ) -> Result<String, AdapterError> {
        session.push_user(question);

        let result = match session.artifact() {
            SourceArtifact::PlainText { text, .. } => {
                self.document.execute(text, model, question).await
            }
            SourceArtifact::EncodedImage(image) => {
                self.image.execute_encoded(image, model, question).await
            }
        };

        match result {
            Ok(answer) => {
                info!(
                    "Session {}: received {} chars from {}",
                    session.id(),
                    answer.len(),
                    model
                );
                session.push_assistant(answer.clone());
                Ok(answer)
            }
            Err(e) => {
                warn!("Session {}: failed to get a response from {}: {}", session.id(), model, e);
                Err(e)
            }
        }
    }
}
