use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::application::GenerationClient;
use crate::domain::{AdapterError, GenerateRequest, ModelIdentifier};

/// The single JSON object returned on the document path.
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Ask a question about a decoded text document in one non-streaming call.
pub struct AskDocumentUseCase {
    client: Arc<dyn GenerationClient>,
}

impl AskDocumentUseCase {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    pub async fn execute(
        &self,
        artifact_text: &str,
        model: &ModelIdentifier,
        question: &str,
    ) -> Result<String, AdapterError> {
        info!(
            "Asking {} about a document ({} chars)",
            model,
            artifact_text.len()
        );

        let request = GenerateRequest::for_document(model, question, artifact_text);
        let body = self.client.generate(&request).await?;
        debug!("Raw response text: {body}");

        Self::decode(&body)
    }

    /// The body must be exactly one JSON object; its `response` is the answer.
    /// A missing or null `response` is an empty answer.
    fn decode(body: &str) -> Result<String, AdapterError> {
        serde_json::from_str::<GenerateResponse>(body)
            .map(|r| r.response.unwrap_or_default())
            .map_err(|e| AdapterError::malformed(format!("failed to parse response: {e}")))
    }
}
