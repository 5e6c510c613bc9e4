use serde::Serialize;

use super::{EncodedImage, ModelIdentifier};

/// Body of a `POST /api/generate` call.
///
/// Only the latest question travels as `prompt`; earlier turns of the session
/// are never replayed to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub model: ModelIdentifier,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl GenerateRequest {
    pub fn for_document(model: &ModelIdentifier, question: &str, artifact_text: &str) -> Self {
        Self {
            model: model.clone(),
            prompt: question.to_string(),
            text: Some(artifact_text.to_string()),
            images: None,
        }
    }

    pub fn for_image(model: &ModelIdentifier, question: &str, image: &EncodedImage) -> Self {
        Self {
            model: model.clone(),
            prompt: question.to_string(),
            text: None,
            images: Some(vec![image.as_base64().to_string()]),
        }
    }
}
