use std::sync::Arc;

use tracing::{debug, info};

use crate::application::use_cases::reassemble_stream::reassemble;
use crate::application::GenerationClient;
use crate::domain::{AdapterError, EncodedImage, GenerateRequest, ModelIdentifier};

/// Ask a question about an image. The server answers with newline-delimited
/// JSON fragments which are reassembled into a single answer.
///
/// Callers are expected to pick `model` from the vision allow-list; it is not
/// checked here.
pub struct AskImageUseCase {
    client: Arc<dyn GenerationClient>,
}

impl AskImageUseCase {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    /// Re-encode raw image bytes and ask about them.
    pub async fn execute(
        &self,
        image: &[u8],
        model: &ModelIdentifier,
        question: &str,
    ) -> Result<String, AdapterError> {
        let encoded = EncodedImage::from_raw(image)?;
        self.execute_encoded(&encoded, model, question).await
    }

    /// Ask about an image that was already encoded at upload time.
    pub async fn execute_encoded(
        &self,
        image: &EncodedImage,
        model: &ModelIdentifier,
        question: &str,
    ) -> Result<String, AdapterError> {
        let (w, h) = image.dimensions();
        info!("Asking {} about a {}x{} image", model, w, h);

        let request = GenerateRequest::for_image(model, question, image);
        let body = self.client.generate(&request).await?;
        debug!("Received {} bytes of fragments", body.len());

        Ok(reassemble(&body))
    }
}
