use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{GenerationClient, ModelRegistry};
use crate::domain::{AdapterError, GenerateRequest, ModelIdentifier};

/// Default target: Ollama running locally on its standard port.
pub const DEFAULT_HOST: &str = "http://localhost:11434";
const GENERATE_PATH: &str = "/api/generate";
const TAGS_PATH: &str = "/api/tags";
const PULL_PATH: &str = "/api/pull";

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Serialize)]
struct PullRequest<'a> {
    model: &'a str,
    stream: bool,
}

#[derive(Deserialize, Default)]
struct PullResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for an Ollama server.
///
/// Implements [`GenerationClient`] for `/api/generate` and [`ModelRegistry`]
/// for `/api/tags` and `/api/pull`. Requests use the transport's default
/// timeouts and are never retried.
///
/// ```text
/// OLLAMA_HOST=http://gpu-box:11434
/// ```
pub struct OllamaClient {
    client: reqwest::Client,
    /// Base URL without trailing slash, e.g. `http://localhost:11434`.
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: normalize_host(&base_url.into()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Accept `host:port` as well as full URLs, the way `OLLAMA_HOST` is often set.
fn normalize_host(host: &str) -> String {
    let trimmed = host.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

#[async_trait]
impl GenerationClient for OllamaClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, AdapterError> {
        let url = self.url(GENERATE_PATH);

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                AdapterError::unreachable(format!(
                    "failed to get a response from {}: {e}",
                    request.model
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("OllamaClient: {url} returned {status}: {body}");
            return Err(AdapterError::unreachable(format!(
                "failed to get a response from {}: server returned {status}",
                request.model
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AdapterError::unreachable(format!("failed to read response body: {e}")))
    }
}

#[async_trait]
impl ModelRegistry for OllamaClient {
    async fn list_models(&self) -> Result<Vec<ModelIdentifier>, AdapterError> {
        let url = self.url(TAGS_PATH);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AdapterError::unreachable(format!("failed to list models: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::unreachable(format!(
                "failed to list models: server returned {status}"
            )));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| AdapterError::malformed(format!("failed to parse model list: {e}")))?;

        Ok(tags
            .models
            .into_iter()
            .filter_map(|m| ModelIdentifier::new(m.name).ok())
            .collect())
    }

    async fn pull_model(&self, model: &ModelIdentifier) -> Result<(), AdapterError> {
        let url = self.url(PULL_PATH);
        let request = PullRequest {
            model: model.as_str(),
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AdapterError::provisioning(format!("failed to download model {model}: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed: PullResponse = serde_json::from_str(&body).unwrap_or_default();

        if let Some(error) = parsed.error {
            return Err(AdapterError::provisioning(format!(
                "failed to download model {model}: {error}"
            )));
        }
        if !status.is_success() {
            return Err(AdapterError::provisioning(format!(
                "failed to download model {model}: server returned {status}"
            )));
        }

        debug!(
            "OllamaClient: pull of {model} finished with status {}",
            parsed.status.as_deref().unwrap_or("unknown")
        );
        Ok(())
    }
}
