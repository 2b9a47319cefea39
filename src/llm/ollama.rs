use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, ClientBuilder};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use super::{GenerateRequest, GenerateResponse, InferenceClient, InferenceError};

/// Default Ollama generate endpoint on the local machine.
pub const DEFAULT_GENERATE_URL: &str = "http://localhost:11434/api/generate";

/// Talks to a local Ollama daemon over its `/api/generate` endpoint.
///
/// No timeout is set: a generation blocks the calling task until Ollama
/// finishes.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: HttpClient,
    generate_url: String,
}

impl OllamaClient {
    pub fn new(generate_url: impl Into<String>) -> Self {
        // Ollama runs on this machine; system proxy settings must not reroute it.
        Self {
            http: build_or_default(HttpClient::builder().no_proxy()),
            generate_url: generate_url.into(),
        }
    }

    pub fn generate_url(&self) -> &str {
        &self.generate_url
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATE_URL)
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, InferenceError> {
        debug!(url = %self.generate_url, model = %request.model, "posting to ollama");

        let resp = self
            .http
            .post(&self.generate_url)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(unreachable)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(unreachable)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn build_or_default(builder: ClientBuilder) -> HttpClient {
    builder.build().unwrap_or_else(|e| {
        warn!(error = %e, "falling back to default HTTP client; proxy settings apply");
        HttpClient::default()
    })
}

// reqwest's top-level message hides the OS error; walk the chain for it.
fn unreachable(err: reqwest::Error) -> InferenceError {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    InferenceError::Unreachable { reason }
}
