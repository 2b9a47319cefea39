//! Inference backend — the capability the chat proxy forwards prompts to.
//!
//! [`InferenceClient`] is the seam: the server only ever holds an
//! `Arc<dyn InferenceClient>`, so tests can plug in a fake backend and the
//! binary plugs in [`OllamaClient`].

mod ollama;

pub use ollama::{DEFAULT_GENERATE_URL, OllamaClient};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload sent to the backend's generate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

impl GenerateRequest {
    /// A single-shot (non-streaming) generation request.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
        }
    }
}

/// The part of the backend reply the proxy cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}

/// Why a generate call failed.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The backend could not be reached or the transfer broke off.
    #[error("{reason}")]
    Unreachable { reason: String },

    /// The backend answered with a non-success status.
    #[error("HTTP Error {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend answered 2xx but the body is not the expected JSON.
    #[error("invalid response from inference backend: {0}")]
    Decode(#[from] serde_json::Error),
}

impl InferenceError {
    /// Connection-level failures, as opposed to a bad payload.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Self::Unreachable { .. } | Self::Status { .. })
    }
}

#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Runs one generation to completion and returns the backend's reply.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, InferenceError>;
}
