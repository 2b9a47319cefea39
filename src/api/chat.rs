//! `POST /api/chat` — relays a prompt to the inference backend.

use thiserror::Error;
use tracing::{error, info};

use super::models::{ChatRequest, ChatResponse, ErrorBody};
use crate::context::Context;
use crate::llm::{GenerateRequest, InferenceClient, InferenceError};
use crate::{Response, StatusCode};

/// Everything that can go wrong while proxying one chat request.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("missing Content-Length header")]
    MissingContentLength,

    #[error("invalid Content-Length header: {0:?}")]
    InvalidContentLength(String),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Inference(e) if e.is_connection_failure() => StatusCode::ServiceUnavailable,
            _ => StatusCode::InternalServerError,
        }
    }

    /// The text placed in the `error` field of the response body.
    pub fn message(&self) -> String {
        match self {
            Self::Inference(e) if e.is_connection_failure() => {
                format!("Ollama connection failed: {e}")
            }
            other => format!("Internal Error: {other}"),
        }
    }

    pub fn into_response(self) -> Response {
        Response::json(self.status(), &ErrorBody::new(self.message()))
    }
}

/// Handles one chat request end to end. Never fails: errors become 5xx JSON.
pub async fn chat(ctx: Context, inference: &dyn InferenceClient, default_model: &str) -> Response {
    match proxy(&ctx, inference, default_model).await {
        Ok(reply) => Response::json(StatusCode::Ok, &ChatResponse { reply }),
        Err(e) => {
            let status = e.status().as_u16();
            error!(status, error = %e, "{}", e.message());
            e.into_response()
        }
    }
}

async fn proxy(
    ctx: &Context,
    inference: &dyn InferenceClient,
    default_model: &str,
) -> Result<String, ChatError> {
    let request = ctx.request();
    match request.headers().get("content-length") {
        None => return Err(ChatError::MissingContentLength),
        Some(raw) if request.content_length().is_none() => {
            return Err(ChatError::InvalidContentLength(raw.to_owned()));
        }
        Some(_) => {}
    }

    let value: serde_json::Value = ctx.json()?;
    if !value.is_object() {
        return Err(ChatError::NotAnObject);
    }
    let body: ChatRequest = serde_json::from_value(value)?;
    let model = body.model_or(default_model);

    info!(model, "incoming chat request");
    info!(prompt = %body.prompt, "prompt");
    info!("waiting for ollama...");

    let generated = inference
        .generate(&GenerateRequest::new(model, body.prompt.as_str()))
        .await?;

    info!(chars = generated.response.chars().count(), "response sent");
    Ok(generated.response)
}
