//! The map server's HTTP surface.
//!
//! | Method | Path          | Handler                                   |
//! |--------|---------------|-------------------------------------------|
//! | GET    | `/api/files`  | [`files::listing`]                        |
//! | GET    | `/*`          | [`files::serve_static`]                   |
//! | HEAD   | `/*`          | [`files::serve_static`], headers only     |
//! | POST   | `/api/chat`   | [`chat::chat`] (only with a backend)      |
//! | any    | anything else | 404 `{"error":"Endpoint not found"}`      |

pub mod chat;
pub mod files;
mod models;

use std::sync::Arc;

pub use models::{ChatRequest, ChatResponse, ErrorBody};

use crate::config::ServerConfig;
use crate::context::Context;
use crate::llm::InferenceClient;
use crate::{Response, Router, StatusCode};

/// Builds the route table. Chat is wired in only when `inference` is given.
pub fn router(config: Arc<ServerConfig>, inference: Option<Arc<dyn InferenceClient>>) -> Router {
    let mut router = Router::new();

    let listing_config = Arc::clone(&config);
    router.get("/api/files", move |_ctx: Context| {
        let config = Arc::clone(&listing_config);
        async move { files::listing(config.data_dir(), config.listing_suffix()).await }
    });

    if let Some(inference) = inference {
        let chat_config = Arc::clone(&config);
        router.post("/api/chat", move |ctx: Context| {
            let config = Arc::clone(&chat_config);
            let inference = Arc::clone(&inference);
            async move { chat::chat(ctx, inference.as_ref(), config.default_model()).await }
        });
    }

    let static_config = Arc::clone(&config);
    router.get("/*", move |ctx: Context| {
        let config = Arc::clone(&static_config);
        async move { static_file(&config, &ctx).await }
    });

    let head_config = Arc::clone(&config);
    router.head("/*", move |ctx: Context| {
        let config = Arc::clone(&head_config);
        async move { static_file(&config, &ctx).await.head_only() }
    });

    router.fallback(|_ctx: Context| async { not_found() });
    router
}

async fn static_file(config: &ServerConfig, ctx: &Context) -> Response {
    let url_path = ctx.params().get("wildcard").unwrap_or("/");
    files::serve_static(config.document_root(), url_path, ctx.request().query_string()).await
}

pub fn not_found() -> Response {
    Response::json(StatusCode::NotFound, &ErrorBody::new("Endpoint not found"))
}
