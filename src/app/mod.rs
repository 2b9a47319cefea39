//! Application assembly: configuration + optional chat backend → running server.

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::api;
use crate::config::ServerConfig;
use crate::llm::{InferenceClient, OllamaClient};
use crate::middleware::{LoggerMiddleware, Pipeline};
use crate::server::{Server, ServerError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// A configured map server, not yet listening.
///
/// # Examples
///
/// ```rust,no_run
/// use mapserve::app::App;
/// use mapserve::config::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ServerConfig::default().with_port(8001);
///     App::from_config(config).bind().await?.run().await?;
///     Ok(())
/// }
/// ```
pub struct App {
    config: Arc<ServerConfig>,
    inference: Option<Arc<dyn InferenceClient>>,
}

impl App {
    /// Static files and listing only; add chat with [`with_inference`](Self::with_inference).
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            inference: None,
        }
    }

    /// Wires chat to Ollama at the configured URL, if chat is enabled.
    pub fn from_config(config: ServerConfig) -> Self {
        let inference: Option<Arc<dyn InferenceClient>> = config
            .chat_enabled()
            .then(|| Arc::new(OllamaClient::new(config.inference_url())) as Arc<dyn InferenceClient>);
        Self {
            config: Arc::new(config),
            inference,
        }
    }

    #[must_use]
    pub fn with_inference(mut self, client: Arc<dyn InferenceClient>) -> Self {
        self.inference = Some(client);
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(api::router(
            Arc::clone(&self.config),
            self.inference.clone(),
        ))
        .with(Arc::new(LoggerMiddleware))
    }

    /// Creates the data directory if needed, then binds the listener.
    ///
    /// Nothing is accepted until [`BoundApp::run`] is called.
    pub async fn bind(self) -> Result<BoundApp, AppError> {
        let data_dir = self.config.data_dir();
        api::files::ensure_data_dir(data_dir)
            .await
            .map_err(|source| AppError::DataDir {
                path: data_dir.to_path_buf(),
                source,
            })?;

        let server = Server::bind(self.config.bind_addr()).await?;
        info!(
            address = %server.local_addr(),
            root = %self.config.document_root().display(),
            data_dir = %data_dir.display(),
            chat = self.inference.is_some(),
            "server ready"
        );

        Ok(BoundApp {
            pipeline: Arc::new(self.pipeline()),
            server,
        })
    }
}

/// A map server with its listener bound.
pub struct BoundApp {
    server: Server,
    pipeline: Arc<Pipeline>,
}

impl BoundApp {
    pub fn local_addr(&self) -> SocketAddr {
        self.server.local_addr()
    }

    pub async fn run(self) -> Result<(), AppError> {
        self.run_until(std::future::pending()).await
    }

    pub async fn run_until<S>(self, shutdown: S) -> Result<(), AppError>
    where
        S: Future<Output = ()>,
    {
        let pipeline = self.pipeline;
        self.server
            .run_until(
                move |request| {
                    let pipeline = Arc::clone(&pipeline);
                    async move { pipeline.handle(request).await }
                },
                shutdown,
            )
            .await?;
        Ok(())
    }
}
