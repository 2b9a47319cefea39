//! # mapserve
//!
//! A small local web server for a map frontend. It serves static files,
//! lists the GeoJSON files in a data directory, and relays chat prompts to a
//! local Ollama daemon.
//!
//! ```rust,no_run
//! use mapserve::app::App;
//! use mapserve::config::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::from_config(ServerConfig::default()).bind().await?;
//!     println!("Server running at http://{}", app.local_addr());
//!     app.run().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod context;
pub mod http;
pub mod llm;
pub mod middleware;
pub mod router;
pub mod server;

pub use http::{Headers, Method, Request, Response, StatusCode};
pub use router::Router;
pub use server::{Server, ServerError};
