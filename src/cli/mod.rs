use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_LISTING_SUFFIX, DEFAULT_MODEL, ServerConfig};
use crate::llm::DEFAULT_GENERATE_URL;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Interface to listen on
    #[arg(long, env = "MAPSERVE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on (the chat-enabled deployment uses 8001)
    #[arg(short, long, env = "MAPSERVE_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Directory static files are served from
    #[arg(long, env = "MAPSERVE_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Directory listed by /api/files; created on startup if missing
    #[arg(long, env = "MAPSERVE_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// File suffix reported by /api/files
    #[arg(long, env = "MAPSERVE_SUFFIX", default_value = DEFAULT_LISTING_SUFFIX)]
    pub suffix: String,

    /// Ollama generate endpoint
    #[arg(long, env = "MAPSERVE_OLLAMA_URL", default_value = DEFAULT_GENERATE_URL)]
    pub ollama_url: String,

    /// Model used when a chat request does not name one
    #[arg(short, long, env = "MAPSERVE_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Serve files only; POST /api/chat answers 404
    #[arg(long, env = "MAPSERVE_NO_CHAT")]
    pub no_chat: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig::default()
            .with_host(args.host)
            .with_port(args.port)
            .with_document_root(args.root)
            .with_data_dir(args.data_dir)
            .with_listing_suffix(args.suffix)
            .with_inference_url(args.ollama_url)
            .with_default_model(args.model)
            .with_chat_enabled(!args.no_chat)
    }
}
