//! Server configuration.
//!
//! Everything the server needs is carried in one [`ServerConfig`] value so
//! tests can point it at temporary directories, ephemeral ports and fake
//! backends. Defaults match the stock deployment.

use std::path::{Path, PathBuf};

use crate::llm::DEFAULT_GENERATE_URL;

/// Model used when a chat request does not name one.
pub const DEFAULT_MODEL: &str = "gpt-oss:latest";

/// Suffix of the files the listing endpoint reports.
pub const DEFAULT_LISTING_SUFFIX: &str = ".geojson";

/// Settings for one server instance.
///
/// # Examples
///
/// ```
/// use mapserve::config::ServerConfig;
///
/// let config = ServerConfig::default().with_port(8001).with_data_dir("/srv/maps/data");
/// assert_eq!(config.bind_addr(), "0.0.0.0:8001");
/// assert!(config.chat_enabled());
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    document_root: PathBuf,
    data_dir: PathBuf,
    listing_suffix: String,
    inference_url: String,
    default_model: String,
    chat_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8000,
            document_root: PathBuf::from("."),
            data_dir: PathBuf::from("data"),
            listing_suffix: DEFAULT_LISTING_SUFFIX.to_owned(),
            inference_url: DEFAULT_GENERATE_URL.to_owned(),
            default_model: DEFAULT_MODEL.to_owned(),
            chat_enabled: true,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Directory static files are served from.
    #[must_use]
    pub fn with_document_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.document_root = root.into();
        self
    }

    /// Directory scanned by `GET /api/files`. Relative paths resolve against
    /// the process working directory, not the document root.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_listing_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.listing_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn with_inference_url(mut self, url: impl Into<String>) -> Self {
        self.inference_url = url.into();
        self
    }

    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    #[must_use]
    pub fn with_chat_enabled(mut self, enabled: bool) -> Self {
        self.chat_enabled = enabled;
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn document_root(&self) -> &Path {
        &self.document_root
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn listing_suffix(&self) -> &str {
        &self.listing_suffix
    }

    pub fn inference_url(&self) -> &str {
        &self.inference_url
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn chat_enabled(&self) -> bool {
        self.chat_enabled
    }
}
