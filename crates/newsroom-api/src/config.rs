//! Application configuration

use std::env;
use std::path::PathBuf;

use crate::runtime::services::BlobConfig;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address to bind the HTTP listener to
    pub bind_addr: String,

    /// Port for the API
    pub port: u16,

    /// Directory for persisted blobs; in-memory store when unset
    pub data_dir: Option<PathBuf>,

    /// JSON file holding the seed content document
    pub seed_file: Option<PathBuf>,

    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind_addr: lookup("NEWSROOM_BIND_ADDR")
                .unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("NEWSROOM_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),

            data_dir: lookup("NEWSROOM_DATA_DIR")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),

            seed_file: lookup("NEWSROOM_SEED_FILE")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),

            max_body_bytes: lookup("NEWSROOM_MAX_BODY_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024),
        }
    }

    /// `host:port` to listen on
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Blob store backend selected by `data_dir`
    pub fn blob_config(&self) -> BlobConfig {
        match &self.data_dir {
            Some(root) => BlobConfig::Filesystem { root: root.clone() },
            None => BlobConfig::Memory,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
