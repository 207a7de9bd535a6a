//! Error types for loading reference data and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Why a reference-data source could not be used.
///
/// None of these are fatal to a session: the loader turns them into the
/// sample-data fallback and a status message.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Transport failure (DNS, TLS, timeout, connection reset).
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered, but not with a success status.
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    /// Local export file could not be read.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Body was not valid JSON.
    #[error("invalid JSON from {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFile(String),

    #[error("background fetch of {origin} panicked")]
    Panicked { origin: String },
}

/// Configuration file problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
