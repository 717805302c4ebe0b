use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelsError>;

/// Network or protocol failure while transferring a single artifact.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("reading response body from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ModelsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Logging setup error: {message}")]
    LoggingError { message: String },
}

impl ModelsError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        ModelsError::ConfigError {
            message: message.into(),
        }
    }

    pub fn logging_error<S: Into<String>>(message: S) -> Self {
        ModelsError::LoggingError {
            message: message.into(),
        }
    }

    /// Whether this error originated in the network layer rather than locally.
    pub fn is_transfer(&self) -> bool {
        matches!(self, ModelsError::Transfer(_))
    }
}
