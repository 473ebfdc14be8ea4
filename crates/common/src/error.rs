//! Error types shared across TouchFabric crates.

use std::path::PathBuf;

/// Top-level error type for TouchFabric operations.
#[derive(Debug, thiserror::Error)]
pub enum TouchFabricError {
    #[error("Active area error: {message}")]
    Area { message: String },

    #[error("Tracker error: {message}")]
    Tracker { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using TouchFabricError.
pub type TouchFabricResult<T> = Result<T, TouchFabricError>;

impl TouchFabricError {
    pub fn area(msg: impl Into<String>) -> Self {
        Self::Area {
            message: msg.into(),
        }
    }

    pub fn tracker(msg: impl Into<String>) -> Self {
        Self::Tracker {
            message: msg.into(),
        }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
