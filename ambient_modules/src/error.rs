// src/error.rs

use thiserror::Error;

/// Result alias for engine construction and output setup.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures that are reported to the caller.
///
/// Everything that happens after the output is running (asset loads,
/// secondary triggers, stopping sources) is absorbed and logged instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device available")]
    OutputUnavailable,

    #[error("failed to configure output device: {0}")]
    OutputConfig(String),

    #[error("failed to build output stream: {0}")]
    StreamBuild(String),

    #[error("failed to start output stream: {0}")]
    StreamPlay(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why an asset could not be turned into a playable buffer.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {reference}")]
    NotFound { reference: String },

    #[error("failed to fetch {reference}: {source}")]
    Fetch {
        reference: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {reference}: {reason}")]
    Decode { reference: String, reason: String },

    #[error("{reference} contains no audio")]
    Empty { reference: String },

    #[error("failed to resample {reference}: {reason}")]
    Resample { reference: String, reason: String },

    #[error("loading {reference} was interrupted")]
    Interrupted { reference: String },
}

impl AssetError {
    pub fn reference(&self) -> &str {
        match self {
            AssetError::NotFound { reference }
            | AssetError::Fetch { reference, .. }
            | AssetError::Decode { reference, .. }
            | AssetError::Empty { reference }
            | AssetError::Resample { reference, .. }
            | AssetError::Interrupted { reference } => reference,
        }
    }
}

/// Returned when parsing a scene identifier that the catalog doesn't know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scene: {0}")]
pub struct UnknownScene(pub String);
