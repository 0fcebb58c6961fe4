//! Error types for dct-core

use thiserror::Error;

/// Result type alias using dct-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in dct-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Caller-supplied booking is malformed; raised before any store is touched
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Remote store unreachable, misconfigured, or returned a server-side error
    #[error("Remote store unavailable: {0}")]
    RemoteUnavailable(String),

    /// Both the remote store and the local cache came back failed or empty
    #[error("Could not read bookings from the remote store or the local cache")]
    ReadFailed,

    /// Local mutation committed but the remote mirror did not
    #[error("Sync warning: {operation} saved locally but not synced ({reason})")]
    SyncWarning {
        operation: &'static str,
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
