//! Typed errors for the extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Extraction itself never fails; only the key-value collaborators do.

use thiserror::Error;

/// Errors that can occur talking to a key-value backend.
#[derive(Debug, Error)]
pub enum KvError {
    /// HTTP transport failed (connect, timeout, body read)
    #[error("KV request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success HTTP status
    #[error("KV backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Backend rejected the command
    #[error("KV command {command} failed: {message}")]
    Command { command: String, message: String },

    /// Backend answered with a shape we did not expect
    #[error("unexpected KV response for {command}: {detail}")]
    UnexpectedResponse { command: String, detail: String },

    /// Operation against a key holding another value type
    #[error("wrong value type at key: {key}")]
    WrongType { key: String },

    /// Backend is not reachable at all
    #[error("KV backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for key-value operations.
pub type KvResult<T> = std::result::Result<T, KvError>;
