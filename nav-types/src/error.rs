//! Error types for hashnav payloads.

use thiserror::Error;

/// Errors raised while moving entries and user data in or out of JSON.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// User data (or an entry) could not be turned into a JSON value.
    #[error("state data is not JSON-serializable: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A native payload did not decode as a navigation entry.
    #[error("unrecognized native payload: {0}")]
    Decode(#[source] serde_json::Error),
}
