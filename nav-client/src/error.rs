//! Error types for the navigation state machine.

use hashnav_types::PayloadError;
use thiserror::Error;

/// Error produced by a lifecycle hook.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by [`History`](crate::History) operations.
///
/// Callers are expected to branch on [`Busy`](Self::Busy) and
/// [`Cancelled`](Self::Cancelled) only; every other variant points at a
/// programming or environment problem.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Another navigation is in flight.
    #[error("history is busy with another navigation")]
    Busy,

    /// An `on_before_change` hook vetoed the navigation, or a parked call
    /// was dropped by `destroy()`/`exit()`.
    #[error("navigation cancelled")]
    Cancelled,

    /// A required capability was missing at construction.
    #[error("history initialization failed: {0}")]
    InitializationFailed(String),

    /// Another undestroyed instance owns the default navigation context.
    #[error("another undestroyed history instance owns the default navigation context")]
    ContextInUse,

    /// State data could not be represented as JSON.
    #[error(transparent)]
    Serialization(#[from] PayloadError),

    /// A lifecycle hook failed.
    #[error("navigation hook failed: {0}")]
    Hook(#[source] BoxError),

    /// The instance was destroyed or has exited.
    #[error("history has been destroyed")]
    Destroyed,
}

impl HistoryError {
    /// Whether the operation was refused because another one was in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }

    /// Whether the operation was vetoed or dropped.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
