//! Native history abstraction for hashnav.
//!
//! This module provides the collaborators the state machine drives: the
//! browser's session history, the stream of back/forward notifications it
//! emits, and a per-session marker.
//!
//! # Design
//!
//! Native history is only ever addressed one step at a time and can never
//! be enumerated:
//! - `push_entry()` / `replace_entry()` write the current entry
//! - `go()` steps backward or forward; the move is observed later, through
//!   a [`Notification`]
//! - `current_payload()` / `current_address()` read where we are now
//!
//! A browser binding implements these over `history.pushState`,
//! `history.replaceState`, `history.go` and the `hashchange` event.
//! [`MemoryHistory`] simulates them in memory.
//!
//! # Example
//!
//! ```ignore
//! let native = MemoryHistory::new("/");
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! native.listen(tx);
//! native.user_navigate("/typed");
//! let notification = rx.recv().await;
//! ```

mod memory;

pub use memory::{MemoryEntry, MemoryHistory, MemorySession, NativeCall};

use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

/// Fired on every native navigation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Application address before the step.
    pub old_address: String,
    /// Application address after the step.
    pub new_address: String,
}

/// The native history medium.
///
/// Addresses are application paths (the part after `#`); translating them
/// into full URLs is the implementation's business.
pub trait NativeHistory: Send + Sync {
    /// Whether the environment offers a navigable history at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Whether this is the process-wide default navigation context, which
    /// only one undestroyed instance may control.
    fn is_default_context(&self) -> bool {
        false
    }

    /// Add an entry after the current one, dropping any forward entries.
    ///
    /// `title` is the display title the browser records for the entry being
    /// left behind, when given.
    fn push_entry(&self, payload: Option<Value>, title: Option<&str>, address: &str);

    /// Overwrite the current entry in place.
    fn replace_entry(&self, payload: Option<Value>, title: Option<&str>, address: &str);

    /// Step by `delta` entries. Out-of-range steps do nothing.
    fn go(&self, delta: i64);

    /// State payload of the current entry.
    fn current_payload(&self) -> Option<Value>;

    /// Address of the current entry.
    fn current_address(&self) -> String;

    /// Deliver notifications to `sender` from now on.
    fn listen(&self, sender: UnboundedSender<Notification>);

    /// Stop delivering notifications.
    fn unlisten(&self);
}

/// A flag scoped to the browsing session.
///
/// Survives page reloads but not a new session; used only to tell a first
/// load from a reload after the sentinel was established.
pub trait SessionMarker: Send + Sync {
    /// Whether the marker is set.
    fn is_set(&self) -> bool;

    /// Set or clear the marker.
    fn set(&self, value: bool);
}
