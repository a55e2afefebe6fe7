//! # hashnav
//!
//! App-like navigation on top of native browser history.
//!
//! The browser keeps a forward button, shows every intermediate address,
//! and unloads the page on back. `History` replaces that with a virtual
//! stack the application controls, guarded by a single sentinel entry that
//! turns the native back gesture into an ordinary `goback`.
//!
//! ## Features
//!
//! - **Virtual stack**: push, replace, goback (by steps, path or
//!   predicate) and reload, all rewriting one native entry in place
//! - **Lifecycle hooks**: veto or redirect before a change, react after it
//! - **Self-healing**: manual address edits and unexpected native states
//!   are reconciled instead of surfaced
//! - **Pure core**: mode transitions live in `hashnav-core`
//!
//! ## Example
//!
//! ```ignore
//! use hashnav::{History, HistoryConfig, MemoryHistory, MemorySession};
//!
//! let native = MemoryHistory::new("/");
//! let history = History::new(HistoryConfig::default(), native, MemorySession::new())?;
//!
//! history.push("/settings", None).await?;
//! history.goback(1).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
mod guard;
pub mod history;
pub mod hooks;
pub mod native;

pub use config::{ConfigError, HistoryConfig};
pub use error::{BoxError, HistoryError};
pub use guard::default_context_claimed;
pub use history::{History, HistoryBuilder};
pub use hooks::{BeforeChange, ChangeEvent, ChangeKind, Continuation};
pub use native::{
    MemoryEntry, MemoryHistory, MemorySession, NativeCall, NativeHistory, Notification,
    SessionMarker,
};

pub use hashnav_core::{GobackTarget, Mode};
pub use hashnav_types::{EntryKind, Location, LocationSnapshot, NavigationEntry, PayloadError};
