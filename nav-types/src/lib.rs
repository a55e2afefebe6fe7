//! # hashnav-types
//!
//! Entry and location types shared by all hashnav crates:
//! - [`Location`], [`LocationSnapshot`] - Parsed addresses and the read-only view handed to callers
//! - [`NavigationEntry`], [`EntryKind`] - Virtual stack entries and their native payload encoding
//! - [`path`] - Leading/trailing slash handling and path parsing
//! - [`PayloadError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod entry;
mod error;
mod location;
pub mod path;

pub use entry::{encode_data, EntryKind, NavigationEntry, SENTINEL_PATH};
pub use error::PayloadError;
pub use location::{Location, LocationSnapshot};
