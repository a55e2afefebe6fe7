//! Navigation entries and their native payload encoding.
//!
//! Each entry written to native history carries its own JSON encoding as the
//! native state payload. The payload survives a page reload, which is how an
//! instance can tell the sentinel apart from a real page after a restart.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Location, LocationSnapshot, PayloadError};

/// Address used for the sentinel entry.
pub const SENTINEL_PATH: &str = "/goback";

/// What a native history entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    /// A real application page.
    Normal,
    /// The synthetic sentinel sitting behind the current page.
    Goback,
}

impl EntryKind {
    /// Read the entry kind out of a native payload without decoding the rest.
    ///
    /// Returns `None` for payloads that were not written by hashnav.
    pub fn of_payload(payload: &Value) -> Option<Self> {
        match payload.get("type")?.as_str()? {
            "NORMAL" => Some(Self::Normal),
            "GOBACK" => Some(Self::Goback),
            _ => None,
        }
    }
}

/// One position in the virtual stack (or the sentinel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationEntry {
    /// Parsed address.
    pub location: Location,
    /// Creation time in milliseconds.
    #[serde(rename = "timeStamp")]
    pub timestamp: i64,
    /// Normal page or sentinel.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// User payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl NavigationEntry {
    /// Create an entry for `path` created at `timestamp`.
    pub fn new(path: &str, data: Option<Value>, kind: EntryKind, timestamp: i64) -> Self {
        Self {
            location: Location::new(path, timestamp.to_string()),
            timestamp,
            kind,
            data,
        }
    }

    /// Create a normal page entry.
    pub fn normal(path: &str, data: Option<Value>, timestamp: i64) -> Self {
        Self::new(path, data, EntryKind::Normal, timestamp)
    }

    /// Create the sentinel for a time basis of `now`.
    ///
    /// The sentinel is stamped one tick earlier so it always orders before
    /// the entry it guards.
    pub fn sentinel(now: i64) -> Self {
        Self::new(SENTINEL_PATH, None, EntryKind::Goback, now - 1)
    }

    /// Full href of the entry's location.
    pub fn href(&self) -> &str {
        &self.location.href
    }

    /// Read-only view for callers and hooks.
    pub fn snapshot(&self) -> LocationSnapshot {
        LocationSnapshot::new(self.location.clone(), self.data.clone())
    }

    /// Encode as a native state payload.
    pub fn to_payload(&self) -> Result<Value, PayloadError> {
        serde_json::to_value(self).map_err(PayloadError::Serialize)
    }
}

/// Serialize user data into a detached JSON value.
///
/// Fails for values JSON cannot represent, such as maps with non-string keys.
pub fn encode_data<T: Serialize + ?Sized>(data: &T) -> Result<Value, PayloadError> {
    serde_json::to_value(data).map_err(PayloadError::Serialize)
}
