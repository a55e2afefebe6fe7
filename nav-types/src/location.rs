//! Parsed locations and the read-only snapshots given to callers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::{add_leading_slash, create_path, parse_path, PathParts};
use crate::PayloadError;

/// A parsed application address.
///
/// `key` carries the creation timestamp of the owning entry as a string and
/// is used as a uniqueness token, not as wall-clock truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Path portion, always with a leading `/`.
    pub pathname: String,
    /// Query portion including `?`, or empty.
    #[serde(default)]
    pub search: String,
    /// Fragment portion including `#`, or empty.
    #[serde(default)]
    pub hash: String,
    /// `pathname + search + hash`.
    pub href: String,
    /// Creation token.
    pub key: String,
}

impl Location {
    /// Parse `path` (normalized with a leading slash) into a location.
    pub fn new(path: &str, key: impl Into<String>) -> Self {
        let PathParts {
            pathname,
            search,
            hash,
        } = parse_path(&add_leading_slash(path));
        let href = create_path(&PathParts {
            pathname: pathname.clone(),
            search: search.clone(),
            hash: hash.clone(),
        });
        Self {
            pathname,
            search,
            hash,
            href,
            key: key.into(),
        }
    }

    /// The normalized href for `path`, without building a full location.
    pub fn href_of(path: &str) -> String {
        create_path(&parse_path(&add_leading_slash(path)))
    }
}

/// Immutable view of one navigation entry.
///
/// Built fresh each time it is requested; holding one never keeps the
/// underlying entry alive or lets a caller change it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSnapshot {
    #[serde(flatten)]
    location: Location,
    state: Option<Value>,
}

impl LocationSnapshot {
    /// Create a snapshot from a location and its user payload.
    pub fn new(location: Location, state: Option<Value>) -> Self {
        Self { location, state }
    }

    /// The parsed location.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Full href.
    pub fn href(&self) -> &str {
        &self.location.href
    }

    /// Path portion.
    pub fn pathname(&self) -> &str {
        &self.location.pathname
    }

    /// Query portion.
    pub fn search(&self) -> &str {
        &self.location.search
    }

    /// Fragment portion.
    pub fn hash(&self) -> &str {
        &self.location.hash
    }

    /// Creation token.
    pub fn key(&self) -> &str {
        &self.location.key
    }

    /// User payload, if any.
    pub fn state(&self) -> Option<&Value> {
        self.state.as_ref()
    }

    /// Decode the user payload into a concrete type.
    pub fn state_as<T: DeserializeOwned>(&self) -> Result<Option<T>, PayloadError> {
        self.state
            .clone()
            .map(serde_json::from_value)
            .transpose()
            .map_err(PayloadError::Decode)
    }
}
