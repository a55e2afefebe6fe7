//! Sentinel classification.
//!
//! Native history cannot be enumerated, so whether a sentinel already sits
//! behind the current page is inferred from two facts: the kind of the native
//! current payload, and a per-session marker set the first time a sentinel
//! was written.

use hashnav_types::EntryKind;

/// Where the native current position sits relative to the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelStatus {
    /// The native current entry is the sentinel itself.
    AtSentinel,
    /// The sentinel sits one step behind the native current entry.
    AheadOfSentinel,
    /// No recognizable sentinel; one has to be written in place.
    Missing,
}

impl SentinelStatus {
    /// Whether the real entry must be pushed after the sentinel.
    ///
    /// When already one step ahead, the real entry replaces the native
    /// current entry instead, keeping the one-step offset.
    pub fn requires_push(self) -> bool {
        !matches!(self, Self::AheadOfSentinel)
    }
}

/// Classify the native position from its payload kind and the session marker.
pub fn classify_sentinel(current: Option<EntryKind>, marker_set: bool) -> SentinelStatus {
    match (current, marker_set) {
        (Some(EntryKind::Goback), true) => SentinelStatus::AtSentinel,
        (Some(EntryKind::Normal), true) => SentinelStatus::AheadOfSentinel,
        _ => SentinelStatus::Missing,
    }
}
