//! The virtual navigation stack.
//!
//! The stack holds only `NORMAL` entries, oldest first, and is never empty:
//! the current entry is stored apart from the entries below it, so there is
//! always a top to read.

use std::fmt;
use std::sync::Arc;

use hashnav_types::{Location, LocationSnapshot, NavigationEntry};

/// Predicate over snapshots used by [`GobackTarget::Matching`].
pub type Predicate = Arc<dyn Fn(&LocationSnapshot) -> bool + Send + Sync>;

/// Where a goback should land.
#[derive(Clone)]
pub enum GobackTarget {
    /// Go back this many entries. Zero or less is a no-op.
    Steps(i64),
    /// Go back to the oldest entry whose href equals this path.
    Path(String),
    /// Go back to the oldest entry satisfying the predicate.
    Matching(Predicate),
}

impl GobackTarget {
    /// Build a predicate target.
    pub fn matching<F>(predicate: F) -> Self
    where
        F: Fn(&LocationSnapshot) -> bool + Send + Sync + 'static,
    {
        Self::Matching(Arc::new(predicate))
    }

    /// A step count of zero or less.
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Steps(n) if *n <= 0)
    }
}

impl fmt::Debug for GobackTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Steps(n) => f.debug_tuple("Steps").field(n).finish(),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Matching(_) => f.write_str("Matching(..)"),
        }
    }
}

impl From<i64> for GobackTarget {
    fn from(steps: i64) -> Self {
        Self::Steps(steps)
    }
}

impl From<i32> for GobackTarget {
    fn from(steps: i32) -> Self {
        Self::Steps(i64::from(steps))
    }
}

impl From<&str> for GobackTarget {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for GobackTarget {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

/// Locate the index a goback lands on, scanning from the bottom.
///
/// `None` means "no match": the step count is out of range, or no entry
/// has the path or satisfies the predicate.
pub fn find_target(snapshots: &[LocationSnapshot], target: &GobackTarget) -> Option<usize> {
    let len = snapshots.len();
    match target {
        GobackTarget::Steps(steps) => usize::try_from(*steps)
            .ok()
            .filter(|steps| *steps > 0 && *steps < len)
            .map(|steps| len - 1 - steps),
        GobackTarget::Path(path) => {
            let href = Location::href_of(path);
            snapshots.iter().position(|snapshot| snapshot.href() == href)
        }
        GobackTarget::Matching(predicate) => snapshots.iter().position(|s| predicate(s)),
    }
}

/// The outcome of a goback, computed before anything is mutated.
#[derive(Debug, Clone)]
pub struct GobackPlan {
    /// Entry that becomes the top.
    pub target: NavigationEntry,
    /// Entries removed, most recent first.
    pub discarded: Vec<NavigationEntry>,
    /// Entry appended after truncation when nothing matched.
    pub inserted: Option<NavigationEntry>,
    keep: usize,
}

/// Ordered, never-empty sequence of normal entries.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualStack {
    below: Vec<NavigationEntry>,
    top: NavigationEntry,
}

#[allow(clippy::len_without_is_empty)]
impl VirtualStack {
    /// Create a stack holding a single entry.
    pub fn new(top: NavigationEntry) -> Self {
        Self {
            below: Vec::new(),
            top,
        }
    }

    /// Number of entries (always at least one).
    pub fn len(&self) -> usize {
        self.below.len() + 1
    }

    /// The current entry.
    pub fn top(&self) -> &NavigationEntry {
        &self.top
    }

    /// Entry at `index`, counted from the bottom.
    pub fn get(&self, index: usize) -> Option<&NavigationEntry> {
        if index == self.below.len() {
            Some(&self.top)
        } else {
            self.below.get(index)
        }
    }

    /// Entries from oldest to current.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &NavigationEntry> {
        self.below.iter().chain(std::iter::once(&self.top))
    }

    /// Read-only snapshots from oldest to current.
    pub fn snapshots(&self) -> Vec<LocationSnapshot> {
        self.iter().map(NavigationEntry::snapshot).collect()
    }

    /// Make `entry` the new current entry.
    pub fn push(&mut self, entry: NavigationEntry) {
        let previous = std::mem::replace(&mut self.top, entry);
        self.below.push(previous);
    }

    /// Overwrite the current entry, returning the one it replaced.
    pub fn replace_top(&mut self, entry: NavigationEntry) -> NavigationEntry {
        std::mem::replace(&mut self.top, entry)
    }

    /// Insert `entry` beneath everything else.
    pub fn insert_root(&mut self, entry: NavigationEntry) {
        self.below.insert(0, entry);
    }

    /// Plan a goback landing on `found`, or on `fallback()` when nothing matched.
    pub fn plan_goback<F>(&self, found: Option<usize>, fallback: F) -> GobackPlan
    where
        F: FnOnce() -> NavigationEntry,
    {
        match found.and_then(|index| self.get(index).map(|entry| (index, entry))) {
            Some((index, entry)) => {
                let mut discarded = Vec::new();
                if index < self.below.len() {
                    let above = self.below.get(index + 1..).unwrap_or_default();
                    let above = above.iter().chain(std::iter::once(&self.top));
                    discarded.extend(above.rev().cloned());
                }
                GobackPlan {
                    target: entry.clone(),
                    discarded,
                    inserted: None,
                    keep: index + 1,
                }
            }
            None => {
                let target = fallback();
                GobackPlan {
                    discarded: self.iter().rev().cloned().collect(),
                    inserted: Some(target.clone()),
                    target,
                    keep: 0,
                }
            }
        }
    }

    /// Truncate (and insert) according to a plan made against this stack.
    pub fn apply_goback(&mut self, plan: GobackPlan) {
        match plan.inserted {
            Some(entry) => {
                self.below.clear();
                self.top = entry;
            }
            None => {
                while self.len() > plan.keep.max(1) {
                    match self.below.pop() {
                        Some(next) => self.top = next,
                        None => break,
                    }
                }
            }
        }
    }
}
