//! In-memory native history for tests and replays.
//!
//! Behaves like a browser tab's session history: pushing drops forward
//! entries, out-of-range steps do nothing, and every step is reported as a
//! [`Notification`]. Also records every call for verification.

use super::{NativeHistory, Notification, SessionMarker};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::UnboundedSender;

/// One simulated native history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEntry {
    /// Application address.
    pub address: String,
    /// State payload.
    pub payload: Option<Value>,
    /// Display title recorded for the entry.
    pub title: Option<String>,
}

impl MemoryEntry {
    fn bare(address: &str) -> Self {
        Self {
            address: address.to_string(),
            payload: None,
            title: None,
        }
    }
}

/// A call made against [`MemoryHistory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCall {
    /// `push_entry` at this address.
    Push {
        /// Address pushed.
        address: String,
        /// Title recorded for the entry left behind.
        title: Option<String>,
    },
    /// `replace_entry` at this address.
    Replace {
        /// Address written.
        address: String,
    },
    /// `go` by this delta.
    Go(i64),
}

/// Simulated session history.
///
/// Clones share state, so a test can keep one handle while the state
/// machine owns another.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    inner: Arc<Mutex<MemoryHistoryInner>>,
}

#[derive(Debug)]
struct MemoryHistoryInner {
    entries: Vec<MemoryEntry>,
    index: usize,
    listener: Option<UnboundedSender<Notification>>,
    available: bool,
    default_context: bool,
    calls: Vec<NativeCall>,
}

impl MemoryHistory {
    /// Create a history holding one bare entry at `address`.
    pub fn new(address: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryHistoryInner {
                entries: vec![MemoryEntry::bare(address)],
                index: 0,
                listener: None,
                available: true,
                default_context: false,
                calls: Vec::new(),
            })),
        }
    }

    /// Create a history that claims to be the default navigation context.
    pub fn default_context(address: &str) -> Self {
        let history = Self::new(address);
        history.lock().default_context = true;
        history
    }

    /// Create a history whose environment offers no navigation capability.
    pub fn unavailable() -> Self {
        let history = Self::new("/");
        history.lock().available = false;
        history
    }

    fn lock(&self) -> MutexGuard<'_, MemoryHistoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<MemoryEntry> {
        self.lock().entries.clone()
    }

    /// Index of the current entry.
    pub fn index(&self) -> usize {
        self.lock().index
    }

    /// The current entry.
    pub fn current(&self) -> MemoryEntry {
        let inner = self.lock();
        inner.entries[inner.index].clone()
    }

    /// Whether a forward entry exists.
    pub fn can_go_forward(&self) -> bool {
        let inner = self.lock();
        inner.index + 1 < inner.entries.len()
    }

    /// Whether a listener is registered.
    pub fn is_listening(&self) -> bool {
        self.lock().listener.is_some()
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<NativeCall> {
        self.lock().calls.clone()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// The user pressed the native back button.
    pub fn user_back(&self) {
        self.step(-1);
    }

    /// The user pressed the native forward button.
    pub fn user_forward(&self) {
        self.step(1);
    }

    /// The user typed `address` into the address bar or followed a plain
    /// link. Creates a payload-less entry unless the address is unchanged.
    pub fn user_navigate(&self, address: &str) {
        let mut inner = self.lock();
        let old_address = inner.entries[inner.index].address.clone();
        if old_address == address {
            return;
        }
        let next = inner.index + 1;
        inner.entries.truncate(next);
        inner.entries.push(MemoryEntry::bare(address));
        inner.index = next;
        inner.notify(old_address, address.to_string());
    }

    fn step(&self, delta: i64) {
        let mut inner = self.lock();
        let Some(target) = inner.target_of(delta) else {
            return;
        };
        let old_address = inner.entries[inner.index].address.clone();
        inner.index = target;
        let new_address = inner.entries[target].address.clone();
        inner.notify(old_address, new_address);
    }
}

impl MemoryHistoryInner {
    fn target_of(&self, delta: i64) -> Option<usize> {
        if delta == 0 {
            return None;
        }
        let target = i64::try_from(self.index).ok()?.checked_add(delta)?;
        usize::try_from(target)
            .ok()
            .filter(|target| *target < self.entries.len())
    }

    fn notify(&mut self, old_address: String, new_address: String) {
        if let Some(listener) = &self.listener {
            let delivered = listener
                .send(Notification {
                    old_address,
                    new_address,
                })
                .is_ok();
            if !delivered {
                self.listener = None;
            }
        }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl NativeHistory for MemoryHistory {
    fn is_available(&self) -> bool {
        self.lock().available
    }

    fn is_default_context(&self) -> bool {
        self.lock().default_context
    }

    fn push_entry(&self, payload: Option<Value>, title: Option<&str>, address: &str) {
        let mut inner = self.lock();
        inner.calls.push(NativeCall::Push {
            address: address.to_string(),
            title: title.map(str::to_string),
        });

        let index = inner.index;
        if let Some(title) = title {
            inner.entries[index].title = Some(title.to_string());
        }
        inner.entries.truncate(index + 1);
        inner.entries.push(MemoryEntry {
            address: address.to_string(),
            payload,
            title: None,
        });
        inner.index = index + 1;
    }

    fn replace_entry(&self, payload: Option<Value>, title: Option<&str>, address: &str) {
        let mut inner = self.lock();
        inner.calls.push(NativeCall::Replace {
            address: address.to_string(),
        });

        let index = inner.index;
        let entry = &mut inner.entries[index];
        entry.address = address.to_string();
        entry.payload = payload;
        if let Some(title) = title {
            entry.title = Some(title.to_string());
        }
    }

    fn go(&self, delta: i64) {
        self.lock().calls.push(NativeCall::Go(delta));
        self.step(delta);
    }

    fn current_payload(&self) -> Option<Value> {
        let inner = self.lock();
        inner.entries[inner.index].payload.clone()
    }

    fn current_address(&self) -> String {
        let inner = self.lock();
        inner.entries[inner.index].address.clone()
    }

    fn listen(&self, sender: UnboundedSender<Notification>) {
        self.lock().listener = Some(sender);
    }

    fn unlisten(&self) {
        self.lock().listener = None;
    }
}

/// In-memory session marker.
#[derive(Debug, Default, Clone)]
pub struct MemorySession {
    flag: Arc<AtomicBool>,
}

impl MemorySession {
    /// Create an unset marker.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionMarker for MemorySession {
    fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn set(&self, value: bool) {
        self.flag.store(value, Ordering::SeqCst);
    }
}
