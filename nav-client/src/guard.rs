//! Single-instance guard for the default navigation context.
//!
//! Two undestroyed instances driving the same tab's history would fight over
//! the sentinel, so only one may exist per process.

use std::sync::atomic::{AtomicBool, Ordering};

static DEFAULT_CONTEXT_CLAIMED: AtomicBool = AtomicBool::new(false);

/// Claim the default context. Returns `false` if it is already claimed.
pub(crate) fn claim() -> bool {
    DEFAULT_CONTEXT_CLAIMED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok()
}

/// Release a claim made by [`claim`].
pub(crate) fn release() {
    DEFAULT_CONTEXT_CLAIMED.store(false, Ordering::SeqCst);
}

/// Whether an undestroyed instance owns the default context.
pub fn default_context_claimed() -> bool {
    DEFAULT_CONTEXT_CLAIMED.load(Ordering::SeqCst)
}
