//! Strictly increasing entry timestamps.

/// Hands out millisecond timestamps that never repeat or go backwards.
///
/// The wall clock is sampled by the caller; two entries created within the
/// same millisecond still get distinct, ordered timestamps.
#[derive(Debug, Clone, Default)]
pub struct MonotonicClock {
    last: Option<i64>,
}

impl MonotonicClock {
    /// Create a clock that has not issued any timestamp yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next timestamp given the current wall clock reading.
    pub fn tick(&mut self, now_ms: i64) -> i64 {
        let next = match self.last {
            Some(last) if now_ms <= last => last + 1,
            _ => now_ms,
        };
        self.last = Some(next);
        next
    }
}
