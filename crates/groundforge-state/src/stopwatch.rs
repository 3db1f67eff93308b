//! Deadline tracking for exploration loops.

use std::time::{Duration, Instant};

/// Measures time since start and compares it against an optional limit.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use groundforge_state::Stopwatch;
///
/// let unlimited = Stopwatch::start(None);
/// assert!(!unlimited.is_expired());
/// assert_eq!(unlimited.remaining(), None);
///
/// let expired = Stopwatch::start(Some(Duration::ZERO));
/// assert!(expired.is_expired());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
    limit: Option<Duration>,
}

impl Stopwatch {
    /// Starts a stopwatch now.
    pub fn start(limit: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    /// Returns true once the limit has been reached.
    pub fn is_expired(&self) -> bool {
        self.limit.is_some_and(|limit| self.elapsed() >= limit)
    }

    /// Time left before the limit, zero once expired.
    pub fn remaining(&self) -> Option<Duration> {
        self.limit.map(|limit| limit.saturating_sub(self.elapsed()))
    }
}
