// Per-client sliding-window throttle for booking submissions

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::warn;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Rejected { retry_after_secs: u64 },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// In-memory sliding-window limiter keyed by client address.
///
/// Attempts older than the window are filtered out at check time rather than
/// pruned eagerly; each check rewrites the key's entry, so per-key state stays
/// bounded by the attempt cap. State is process-local and cleared on restart.
pub struct SlidingWindowLimiter {
    attempts: DashMap<String, Vec<DateTime<Utc>>>,
    window: Duration,
    max_attempts: usize,
}

impl SlidingWindowLimiter {
    pub fn new(window_secs: u64, max_attempts: usize) -> Self {
        Self {
            attempts: DashMap::new(),
            window: Duration::seconds(window_secs as i64),
            max_attempts,
        }
    }

    pub fn check(&self, key: &str) -> Admission {
        self.check_at(key, Utc::now())
    }

    /// Admit-or-reject with an explicit clock reading. The map's entry lock is
    /// held for the whole filter-count-record step, so concurrent callers on
    /// one key cannot over-admit past the cap.
    pub fn check_at(&self, key: &str, now: DateTime<Utc>) -> Admission {
        let mut entry = self.attempts.entry(key.to_string()).or_default();
        let cutoff = now - self.window;
        entry.retain(|attempt| *attempt > cutoff);

        if entry.len() >= self.max_attempts {
            warn!(client = %key, attempts = entry.len(), "booking attempt rate limited");
            return Admission::Rejected {
                retry_after_secs: self.window.num_seconds() as u64,
            };
        }

        entry.push(now);
        Admission::Admitted
    }

    /// Number of client keys currently tracked (expired keys included until
    /// their next check rewrites them).
    pub fn tracked_clients(&self) -> usize {
        self.attempts.len()
    }
}
