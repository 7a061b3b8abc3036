use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Every this many checks the map drops windows past their reset time, so
/// one-shot keys (failed logins for invented emails) cannot accumulate
/// forever.
const PURGE_EVERY: u64 = 512;

/// Outcome of a single check-and-increment.
#[derive(Debug, Clone, Copy)]
pub struct RateDecision {
    pub ok: bool,
    pub remaining: u32,
    pub retry_after: Option<Duration>,
}

#[derive(Debug)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// In-process fixed-window counter. The DashMap entry guard holds the shard
/// lock for the whole read-check-increment sequence, so two concurrent
/// requests cannot both slip through at the limit boundary. Process-local
/// only; a multi-instance deployment swaps this for a shared counter store
/// behind the same contract.
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    checks: AtomicU64,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            windows: DashMap::new(),
            checks: AtomicU64::new(0),
        }
    }

    /// Key composition is the caller's responsibility, typically
    /// `action:org:identity`.
    pub fn check(&self, key: &str, limit: u32, window: Duration) -> RateDecision {
        if self.checks.fetch_add(1, Ordering::Relaxed) % PURGE_EVERY == 0 {
            self.purge_expired();
        }

        let now = Instant::now();
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            reset_at: now + window,
        });

        // Lazy reset: an expired window starts fresh instead of incrementing.
        if now >= entry.reset_at {
            entry.count = 0;
            entry.reset_at = now + window;
        }

        if entry.count >= limit {
            return RateDecision {
                ok: false,
                remaining: 0,
                retry_after: Some(entry.reset_at.saturating_duration_since(now)),
            };
        }

        entry.count += 1;
        RateDecision {
            ok: true,
            remaining: limit - entry.count,
            retry_after: None,
        }
    }

    /// Drop windows whose reset time has passed. Driven from `check`;
    /// correctness never depends on it.
    fn purge_expired(&self) {
        let now = Instant::now();
        self.windows.retain(|_, window| window.reset_at > now);
    }
}
