//! Counter storage for rate limiting
//!
//! Production deployments plug in a shared store (cache, redis, ...) behind
//! [`CounterBackend`]; [`MemoryBackend`] keeps fixed-window counters in
//! process memory.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use feedlens_engine::Rate;
use rustc_hash::FxHashMap;

use crate::error::{FeedResult, FeedlensError};

/// Seconds since the Unix epoch
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

/// Atomic increment-and-read against a windowed counter store.
pub trait CounterBackend: Send + Sync {
    /// Increments the counter of `key` under `rule` for the window `rate`
    /// defines, returning the hit count after the increment.
    fn incr(&self, rule: &str, key: &str, rate: &Rate) -> FeedResult<u64>;
}

/// Seconds between sweeps of ended windows during [`MemoryBackend::incr`]
pub const SWEEP_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    window: u64,
    hits: u64,
    /// First second after the window
    expires_at: u64,
}

#[derive(Debug, Default)]
struct CounterTable {
    counters: FxHashMap<String, WindowCounter>,
    next_sweep: u64,
}

impl CounterTable {
    fn sweep(&mut self, now: u64) -> usize {
        let before = self.counters.len();
        self.counters.retain(|_, c| c.expires_at > now);
        self.next_sweep = now.saturating_add(SWEEP_INTERVAL_SECS);
        before - self.counters.len()
    }
}

/// In-process fixed-window counter store
///
/// Ended windows are swept at most once per [`SWEEP_INTERVAL_SECS`] while
/// incrementing, so the table holds roughly the keys seen in the live windows.
pub struct MemoryBackend {
    table: Mutex<CounterTable>,
    clock: Clock,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(system_now_secs))
    }

    /// Uses `clock` instead of the system time.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            table: Mutex::new(CounterTable::default()),
            clock,
        }
    }

    /// Number of tracked counters
    pub fn len(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .counters
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops counters whose window has ended, returning how many were removed.
    pub fn purge_expired(&self) -> FeedResult<usize> {
        let now = (self.clock)();
        Ok(self.lock()?.sweep(now))
    }

    fn lock(&self) -> FeedResult<MutexGuard<'_, CounterTable>> {
        self.table
            .lock()
            .map_err(|e| FeedlensError::BackendError(format!("counter lock poisoned: {}", e)))
    }
}

impl CounterBackend for MemoryBackend {
    fn incr(&self, rule: &str, key: &str, rate: &Rate) -> FeedResult<u64> {
        let now = (self.clock)();
        let window = rate.window(now);
        let fresh = WindowCounter {
            window,
            hits: 0,
            expires_at: window.saturating_add(1).saturating_mul(rate.period_secs),
        };
        let storage_key = format!("{}:{}:{}", rule, rate, key);

        let mut table = self.lock()?;
        if now >= table.next_sweep {
            let dropped = table.sweep(now);
            if dropped > 0 {
                log::debug!("swept {} ended rate-limit windows", dropped);
            }
        }

        let counter = table.counters.entry(storage_key).or_insert(fresh);
        if counter.window != window {
            *counter = fresh;
        }
        counter.hits += 1;
        Ok(counter.hits)
    }
}

fn system_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
