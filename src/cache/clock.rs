//! Clock Module
//!
//! Time source for entry timestamps. Expiry and LRU bookkeeping read the
//! clock through this trait so tests can drive time by hand.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

// == Clock ==
/// Source of the current time in Unix milliseconds.
pub trait Clock: Debug + Send + Sync {
    fn now_ms(&self) -> u64;
}

// == System Clock ==
/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // Pre-epoch system time clamps to zero
        Utc::now().timestamp_millis().max(0) as u64
    }
}

// == Mock Clock ==
/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Default, Clone)]
pub struct MockClock {
    now: Arc<AtomicU64>,
}

impl MockClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
