use std::{
    sync::atomic::{AtomicU32, AtomicU64, Ordering},
    time::{Duration, Instant},
};

/// A fixed-window rate limiter for log output.
///
/// Lock-free and callable from any context. At most `burst` calls to
/// [`RateLimit::allow`] return `true` per window; everything beyond that is
/// suppressed until the window rolls over.
#[derive(Debug)]
pub struct RateLimit {
    /// Window length in microseconds.
    window_us: u64,
    burst: u32,
    epoch: Instant,
    window_start: AtomicU64,
    count: AtomicU32,
}

impl RateLimit {
    pub fn new(window: Duration, burst: u32) -> Self {
        Self {
            window_us: window.as_micros() as u64,
            burst,
            epoch: Instant::now(),
            window_start: AtomicU64::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Returns `true` if the caller is within budget for the current window.
    pub fn allow(&self) -> bool {
        let now = self.epoch.elapsed().as_micros() as u64;
        let start = self.window_start.load(Ordering::Relaxed);
        if now.saturating_sub(start) >= self.window_us {
            // First caller past the boundary opens the new window; losers of
            // the race fall through and count against it.
            if self.window_start.compare_exchange(start, now, Ordering::Relaxed, Ordering::Relaxed).is_ok()
            {
                self.count.store(1, Ordering::Relaxed);
                return true;
            }
        }
        self.count.fetch_add(1, Ordering::Relaxed) < self.burst
    }
}

impl Default for RateLimit {
    /// 10 lines per 5 seconds, the classic kernel ratelimit.
    fn default() -> Self {
        Self::new(Duration::from_secs(5), 10)
    }
}
