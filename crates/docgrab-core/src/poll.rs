//! Fixed-interval polling with an upper bound.
//!
//! Used to wait for an element that renders late. Runs on the calling
//! thread; call from `spawn_blocking` if used from async code.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    Ready(T),
    /// Not there yet; check again after the interval.
    Pending,
    /// Stop polling now.
    Abort,
}

/// Calls `probe` right away and then once per interval until it is ready,
/// it aborts, or `policy.timeout` has elapsed. Timeout and abort both yield
/// `None`; nothing runs after either.
///
/// `probe` gets the time left in the window and must not block past it.
pub fn poll_until<T, F>(policy: PollPolicy, mut probe: F) -> Option<T>
where
    F: FnMut(Duration) -> Probe<T>,
{
    let deadline = Instant::now() + policy.timeout;
    let mut checks = 0u32;
    loop {
        checks += 1;
        match probe(deadline.saturating_duration_since(Instant::now())) {
            Probe::Ready(v) => return Some(v),
            Probe::Abort => {
                tracing::debug!(checks, "poll aborted");
                return None;
            }
            Probe::Pending => {}
        }
        let now = Instant::now();
        if now >= deadline {
            tracing::debug!(checks, timeout = ?policy.timeout, "poll timed out");
            return None;
        }
        std::thread::sleep(policy.interval.min(deadline - now));
    }
}
