//! Bounded polling used instead of fixed sleeps where a condition can be observed.

use std::thread;
use std::time::{Duration, Instant};

/// Poll `condition` every `interval` until it holds or `timeout` elapses.
///
/// Returns whether the condition was observed to hold. The condition is
/// always checked at least once, even with a zero timeout.
pub fn poll_until(timeout: Duration, interval: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    loop {
        if condition() {
            return true;
        }
        if start.elapsed() >= timeout {
            return false;
        }
        thread::sleep(interval.min(timeout.saturating_sub(start.elapsed())));
    }
}

/// Retry `op` up to `attempts` times, sleeping `interval` between tries.
pub fn retry<T, E>(
    attempts: usize,
    interval: Duration,
    mut op: impl FnMut() -> Result<T, E>,
) -> Result<T, E> {
    let mut remaining = attempts.max(1);
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) => {
                remaining -= 1;
                if remaining == 0 {
                    return Err(err);
                }
                thread::sleep(interval);
            }
        }
    }
}
