//! Timer Abstractions
//!
//! Monotonic time for the alert cadence and busy-wait helpers for the
//! microsecond protocols of the HC-SR04 and DHT22.

use embassy_time::{Duration, Instant};

/// Milliseconds since boot
#[must_use]
pub fn uptime_ms() -> u64 {
    Instant::now().as_millis()
}

/// Point in time after which a wait gives up
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `timeout_us` microseconds from now
    #[must_use]
    pub fn after_us(timeout_us: u64) -> Self {
        Self {
            at: Instant::now() + Duration::from_micros(timeout_us),
        }
    }

    /// Check if the deadline has passed
    #[must_use]
    pub fn expired(&self) -> bool {
        Instant::now() >= self.at
    }
}

impl defmt::Format for Deadline {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Deadline({}us)", self.at.as_micros());
    }
}

/// Busy-wait until `done` returns true.
///
/// Returns how long it took, or `None` if `timeout_us` passed first.
pub fn spin_until(mut done: impl FnMut() -> bool, timeout_us: u64) -> Option<Duration> {
    let start = Instant::now();
    let deadline = Deadline::after_us(timeout_us);
    loop {
        if done() {
            return Some(Instant::now() - start);
        }
        if deadline.expired() {
            return None;
        }
    }
}
