//! Clock sources the kernel pulls tick timing from.
//!
//! The kernel never reads wall time directly: it asks a [`Clock`] for
//! monotonic elapsed seconds and derives `dt` from consecutive readings.
//! That keeps simulated, paused, and rescaled time first-class: swap the
//! clock, not the kernel.
//!
//! Three sources are provided: [`SystemClock`] (process time since
//! construction), [`ManualClock`] (a cloneable handle tests and simulations
//! advance by hand), and any `Fn() -> f64 + Send` closure.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

/// Monotonic elapsed-seconds provider.
///
/// Readings must never decrease; beyond that, the scale is the caller's
/// business (real or simulated seconds, since the kernel only subtracts
/// consecutive readings).
pub trait Clock: Send {
    /// Current elapsed seconds.
    fn now(&self) -> f64;
}

/// Wall-clock seconds elapsed since the clock was created.
#[derive(Debug)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    /// Start counting from now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock for tests and simulations.
///
/// Cloning shares the underlying cell, so a test can keep one handle,
/// give the kernel another, and advance time between ticks:
///
/// ```rust
/// use gatewave::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::starting_at(5.0);
/// let handle = clock.clone();
///
/// handle.advance(2.5);
/// assert_eq!(clock.now(), 7.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    seconds: Arc<Mutex<f64>>,
}

impl ManualClock {
    /// A clock reading 0.0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock starting at the given reading.
    #[must_use]
    pub fn starting_at(seconds: f64) -> Self {
        Self {
            seconds: Arc::new(Mutex::new(seconds)),
        }
    }

    /// Move the reading forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        *self.seconds.lock() += seconds;
    }

    /// Jump the reading to an absolute value.
    pub fn set(&self, seconds: f64) {
        *self.seconds.lock() = seconds;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.seconds.lock()
    }
}

// Closures work as clocks directly: `builder.with_clock(|| engine_time())`.
impl<F> Clock for F
where
    F: Fn() -> f64 + Send,
{
    fn now(&self) -> f64 {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shares_state_across_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.set(10.0);
        handle.advance(1.5);

        assert!((clock.now() - 11.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_closures_are_clocks() {
        let fixed = || 42.0;
        assert!((Clock::now(&fixed) - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::start();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
