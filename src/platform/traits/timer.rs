//! Timer interface trait
//!
//! Blocking delays and a monotonic clock. The PWM driver uses the delay to hold a
//! timed pulse; nothing in the driver runs while it waits.

use crate::platform::Result;

/// Blocking timer
///
/// `now_us` must never go backwards. A failed delay must return promptly so the
/// caller can put the outputs back to sleep.
pub trait TimerInterface {
    /// Busy-wait for at least `us` microseconds
    ///
    /// # Errors
    ///
    /// `PlatformError::Timer` if the wait could not be performed.
    fn delay_us(&mut self, us: u32) -> Result<()>;

    /// Busy-wait for at least `ms` milliseconds
    ///
    /// # Errors
    ///
    /// `PlatformError::Timer` if the wait could not be performed.
    fn delay_ms(&mut self, ms: u32) -> Result<()>;

    /// Microseconds since the timer started
    fn now_us(&self) -> u64;

    /// Milliseconds since the timer started
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}
