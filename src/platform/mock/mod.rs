//! Mock platform implementation for testing
//!
//! This module provides mock implementations of platform traits that can be used
//! for unit testing without requiring actual hardware.
//!
//! Every recorded write carries a stamp from [`next_sequence`], a crate-wide
//! monotonic counter, so a test can order events across separate mock devices
//! (e.g. "the gate went high before the timer started waiting").
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```ignore
//! use drv8833::platform::mock::MockGpio;
//! use drv8833::platform::traits::GpioInterface;
//!
//! let mut gpio = MockGpio::new_output();
//! gpio.set_high().unwrap();
//! assert!(gpio.read());
//! ```

#![cfg(any(test, feature = "mock"))]

use core::sync::atomic::{AtomicU32, Ordering};

mod gpio;
mod pwm;
mod timer;

pub use gpio::{LevelChange, MockGpio};
pub use pwm::{MockPwm, PwmWrite};
pub use timer::{Delay, MockTimer};

/// Maximum number of events each mock device records
pub const HISTORY_DEPTH: usize = 32;

static SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Next value of the crate-wide event counter
pub fn next_sequence() -> u32 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}
