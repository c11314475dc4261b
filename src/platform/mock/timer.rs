//! Mock Timer implementation for testing

use heapless::Vec;

use super::{HISTORY_DEPTH, next_sequence};
use crate::platform::{
    Result,
    error::{PlatformError, TimerError},
    traits::TimerInterface,
};

/// A recorded delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delay {
    /// Crate-wide event stamp
    pub seq: u32,
    /// Requested duration in microseconds
    pub us: u64,
}

/// Mock Timer implementation
///
/// Uses simulated time: a delay advances the clock instantly and is recorded.
#[derive(Debug)]
pub struct MockTimer {
    now_us: u64,
    delays: Vec<Delay, HISTORY_DEPTH>,
    fail_delays: bool,
}

impl MockTimer {
    /// Create a new mock timer
    pub fn new() -> Self {
        Self {
            now_us: 0,
            delays: Vec::new(),
            fail_delays: false,
        }
    }

    /// Make every subsequent delay fail without advancing time
    pub fn fail_delays(&mut self, fail: bool) {
        self.fail_delays = fail;
    }

    /// All delays in the order they happened
    pub fn delays(&self) -> &[Delay] {
        &self.delays
    }

    fn wait(&mut self, us: u64) -> Result<()> {
        if self.fail_delays {
            return Err(PlatformError::Timer(TimerError::InvalidDuration));
        }
        let seq = next_sequence();
        self.now_us = self
            .now_us
            .checked_add(us)
            .ok_or(PlatformError::Timer(TimerError::Overflow))?;
        let _ = self.delays.push(Delay { seq, us });
        Ok(())
    }
}

impl Default for MockTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerInterface for MockTimer {
    fn delay_us(&mut self, us: u32) -> Result<()> {
        self.wait(us as u64)
    }

    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        self.wait(ms as u64 * 1000)
    }

    fn now_us(&self) -> u64 {
        self.now_us
    }
}
