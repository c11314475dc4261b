//! Mock GPIO implementation for testing

use heapless::Vec;

use super::{HISTORY_DEPTH, next_sequence};
use crate::platform::{
    Result,
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
};

/// A recorded pin write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    /// Crate-wide event stamp
    pub seq: u32,
    /// Level written
    pub high: bool,
}

/// Mock GPIO implementation
///
/// Tracks pin state (high/low), mode and every write for test verification.
#[derive(Debug)]
pub struct MockGpio {
    state: bool,
    mode: GpioMode,
    history: Vec<LevelChange, HISTORY_DEPTH>,
    reject_mode: bool,
    fail_writes: bool,
}

impl MockGpio {
    /// Create a new mock GPIO in output mode
    pub fn new_output() -> Self {
        Self::with_mode(GpioMode::OutputPushPull)
    }

    /// Create a new mock GPIO in input mode
    pub fn new_input() -> Self {
        Self::with_mode(GpioMode::Input)
    }

    fn with_mode(mode: GpioMode) -> Self {
        Self {
            state: false,
            mode,
            history: Vec::new(),
            reject_mode: false,
            fail_writes: false,
        }
    }

    /// Make every subsequent `set_mode` call fail
    pub fn reject_mode_changes(mut self) -> Self {
        self.reject_mode = true;
        self
    }

    /// Make every subsequent write fail with a hardware error
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// All writes in the order they happened
    pub fn history(&self) -> &[LevelChange] {
        &self.history
    }

    /// Levels written, without stamps
    pub fn levels(&self) -> impl Iterator<Item = bool> + '_ {
        self.history.iter().map(|change| change.high)
    }

    /// Forget recorded writes
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn write(&mut self, high: bool) -> Result<()> {
        if self.fail_writes {
            return Err(PlatformError::Gpio(GpioError::HardwareError));
        }
        if !self.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.state = high;
        // History is best-effort once full
        let _ = self.history.push(LevelChange {
            seq: next_sequence(),
            high,
        });
        Ok(())
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.write(true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.write(false)
    }

    fn read(&self) -> bool {
        self.state
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        if self.reject_mode {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_gpio_output() {
        let mut gpio = MockGpio::new_output();
        assert!(!gpio.read());

        gpio.set_high().unwrap();
        assert!(gpio.read());

        gpio.set_low().unwrap();
        assert!(!gpio.read());
    }

    #[test]
    fn test_mock_gpio_input_rejects_writes() {
        let mut gpio = MockGpio::new_input();
        assert!(gpio.set_high().is_err());
        assert!(gpio.set_low().is_err());
        assert!(gpio.history().is_empty());

        gpio.set_mode(GpioMode::OutputPushPull).unwrap();
        assert!(gpio.set_high().is_ok());
    }

    #[test]
    fn test_mock_gpio_history_is_ordered() {
        let mut gpio = MockGpio::new_output();
        gpio.set_high().unwrap();
        gpio.set_level(false).unwrap();
        gpio.set_high().unwrap();

        let levels: std::vec::Vec<bool> = gpio.levels().collect();
        assert_eq!(levels, [true, false, true]);

        let history = gpio.history();
        assert!(history[0].seq < history[1].seq);
        assert!(history[1].seq < history[2].seq);
    }

    #[test]
    fn test_mock_gpio_failure_injection() {
        let mut gpio = MockGpio::new_output();
        gpio.fail_writes(true);
        assert_eq!(
            gpio.set_high(),
            Err(PlatformError::Gpio(GpioError::HardwareError))
        );
        assert!(!gpio.read());

        let mut gpio = MockGpio::new_input().reject_mode_changes();
        assert!(gpio.set_mode(GpioMode::OutputPushPull).is_err());
        assert_eq!(gpio.mode(), GpioMode::Input);
    }
}
