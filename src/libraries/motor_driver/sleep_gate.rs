//! nSLEEP gate shared by both bridges
//!
//! The gate is the only authority over whether outputs are live. It never touches
//! line or PWM values, so waking resumes whatever the bridges last held.

use super::MotorError;
use crate::platform::{GpioInterface, GpioMode, Result};

/// DRV8833 nSLEEP pin
///
/// High = awake (outputs follow the inputs), low = asleep (all outputs High-Z).
pub struct SleepGate<P: GpioInterface> {
    pin: P,
    awake: bool,
}

impl<P: GpioInterface> SleepGate<P> {
    /// Wrap the nSLEEP pin
    ///
    /// The gate is assumed asleep until [`SleepGate::sleep`] or
    /// [`SleepGate::wake`] writes the pin.
    pub fn new(pin: P) -> Self {
        Self { pin, awake: false }
    }

    /// Put the pin in push-pull output mode
    pub(crate) fn configure(&mut self) -> Result<()> {
        self.pin.set_mode(GpioMode::OutputPushPull)
    }

    /// Drive nSLEEP high. Idempotent.
    #[inline]
    pub fn wake(&mut self) -> core::result::Result<(), MotorError> {
        self.pin.set_high().map_err(MotorError::Pin)?;
        self.awake = true;
        Ok(())
    }

    /// Drive nSLEEP low. Idempotent.
    #[inline]
    pub fn sleep(&mut self) -> core::result::Result<(), MotorError> {
        self.pin.set_low().map_err(MotorError::Pin)?;
        self.awake = false;
        Ok(())
    }

    /// Whether the last successful write left the chip awake
    #[inline]
    pub fn is_awake(&self) -> bool {
        self.awake
    }

    /// Access the underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }

    #[cfg(test)]
    pub(crate) fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }

    /// Release the underlying pin
    pub fn free(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockGpio;

    #[test]
    fn test_gate_starts_asleep() {
        let gate = SleepGate::new(MockGpio::new_output());
        assert!(!gate.is_awake());
        assert!(!gate.pin().read());
    }

    #[test]
    fn test_wake_and_sleep_drive_pin() {
        let mut gate = SleepGate::new(MockGpio::new_output());

        gate.wake().unwrap();
        assert!(gate.is_awake());
        assert!(gate.pin().read());

        gate.sleep().unwrap();
        assert!(!gate.is_awake());
        assert!(!gate.pin().read());
    }

    #[test]
    fn test_wake_and_sleep_are_idempotent() {
        let mut gate = SleepGate::new(MockGpio::new_output());

        gate.wake().unwrap();
        gate.wake().unwrap();
        assert!(gate.is_awake());
        assert!(gate.pin().read());

        gate.sleep().unwrap();
        gate.sleep().unwrap();
        assert!(!gate.is_awake());
        assert!(!gate.pin().read());
    }

    #[test]
    fn test_failed_write_keeps_state() {
        let mut pin = MockGpio::new_output();
        pin.fail_writes(true);
        let mut gate = SleepGate::new(pin);

        assert!(matches!(gate.wake(), Err(MotorError::Pin(_))));
        assert!(!gate.is_awake());
    }
}
