//! RP2350 GPIO implementation
//!
//! This module provides GPIO support for RP2350 using the `rp235x-hal` crate.

use crate::platform::{
    Result,
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
};
use embedded_hal_1::digital::OutputPin;
use rp235x_hal::gpio::{FunctionSioOutput, Pin, PinId, PullType};

/// RP2350 GPIO output implementation
///
/// Wraps an `rp235x-hal` push-pull output pin to implement the `GpioInterface` trait.
/// The pin function is fixed by its type, so only output modes are accepted.
pub struct Rp2350Gpio<I: PinId, P: PullType> {
    pin: Pin<I, FunctionSioOutput, P>,
    mode: GpioMode,
    level: bool,
}

impl<I: PinId, P: PullType> Rp2350Gpio<I, P> {
    /// Create a new RP2350 GPIO instance
    ///
    /// # Arguments
    ///
    /// * `pin` - The HAL output pin
    /// * `mode` - Output mode the pin was configured with
    pub fn new(pin: Pin<I, FunctionSioOutput, P>, mode: GpioMode) -> Self {
        Self {
            pin,
            mode,
            level: false,
        }
    }

    /// Release the HAL pin
    pub fn free(self) -> Pin<I, FunctionSioOutput, P> {
        self.pin
    }
}

impl<I: PinId, P: PullType> GpioInterface for Rp2350Gpio<I, P> {
    fn set_high(&mut self) -> Result<()> {
        self.pin
            .set_high()
            .map_err(|_| PlatformError::Gpio(GpioError::HardwareError))?;
        self.level = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<()> {
        self.pin
            .set_low()
            .map_err(|_| PlatformError::Gpio(GpioError::HardwareError))?;
        self.level = false;
        Ok(())
    }

    fn read(&self) -> bool {
        self.level
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        // Switching to input would need a pin type conversion
        if !mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
