//! PWM interface trait
//!
//! This module defines the PWM peripheral interface that platform implementations must
//! provide. A peripheral owns several sub-channels sharing one period; each output pin
//! routed to it maps to exactly one sub-channel.

use crate::platform::{
    Result,
    error::{PlatformError, PwmError},
};

/// Physical GPIO number of an output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub struct PinId(pub u8);

/// PWM sub-channel handle returned by [`PwmInterface::channel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub struct ChannelId(pub u8);

/// PWM configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmConfig {
    /// PWM period in nanoseconds
    pub period_ns: u64,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            period_ns: 50_000, // 20 kHz, above audible range for DC motors
        }
    }
}

/// PWM interface trait
///
/// Platform implementations must provide this interface for PWM output control.
/// Values are raw compare counts in `0..=top()`; `top()` is 100% duty.
///
/// # Safety Invariants
///
/// - Only one owner per PWM peripheral
/// - No concurrent access to the same peripheral from multiple contexts
pub trait PwmInterface {
    /// Configure the peripheral and start it with the given period
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidPeriod)` if the period cannot be
    /// produced with the current clock configuration.
    fn configure(&mut self, config: PwmConfig) -> Result<()>;

    /// Resolve the sub-channel an output pin is routed to
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::ChannelUnavailable)` if the pin
    /// cannot be driven by this peripheral.
    fn channel(&mut self, pin: PinId) -> Result<ChannelId>;

    /// Full-scale compare value (100% duty)
    fn top(&self) -> u32;

    /// Set a sub-channel's compare value
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::ValueOutOfRange)` if `value > top()`.
    fn set(&mut self, channel: ChannelId, value: u32) -> Result<()>;

    /// Change the period of all sub-channels
    ///
    /// `top()` may change as a result; callers must re-read it.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidPeriod)` if the period cannot be
    /// produced with the current clock configuration.
    fn set_period(&mut self, period_ns: u64) -> Result<()>;

    /// Invert the output polarity of a sub-channel
    ///
    /// Optional. The default implementation reports the capability as missing.
    fn set_inverting(&mut self, channel: ChannelId, inverting: bool) -> Result<()> {
        let _ = (channel, inverting);
        Err(PlatformError::Pwm(PwmError::InversionUnsupported))
    }
}
