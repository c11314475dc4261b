//! Platform error types
//!
//! This module defines error types for platform operations.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All platform implementations map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum PlatformError {
    /// PWM operation failed
    Pwm(PwmError),
    /// GPIO operation failed
    Gpio(GpioError),
    /// Timer operation failed
    Timer(TimerError),
    /// Invalid configuration provided
    InvalidConfig,
}

/// PWM-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum PwmError {
    /// Compare value above the peripheral's full-scale value
    ValueOutOfRange,
    /// Period cannot be produced by the peripheral clock
    InvalidPeriod,
    /// Pin is not routed to this peripheral
    ChannelUnavailable,
    /// Peripheral cannot invert channel polarity
    InversionUnsupported,
    /// Underlying HAL rejected the write
    HardwareError,
}

/// GPIO-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum GpioError {
    /// Invalid mode for operation
    InvalidMode,
    /// Underlying HAL rejected the write
    HardwareError,
}

/// Timer-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum TimerError {
    /// Timer overflow
    Overflow,
    /// Invalid duration
    InvalidDuration,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Pwm(e) => write!(f, "PWM error: {:?}", e),
            PlatformError::Gpio(e) => write!(f, "GPIO error: {:?}", e),
            PlatformError::Timer(e) => write!(f, "Timer error: {:?}", e),
            PlatformError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}
