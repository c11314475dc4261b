//! Fail-soft configuration warnings
//!
//! Peripheral configuration failures (period, channel binding, inversion, pin mode)
//! do not abort the driver. They are handed to a [`WarningSink`] and the driver
//! continues with whatever state resulted, e.g. a zero [`ChannelId`] for a failed
//! binding.

use super::BridgeChannel;
use crate::platform::{ChannelId, PinId, PlatformError};

/// A recoverable configuration failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum DriverWarning {
    /// The bridge's PWM peripheral rejected its configuration
    Configure {
        bridge: BridgeChannel,
        error: PlatformError,
    },
    /// A line could not be bound to a PWM sub-channel
    Bind {
        bridge: BridgeChannel,
        pin: PinId,
        error: PlatformError,
    },
    /// The bridge's PWM peripheral rejected a new period
    Period {
        bridge: BridgeChannel,
        error: PlatformError,
    },
    /// Polarity inversion could not be applied
    Inverting {
        bridge: BridgeChannel,
        channel: ChannelId,
        error: PlatformError,
    },
    /// A digital line or the gate could not be switched to output mode
    PinMode { error: PlatformError },
}

/// Receiver for fail-soft warnings
pub trait WarningSink {
    /// Report a warning. Must not fail.
    fn warn(&mut self, warning: DriverWarning);
}

/// Default sink: forwards warnings to `log_warn!`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogWarnings;

impl WarningSink for LogWarnings {
    fn warn(&mut self, warning: DriverWarning) {
        crate::log_warn!("DRV8833 degraded: {:?}", warning);
    }
}

/// Sink that keeps the first warnings it receives, for tests
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct RecordingWarnings {
    warnings: heapless::Vec<DriverWarning, 16>,
}

#[cfg(any(test, feature = "mock"))]
impl RecordingWarnings {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings received so far
    pub fn warnings(&self) -> &[DriverWarning] {
        &self.warnings
    }
}

#[cfg(any(test, feature = "mock"))]
impl WarningSink for RecordingWarnings {
    fn warn(&mut self, warning: DriverWarning) {
        let _ = self.warnings.push(warning);
    }
}
