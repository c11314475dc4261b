//! DRV8833 dual H-bridge driver
//!
//! This module drives the two independent H-bridges (channels A and B) of a TI DRV8833
//! and its shared nSLEEP gate.
//!
//! ## Variants
//!
//! - [`Drv8833`]: digital control of the four input lines (brake, coast, raw line access)
//! - [`Drv8833Pwm`]: duty-cycle control with fast/slow decay and timed pulses
//!
//! Both own a single [`SleepGate`]. While it is low every output is high-impedance,
//! whatever the input lines hold. Line and PWM values are retained across sleep, so a
//! wake resumes the last drive state.
//!
//! ## DRV8833 PWM Control Truth Table
//!
//! | xIN1 | xIN2 | Function                  |
//! |------|------|---------------------------|
//! | PWM  | 0    | Forward PWM, fast decay   |
//! | 1    | PWM  | Forward PWM, slow decay   |
//! | 0    | PWM  | Reverse PWM, fast decay   |
//! | PWM  | 1    | Reverse PWM, slow decay   |
//! | 0    | 0    | Coast (High-Z)            |
//! | 1    | 1    | Brake (slow decay)        |
//!
//! In slow decay the load is driven while the PWM line is *low*. Enable
//! [`PwmDriverConfig::invert_slow_decay`] on peripherals that can invert a channel to
//! make the driven fraction equal the requested duty in both decay modes.
//!
//! ## Example - Solenoid Pulse
//!
//! ```ignore
//! use drv8833::libraries::motor_driver::{
//!     BridgeChannel, DecayMode, Drv8833Pwm, Polarity, PwmBridge, PwmDriverConfig,
//! };
//! use drv8833::platform::PinId;
//!
//! let bridge_a = PwmBridge::new(pwm_slice_1, PinId(2), PinId(3));
//! let bridge_b = PwmBridge::new(pwm_slice_2, PinId(4), PinId(5));
//! let mut driver = Drv8833Pwm::new(bridge_a, bridge_b, nsleep, timer, PwmDriverConfig::default());
//! driver.configure()?;
//!
//! // 60% duty on AIN1, fast decay (forward, wakes the chip)
//! driver.run(BridgeChannel::A, 60, Polarity::In1, DecayMode::Fast)?;
//!
//! // Latch a solenoid: full power for 200 ms, then back to sleep
//! driver.pulse(BridgeChannel::B, 100, Polarity::In1, 200, DecayMode::Fast)?;
//! ```
//!
//! ## References
//!
//! - [DRV8833 Datasheet](https://www.ti.com/lit/ds/symlink/drv8833.pdf)

use core::fmt;

use crate::platform::PlatformError;

pub mod config;
pub mod digital;
pub mod duty;
pub mod pwm;
pub mod sleep_gate;
pub mod warning;

// Re-export main types
pub use config::PwmDriverConfig;
pub use digital::{DigitalBridge, Drv8833};
pub use duty::{ChannelValues, MAX_DUTY};
pub use pwm::{BridgeState, Drv8833Pwm, PwmBridge};
pub use sleep_gate::SleepGate;
#[cfg(any(test, feature = "mock"))]
pub use warning::RecordingWarnings;
pub use warning::{DriverWarning, LogWarnings, WarningSink};

/// One of the two independent H-bridges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum BridgeChannel {
    /// AIN1/AIN2 -> AOUT1/AOUT2
    A,
    /// BIN1/BIN2 -> BOUT1/BOUT2
    B,
}

/// One of the two input lines of a bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum Line {
    /// xIN1
    One,
    /// xIN2
    Two,
}

/// Which input line carries the modulated signal
///
/// Swapping the modulated line reverses the current through the load. With fast decay
/// `In1` drives forward; with slow decay the same input drives reverse (see the truth
/// table above).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum Polarity {
    /// Duty on xIN1
    In1,
    /// Duty on xIN2
    In2,
}

impl Polarity {
    /// Line carrying the duty cycle
    pub fn line(self) -> Line {
        match self {
            Polarity::In1 => Line::One,
            Polarity::In2 => Line::Two,
        }
    }

    /// The opposite polarity
    pub fn reversed(self) -> Self {
        match self {
            Polarity::In1 => Polarity::In2,
            Polarity::In2 => Polarity::In1,
        }
    }
}

/// Current recirculation between PWM pulses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum DecayMode {
    /// Non-driven line held low; the bridge coasts between pulses
    Fast,
    /// Non-driven line held high; the bridge brakes between pulses
    Slow,
}

/// A duty/polarity/decay request for one bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub struct DriveCommand {
    /// Duty cycle in percent; values above 100 are clamped
    pub duty: u8,
    /// Line carrying the duty cycle
    pub polarity: Polarity,
    /// Level held on the other line
    pub decay: DecayMode,
}

impl DriveCommand {
    /// Build a command, clamping `duty` to 100
    pub fn new(duty: u8, polarity: Polarity, decay: DecayMode) -> Self {
        Self {
            duty: duty::clamp_duty(duty),
            polarity,
            decay,
        }
    }
}

/// Motor driver error types
///
/// Configuration problems are not errors: they are reported through a
/// [`WarningSink`] and the driver keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum MotorError {
    /// An input line or the nSLEEP gate could not be written
    Pin(PlatformError),
    /// A PWM sub-channel rejected a compare value
    Pwm(PlatformError),
    /// The pulse wait failed (the gate is asleep when this is returned)
    Timer(PlatformError),
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::Pin(e) => write!(f, "pin write failed: {}", e),
            MotorError::Pwm(e) => write!(f, "PWM write failed: {}", e),
            MotorError::Timer(e) => write!(f, "pulse wait failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::error::{GpioError, PwmError};

    #[test]
    fn test_polarity_line() {
        assert_eq!(Polarity::In1.line(), Line::One);
        assert_eq!(Polarity::In2.line(), Line::Two);
        assert_eq!(Polarity::In1.reversed(), Polarity::In2);
    }

    #[test]
    fn test_drive_command_clamps_duty() {
        let cmd = DriveCommand::new(150, Polarity::In1, DecayMode::Fast);
        assert_eq!(cmd.duty, 100);

        let cmd = DriveCommand::new(42, Polarity::In2, DecayMode::Slow);
        assert_eq!(cmd.duty, 42);
    }

    #[test]
    fn test_motor_error_display() {
        let err = MotorError::Pin(PlatformError::Gpio(GpioError::HardwareError));
        assert_eq!(
            format!("{}", err),
            "pin write failed: GPIO error: HardwareError"
        );

        let err = MotorError::Pwm(PlatformError::Pwm(PwmError::ValueOutOfRange));
        assert_eq!(
            format!("{}", err),
            "PWM write failed: PWM error: ValueOutOfRange"
        );
    }
}
