//! Duty-cycle and decay-mode mapping
//!
//! Converts a [`DriveCommand`] into the two compare values of one bridge:
//!
//! - polarity line: `top * duty / 100`, truncated
//! - other line: `top` for slow decay, `0` for fast decay
//!
//! The truncation is the quantization the peripheral imposes; no rounding is applied.

use super::{DecayMode, DriveCommand};

/// Highest accepted duty cycle in percent
pub const MAX_DUTY: u8 = 100;

/// Compare values for the two sub-channels of a bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub struct ChannelValues {
    /// Value for the line carrying the duty cycle
    pub polarity: u32,
    /// Value for the other line
    pub hold: u32,
}

/// Clamp a duty cycle to `0..=100`
#[inline]
pub fn clamp_duty(duty: u8) -> u8 {
    duty.min(MAX_DUTY)
}

/// Compare value for `duty` percent of `top`
///
/// Computed in 64 bits so any 32-bit `top` is safe.
#[inline]
pub fn duty_value(top: u32, duty: u8) -> u32 {
    (top as u64 * clamp_duty(duty) as u64 / MAX_DUTY as u64) as u32
}

/// Compare value held on the non-modulated line
#[inline]
pub fn hold_value(top: u32, decay: DecayMode) -> u32 {
    match decay {
        DecayMode::Fast => 0,
        DecayMode::Slow => top,
    }
}

/// Map a command onto the bridge's two compare values
#[inline]
pub fn channel_values(top: u32, command: &DriveCommand) -> ChannelValues {
    ChannelValues {
        polarity: duty_value(top, command.duty),
        hold: hold_value(top, command.decay),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libraries::motor_driver::Polarity;

    #[test]
    fn test_duty_value_truncates() {
        assert_eq!(duty_value(1000, 60), 600);
        assert_eq!(duty_value(999, 50), 499);
        assert_eq!(duty_value(999, 1), 9);
        assert_eq!(duty_value(65535, 33), 21626);
    }

    #[test]
    fn test_duty_value_matches_floor_for_all_percentages() {
        for top in [0u32, 1, 255, 999, 1000, 4095, 65535] {
            for duty in 0..=MAX_DUTY {
                let expected = (top as f64 * duty as f64 / 100.0).floor() as u32;
                assert_eq!(duty_value(top, duty), expected, "top={top} duty={duty}");
            }
        }
    }

    #[test]
    fn test_duty_value_clamps_above_100() {
        let full = duty_value(1000, 100);
        assert_eq!(full, 1000);
        for duty in [101u8, 150, 200, u8::MAX] {
            assert_eq!(duty_value(1000, duty), full);
        }
    }

    #[test]
    fn test_duty_value_large_top_does_not_overflow() {
        assert_eq!(duty_value(u32::MAX, 100), u32::MAX);
        assert_eq!(duty_value(u32::MAX, 50), u32::MAX / 2);
    }

    #[test]
    fn test_hold_value_by_decay() {
        assert_eq!(hold_value(1000, DecayMode::Slow), 1000);
        assert_eq!(hold_value(1000, DecayMode::Fast), 0);
    }

    #[test]
    fn test_channel_values_slow_decay() {
        let cmd = DriveCommand::new(60, Polarity::In1, DecayMode::Slow);
        assert_eq!(
            channel_values(1000, &cmd),
            ChannelValues {
                polarity: 600,
                hold: 1000
            }
        );
    }

    #[test]
    fn test_channel_values_out_of_range_fast_decay() {
        // Constructed directly so the clamp inside the mapping is exercised
        let cmd = DriveCommand {
            duty: 150,
            polarity: Polarity::In1,
            decay: DecayMode::Fast,
        };
        assert_eq!(
            channel_values(1000, &cmd),
            ChannelValues {
                polarity: 1000,
                hold: 0
            }
        );
    }
}
