//! RP2350 PWM implementation
//!
//! This module provides PWM support for RP2350 using the `rp235x-hal` crate.
//!
//! One [`Rp2350Pwm`] owns one PWM slice. GPIO `n` (0..=29) is routed to slice
//! `(n / 2) % 8`, channel A for even and channel B for odd pins; the pins must
//! already be switched to `FunctionPwm`.

use crate::platform::{
    Result,
    error::{PlatformError, PwmError},
    traits::{ChannelId, PinId, PwmConfig, PwmInterface},
};
use embedded_hal_1::pwm::SetDutyCycle;
use rp235x_hal::pwm::{FreeRunning, Slice, SliceId};

/// Highest GPIO with a PWM function on the QFN-60 package
const MAX_PWM_GPIO: u8 = 29;

const CHANNEL_A: ChannelId = ChannelId(0);
const CHANNEL_B: ChannelId = ChannelId(1);

/// RP2350 PWM implementation
///
/// Wraps an `rp235x-hal` PWM slice to implement the `PwmInterface` trait.
pub struct Rp2350Pwm<S: SliceId> {
    slice: Slice<S, FreeRunning>,
    sys_clock_hz: u32,
}

impl<S: SliceId> Rp2350Pwm<S> {
    /// Create a new RP2350 PWM instance
    ///
    /// # Arguments
    ///
    /// * `slice` - The HAL PWM slice
    /// * `sys_clock_hz` - System clock feeding the PWM block
    pub fn new(slice: Slice<S, FreeRunning>, sys_clock_hz: u32) -> Self {
        Self {
            slice,
            sys_clock_hz,
        }
    }

    /// Release the HAL slice
    pub fn free(self) -> Slice<S, FreeRunning> {
        self.slice
    }
}

/// Integer divider and TOP for a period
///
/// PWM period = DIV * (TOP + 1) / SYS_CLOCK. The smallest divider that fits the
/// period in 16 bits is used to keep the most resolution.
fn divider_and_top(sys_clock_hz: u32, period_ns: u64) -> Result<(u8, u16)> {
    let cycles = (sys_clock_hz as u64)
        .checked_mul(period_ns)
        .ok_or(PlatformError::Pwm(PwmError::InvalidPeriod))?
        / 1_000_000_000;
    if cycles < 2 {
        return Err(PlatformError::Pwm(PwmError::InvalidPeriod));
    }

    let divider = cycles.div_ceil(1 << 16).max(1);
    if divider > u8::MAX as u64 {
        return Err(PlatformError::Pwm(PwmError::InvalidPeriod));
    }

    let top = cycles / divider - 1;
    Ok((divider as u8, top as u16))
}

impl<S: SliceId> PwmInterface for Rp2350Pwm<S> {
    /// Set the period and enable the slice
    ///
    /// The slice is enabled even when the period is rejected, so compare writes
    /// still reach the pins at the previous divider and TOP.
    fn configure(&mut self, config: PwmConfig) -> Result<()> {
        let period = self.set_period(config.period_ns);
        self.slice.enable();
        period
    }

    fn channel(&mut self, pin: PinId) -> Result<ChannelId> {
        if pin.0 > MAX_PWM_GPIO || (pin.0 >> 1) & 0x7 != S::DYN.num {
            return Err(PlatformError::Pwm(PwmError::ChannelUnavailable));
        }
        Ok(if pin.0 & 1 == 0 { CHANNEL_A } else { CHANNEL_B })
    }

    fn top(&self) -> u32 {
        self.slice.get_top() as u32
    }

    fn set(&mut self, channel: ChannelId, value: u32) -> Result<()> {
        if value > self.top() {
            return Err(PlatformError::Pwm(PwmError::ValueOutOfRange));
        }
        let compare = value as u16;
        let written = match channel {
            CHANNEL_A => self.slice.channel_a.set_duty_cycle(compare),
            CHANNEL_B => self.slice.channel_b.set_duty_cycle(compare),
            _ => return Err(PlatformError::Pwm(PwmError::ChannelUnavailable)),
        };
        written.map_err(|_| PlatformError::Pwm(PwmError::HardwareError))
    }

    fn set_period(&mut self, period_ns: u64) -> Result<()> {
        let (divider, top) = divider_and_top(self.sys_clock_hz, period_ns)?;
        self.slice.set_div_int(divider);
        self.slice.set_div_frac(0);
        self.slice.set_top(top);
        Ok(())
    }

    fn set_inverting(&mut self, channel: ChannelId, inverting: bool) -> Result<()> {
        match (channel, inverting) {
            (CHANNEL_A, true) => self.slice.channel_a.set_inverted(),
            (CHANNEL_A, false) => self.slice.channel_a.clr_inverted(),
            (CHANNEL_B, true) => self.slice.channel_b.set_inverted(),
            (CHANNEL_B, false) => self.slice.channel_b.clr_inverted(),
            _ => return Err(PlatformError::Pwm(PwmError::ChannelUnavailable)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYS_CLOCK: u32 = 150_000_000;

    #[test]
    fn test_divider_and_top_default_period() {
        // 20 kHz at 150 MHz fits in 16 bits without dividing
        assert_eq!(divider_and_top(SYS_CLOCK, 50_000), Ok((1, 7499)));
        assert_eq!(divider_and_top(SYS_CLOCK, 100_000), Ok((1, 14999)));
    }

    #[test]
    fn test_divider_and_top_long_period_divides() {
        // 10 ms = 1_500_000 cycles -> DIV 23, TOP 65216
        let (divider, top) = divider_and_top(SYS_CLOCK, 10_000_000).unwrap();
        assert_eq!(divider, 23);
        assert_eq!(top, 65216);
    }

    #[test]
    fn test_divider_and_top_rejects_out_of_range() {
        let invalid = Err(PlatformError::Pwm(PwmError::InvalidPeriod));
        assert_eq!(divider_and_top(SYS_CLOCK, 0), invalid);
        assert_eq!(divider_and_top(SYS_CLOCK, 1_000_000_000), invalid);
        // Would overflow the cycle product
        assert_eq!(divider_and_top(SYS_CLOCK, u64::MAX / 2), invalid);
    }
}
