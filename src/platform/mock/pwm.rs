//! Mock PWM implementation for testing

use heapless::Vec;

use super::{HISTORY_DEPTH, next_sequence};
use crate::platform::{
    Result,
    error::{PlatformError, PwmError},
    traits::{ChannelId, PinId, PwmConfig, PwmInterface},
};

/// Number of sub-channels a mock peripheral exposes
const CHANNELS: usize = 4;

/// A recorded compare-value write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmWrite {
    /// Crate-wide event stamp
    pub seq: u32,
    /// Sub-channel written
    pub channel: ChannelId,
    /// Compare value written
    pub value: u32,
}

/// Mock PWM implementation
///
/// Routes the pins it was created with to sub-channels `0..n` in order and tracks
/// compare values, inversion, period and every write for test verification.
#[derive(Debug)]
pub struct MockPwm {
    top: u32,
    pins: Vec<PinId, CHANNELS>,
    values: [u32; CHANNELS],
    inverted: [bool; CHANNELS],
    period_ns: Option<u64>,
    history: Vec<PwmWrite, HISTORY_DEPTH>,
    fail_configure: bool,
    supports_inverting: bool,
    ns_per_count: Option<u64>,
}

impl MockPwm {
    /// Create a new mock PWM with full-scale value `top` routing `pins`
    ///
    /// Pins beyond the fourth are not routed.
    pub fn new(top: u32, pins: &[PinId]) -> Self {
        let mut routed = Vec::new();
        for &pin in pins.iter().take(CHANNELS) {
            let _ = routed.push(pin);
        }
        Self {
            top,
            pins: routed,
            values: [0; CHANNELS],
            inverted: [false; CHANNELS],
            period_ns: None,
            history: Vec::new(),
            fail_configure: false,
            supports_inverting: true,
            ns_per_count: None,
        }
    }

    /// Make `configure` and `set_period` fail
    pub fn fail_configure(mut self) -> Self {
        self.fail_configure = true;
        self
    }

    /// Derive the full-scale value from the period, one count per `ns_per_count`
    ///
    /// Mimics hardware where a longer period raises TOP.
    pub fn top_follows_period(mut self, ns_per_count: u64) -> Self {
        self.ns_per_count = Some(ns_per_count.max(1));
        self
    }

    /// Drop polarity inversion support (falls back to the trait default)
    pub fn without_inverting(mut self) -> Self {
        self.supports_inverting = false;
        self
    }

    /// Current compare value of a sub-channel
    pub fn value(&self, channel: ChannelId) -> u32 {
        self.values[channel.0 as usize % CHANNELS]
    }

    /// Current compare value of the sub-channel a pin is routed to
    pub fn value_of(&self, pin: PinId) -> Option<u32> {
        self.position(pin).map(|index| self.values[index])
    }

    /// Whether a sub-channel is inverted
    pub fn is_inverted(&self, channel: ChannelId) -> bool {
        self.inverted[channel.0 as usize % CHANNELS]
    }

    /// Period set by `configure` or `set_period`, if any
    pub fn period_ns(&self) -> Option<u64> {
        self.period_ns
    }

    /// All writes in the order they happened
    pub fn history(&self) -> &[PwmWrite] {
        &self.history
    }

    /// Forget recorded writes
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn position(&self, pin: PinId) -> Option<usize> {
        self.pins.iter().position(|&routed| routed == pin)
    }

    fn apply_period(&mut self, period_ns: u64) -> Result<()> {
        if self.fail_configure || period_ns == 0 {
            return Err(PlatformError::Pwm(PwmError::InvalidPeriod));
        }
        self.period_ns = Some(period_ns);
        if let Some(ns_per_count) = self.ns_per_count {
            self.top = (period_ns / ns_per_count).min(u32::MAX as u64) as u32;
        }
        Ok(())
    }
}

impl PwmInterface for MockPwm {
    fn configure(&mut self, config: PwmConfig) -> Result<()> {
        self.apply_period(config.period_ns)
    }

    fn channel(&mut self, pin: PinId) -> Result<ChannelId> {
        self.position(pin)
            .map(|index| ChannelId(index as u8))
            .ok_or(PlatformError::Pwm(PwmError::ChannelUnavailable))
    }

    fn top(&self) -> u32 {
        self.top
    }

    fn set(&mut self, channel: ChannelId, value: u32) -> Result<()> {
        let index = channel.0 as usize;
        if index >= CHANNELS {
            return Err(PlatformError::Pwm(PwmError::ChannelUnavailable));
        }
        if value > self.top {
            return Err(PlatformError::Pwm(PwmError::ValueOutOfRange));
        }
        self.values[index] = value;
        let _ = self.history.push(PwmWrite {
            seq: next_sequence(),
            channel,
            value,
        });
        Ok(())
    }

    fn set_period(&mut self, period_ns: u64) -> Result<()> {
        self.apply_period(period_ns)
    }

    fn set_inverting(&mut self, channel: ChannelId, inverting: bool) -> Result<()> {
        if !self.supports_inverting {
            return Err(PlatformError::Pwm(PwmError::InversionUnsupported));
        }
        let index = channel.0 as usize;
        if index >= CHANNELS {
            return Err(PlatformError::Pwm(PwmError::ChannelUnavailable));
        }
        self.inverted[index] = inverting;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_pwm_routes_pins_in_order() {
        let mut pwm = MockPwm::new(1000, &[PinId(12), PinId(13)]);
        assert_eq!(pwm.channel(PinId(12)), Ok(ChannelId(0)));
        assert_eq!(pwm.channel(PinId(13)), Ok(ChannelId(1)));
        assert_eq!(
            pwm.channel(PinId(14)),
            Err(PlatformError::Pwm(PwmError::ChannelUnavailable))
        );
    }

    #[test]
    fn test_mock_pwm_set_value() {
        let mut pwm = MockPwm::new(1000, &[PinId(0), PinId(1)]);
        pwm.set(ChannelId(1), 600).unwrap();
        assert_eq!(pwm.value(ChannelId(1)), 600);
        assert_eq!(pwm.value_of(PinId(1)), Some(600));

        // Full scale is inclusive, anything above is rejected
        assert!(pwm.set(ChannelId(0), 1000).is_ok());
        assert_eq!(
            pwm.set(ChannelId(0), 1001),
            Err(PlatformError::Pwm(PwmError::ValueOutOfRange))
        );
        assert_eq!(pwm.value(ChannelId(0)), 1000);
        assert_eq!(pwm.history().len(), 2);
    }

    #[test]
    fn test_mock_pwm_period() {
        let mut pwm = MockPwm::new(1000, &[]);
        assert_eq!(pwm.period_ns(), None);

        pwm.configure(PwmConfig::default()).unwrap();
        assert_eq!(pwm.period_ns(), Some(50_000));

        assert!(pwm.set_period(0).is_err());
        assert_eq!(pwm.period_ns(), Some(50_000));

        let mut pwm = MockPwm::new(1000, &[]).fail_configure();
        assert!(pwm.configure(PwmConfig::default()).is_err());
    }

    #[test]
    fn test_mock_pwm_top_follows_period() {
        let mut pwm = MockPwm::new(1000, &[]).top_follows_period(50);
        assert_eq!(pwm.top(), 1000);

        pwm.set_period(100_000).unwrap();
        assert_eq!(pwm.top(), 2000);

        // A rejected period leaves TOP alone
        assert!(pwm.set_period(0).is_err());
        assert_eq!(pwm.top(), 2000);

        // Fixed TOP by default
        let mut pwm = MockPwm::new(1000, &[]);
        pwm.set_period(100_000).unwrap();
        assert_eq!(pwm.top(), 1000);
    }

    #[test]
    fn test_mock_pwm_inverting() {
        let mut pwm = MockPwm::new(1000, &[PinId(0)]);
        pwm.set_inverting(ChannelId(0), true).unwrap();
        assert!(pwm.is_inverted(ChannelId(0)));

        let mut pwm = MockPwm::new(1000, &[PinId(0)]).without_inverting();
        assert_eq!(
            pwm.set_inverting(ChannelId(0), true),
            Err(PlatformError::Pwm(PwmError::InversionUnsupported))
        );
        assert!(!pwm.is_inverted(ChannelId(0)));
    }
}
