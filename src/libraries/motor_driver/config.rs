//! PWM driver configuration

use crate::platform::PwmConfig;

/// Configuration for [`Drv8833Pwm`](super::Drv8833Pwm)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmDriverConfig {
    /// PWM period in nanoseconds, applied to both bridges
    pub period_ns: u64,
    /// Invert the modulated line in slow decay so the driven fraction equals the duty
    ///
    /// Requires [`PwmInterface::set_inverting`](crate::platform::PwmInterface::set_inverting).
    pub invert_slow_decay: bool,
}

impl PwmDriverConfig {
    /// Peripheral configuration derived from this driver configuration
    pub fn pwm_config(&self) -> PwmConfig {
        PwmConfig {
            period_ns: self.period_ns,
        }
    }
}

impl Default for PwmDriverConfig {
    fn default() -> Self {
        Self {
            period_ns: PwmConfig::default().period_ns,
            invert_slow_decay: false,
        }
    }
}
