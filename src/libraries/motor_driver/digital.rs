//! Digital (non-PWM) DRV8833 driver
//!
//! Each bridge input is a plain GPIO output. Only the static rows of the truth
//! table are available:
//!
//! | xIN1 | xIN2 | Function           |
//! |------|------|--------------------|
//! | 0    | 0    | Coast (High-Z)     |
//! | 1    | 0    | Forward            |
//! | 0    | 1    | Reverse            |
//! | 1    | 1    | Brake (slow decay) |
//!
//! Forward/reverse are left to the caller through raw line access.

use super::{
    BridgeChannel, Line, LogWarnings, MotorError, SleepGate, WarningSink, warning::DriverWarning,
};
use crate::platform::{GpioInterface, GpioMode};

/// The two input lines of one bridge
pub struct DigitalBridge<L1, L2>
where
    L1: GpioInterface,
    L2: GpioInterface,
{
    line1: L1,
    line2: L2,
}

impl<L1, L2> DigitalBridge<L1, L2>
where
    L1: GpioInterface,
    L2: GpioInterface,
{
    /// Create a bridge from its xIN1 and xIN2 pins
    pub fn new(line1: L1, line2: L2) -> Self {
        Self { line1, line2 }
    }

    /// Release the pins
    pub fn free(self) -> (L1, L2) {
        (self.line1, self.line2)
    }

    fn configure<W: WarningSink>(&mut self, warnings: &mut W) {
        for result in [
            self.line1.set_mode(GpioMode::OutputPushPull),
            self.line2.set_mode(GpioMode::OutputPushPull),
        ] {
            if let Err(error) = result {
                warnings.warn(DriverWarning::PinMode { error });
            }
        }
    }

    fn set_both(&mut self, high: bool) -> Result<(), MotorError> {
        self.line1.set_level(high).map_err(MotorError::Pin)?;
        self.line2.set_level(high).map_err(MotorError::Pin)?;
        Ok(())
    }

    fn set_line(&mut self, line: Line, high: bool) -> Result<(), MotorError> {
        let written = match line {
            Line::One => self.line1.set_level(high),
            Line::Two => self.line2.set_level(high),
        };
        written.map_err(MotorError::Pin)
    }

    fn line(&self, line: Line) -> bool {
        match line {
            Line::One => self.line1.read(),
            Line::Two => self.line2.read(),
        }
    }
}

/// DRV8833 driver with digital inputs
///
/// # Type Parameters
///
/// * `A1`, `A2` - AIN1/AIN2 pin types
/// * `B1`, `B2` - BIN1/BIN2 pin types
/// * `SLP` - nSLEEP pin type
/// * `W` - receiver for fail-soft configuration warnings
pub struct Drv8833<A1, A2, B1, B2, SLP, W = LogWarnings>
where
    A1: GpioInterface,
    A2: GpioInterface,
    B1: GpioInterface,
    B2: GpioInterface,
    SLP: GpioInterface,
    W: WarningSink,
{
    bridge_a: DigitalBridge<A1, A2>,
    bridge_b: DigitalBridge<B1, B2>,
    gate: SleepGate<SLP>,
    warnings: W,
}

impl<A1, A2, B1, B2, SLP> Drv8833<A1, A2, B1, B2, SLP, LogWarnings>
where
    A1: GpioInterface,
    A2: GpioInterface,
    B1: GpioInterface,
    B2: GpioInterface,
    SLP: GpioInterface,
{
    /// Create a driver that logs configuration warnings
    pub fn new(
        bridge_a: DigitalBridge<A1, A2>,
        bridge_b: DigitalBridge<B1, B2>,
        sleep: SLP,
    ) -> Self {
        Self::with_warnings(bridge_a, bridge_b, sleep, LogWarnings)
    }
}

impl<A1, A2, B1, B2, SLP, W> Drv8833<A1, A2, B1, B2, SLP, W>
where
    A1: GpioInterface,
    A2: GpioInterface,
    B1: GpioInterface,
    B2: GpioInterface,
    SLP: GpioInterface,
    W: WarningSink,
{
    /// Create a driver reporting configuration warnings to `warnings`
    pub fn with_warnings(
        bridge_a: DigitalBridge<A1, A2>,
        bridge_b: DigitalBridge<B1, B2>,
        sleep: SLP,
        warnings: W,
    ) -> Self {
        Self {
            bridge_a,
            bridge_b,
            gate: SleepGate::new(sleep),
            warnings,
        }
    }

    /// Put every pin in output mode and force the chip asleep
    ///
    /// Call once before any control operation. Pin mode failures are reported as
    /// warnings; a failed nSLEEP write is returned.
    pub fn configure(&mut self) -> Result<(), MotorError> {
        self.bridge_a.configure(&mut self.warnings);
        self.bridge_b.configure(&mut self.warnings);
        if let Err(error) = self.gate.configure() {
            self.warnings.warn(DriverWarning::PinMode { error });
        }
        self.gate.sleep()
    }

    /// Drive nSLEEP high
    pub fn wake(&mut self) -> Result<(), MotorError> {
        self.gate.wake()
    }

    /// Drive nSLEEP low; line levels are kept
    pub fn sleep(&mut self) -> Result<(), MotorError> {
        self.gate.sleep()
    }

    /// Whether the chip is awake
    pub fn is_awake(&self) -> bool {
        self.gate.is_awake()
    }

    /// Brake: both lines high
    pub fn brake_channel(&mut self, channel: BridgeChannel) -> Result<(), MotorError> {
        match channel {
            BridgeChannel::A => self.bridge_a.set_both(true),
            BridgeChannel::B => self.bridge_b.set_both(true),
        }
    }

    /// Coast: both lines low
    pub fn coast_channel(&mut self, channel: BridgeChannel) -> Result<(), MotorError> {
        match channel {
            BridgeChannel::A => self.bridge_a.set_both(false),
            BridgeChannel::B => self.bridge_b.set_both(false),
        }
    }

    /// Drive a single input line
    pub fn set_line(
        &mut self,
        channel: BridgeChannel,
        line: Line,
        high: bool,
    ) -> Result<(), MotorError> {
        match channel {
            BridgeChannel::A => self.bridge_a.set_line(line, high),
            BridgeChannel::B => self.bridge_b.set_line(line, high),
        }
    }

    /// Read back a single input line
    pub fn line(&self, channel: BridgeChannel, line: Line) -> bool {
        match channel {
            BridgeChannel::A => self.bridge_a.line(line),
            BridgeChannel::B => self.bridge_b.line(line),
        }
    }

    /// Warning sink
    pub fn warnings(&self) -> &W {
        &self.warnings
    }

    /// Release the bridges and the nSLEEP pin
    pub fn release(self) -> (DigitalBridge<A1, A2>, DigitalBridge<B1, B2>, SLP) {
        (self.bridge_a, self.bridge_b, self.gate.free())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libraries::motor_driver::RecordingWarnings;
    use crate::platform::mock::MockGpio;

    type MockDriver = Drv8833<MockGpio, MockGpio, MockGpio, MockGpio, MockGpio, RecordingWarnings>;

    fn driver() -> MockDriver {
        Drv8833::with_warnings(
            DigitalBridge::new(MockGpio::new_input(), MockGpio::new_input()),
            DigitalBridge::new(MockGpio::new_input(), MockGpio::new_input()),
            MockGpio::new_input(),
            RecordingWarnings::new(),
        )
    }

    fn configured() -> MockDriver {
        let mut driver = driver();
        driver.configure().unwrap();
        driver
    }

    #[test]
    fn test_configure_sets_outputs_and_sleeps() {
        let driver = configured();
        assert!(!driver.is_awake());
        assert!(driver.warnings().warnings().is_empty());

        let (a, b, sleep) = driver.release();
        let (a1, a2) = a.free();
        let (b1, b2) = b.free();
        for pin in [&a1, &a2, &b1, &b2, &sleep] {
            assert_eq!(pin.mode(), GpioMode::OutputPushPull);
        }
        assert_eq!(sleep.levels().collect::<std::vec::Vec<_>>(), [false]);
    }

    #[test]
    fn test_configure_reports_pin_mode_failures() {
        let mut driver = Drv8833::with_warnings(
            DigitalBridge::new(
                MockGpio::new_input().reject_mode_changes(),
                MockGpio::new_output(),
            ),
            DigitalBridge::new(MockGpio::new_output(), MockGpio::new_output()),
            MockGpio::new_output(),
            RecordingWarnings::new(),
        );

        assert!(driver.configure().is_ok());
        assert_eq!(driver.warnings().warnings().len(), 1);
        assert!(matches!(
            driver.warnings().warnings()[0],
            DriverWarning::PinMode { .. }
        ));

        // The unconfigured line cannot be driven
        assert!(matches!(
            driver.brake_channel(BridgeChannel::A),
            Err(MotorError::Pin(_))
        ));
        assert!(driver.brake_channel(BridgeChannel::B).is_ok());
    }

    #[test]
    fn test_brake_drives_both_lines_high() {
        let mut driver = configured();
        driver.brake_channel(BridgeChannel::A).unwrap();

        assert!(driver.line(BridgeChannel::A, Line::One));
        assert!(driver.line(BridgeChannel::A, Line::Two));
        assert!(!driver.line(BridgeChannel::B, Line::One));
        assert!(!driver.line(BridgeChannel::B, Line::Two));
    }

    #[test]
    fn test_coast_drives_both_lines_low() {
        let mut driver = configured();
        driver.brake_channel(BridgeChannel::B).unwrap();
        driver.coast_channel(BridgeChannel::B).unwrap();

        assert!(!driver.line(BridgeChannel::B, Line::One));
        assert!(!driver.line(BridgeChannel::B, Line::Two));
    }

    #[test]
    fn test_raw_line_access_for_direction() {
        let mut driver = configured();

        // Forward on A: AIN1 high, AIN2 low
        driver.set_line(BridgeChannel::A, Line::One, true).unwrap();
        driver.set_line(BridgeChannel::A, Line::Two, false).unwrap();
        assert!(driver.line(BridgeChannel::A, Line::One));
        assert!(!driver.line(BridgeChannel::A, Line::Two));

        // Reverse on B
        driver.set_line(BridgeChannel::B, Line::Two, true).unwrap();
        assert!(!driver.line(BridgeChannel::B, Line::One));
        assert!(driver.line(BridgeChannel::B, Line::Two));
    }

    #[test]
    fn test_sleep_retains_line_levels() {
        let mut driver = configured();
        driver.wake().unwrap();
        driver.brake_channel(BridgeChannel::A).unwrap();

        driver.sleep().unwrap();
        assert!(!driver.is_awake());
        assert!(driver.line(BridgeChannel::A, Line::One));
        assert!(driver.line(BridgeChannel::A, Line::Two));

        driver.wake().unwrap();
        assert!(driver.is_awake());
        assert!(driver.line(BridgeChannel::A, Line::One));
    }

    #[test]
    fn test_brake_and_coast_leave_gate_alone() {
        let mut driver = configured();
        driver.brake_channel(BridgeChannel::A).unwrap();
        assert!(!driver.is_awake());

        driver.wake().unwrap();
        driver.coast_channel(BridgeChannel::A).unwrap();
        assert!(driver.is_awake());
    }

    #[test]
    fn test_wake_sleep_idempotent() {
        let mut driver = configured();
        driver.wake().unwrap();
        driver.wake().unwrap();
        assert!(driver.is_awake());

        driver.sleep().unwrap();
        driver.sleep().unwrap();
        assert!(!driver.is_awake());
    }
}
