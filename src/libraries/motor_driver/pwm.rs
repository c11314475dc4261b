//! PWM DRV8833 driver
//!
//! Each bridge input is bound to a PWM sub-channel. A run command puts the duty cycle
//! on one line and holds the other line according to the decay mode (see
//! [`duty`](super::duty)). Timed pulses bracket a run with wake/sleep.
//!
//! ## Pulse sequence
//!
//! 1. Write both compare values (gate untouched)
//! 2. Wake
//! 3. Block for the requested duration
//! 4. Sleep, even if the wait failed
//! 5. Fast decay only: zero the modulated line
//!
//! A pulse cannot be cancelled and the driver has no locking; overlapping pulses on
//! one driver are the caller's problem.

use core::sync::atomic::{AtomicU32, Ordering};

use super::{
    BridgeChannel, ChannelValues, DecayMode, DriveCommand, Line, LogWarnings, MotorError,
    Polarity, PwmDriverConfig, SleepGate, WarningSink, duty, warning::DriverWarning,
};
use crate::platform::{ChannelId, GpioInterface, PinId, PwmInterface, TimerInterface};

/// Counter for sampling run logs (every 100th call)
static RUN_LOG_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Dispatch to the bridge selected by a [`BridgeChannel`]
///
/// The bridges have distinct types, so each arm is monomorphized separately.
macro_rules! on_bridge {
    ($self:ident, $channel:expr, $bridge:ident => $body:expr) => {
        match $channel {
            BridgeChannel::A => {
                let $bridge = &mut $self.bridge_a;
                $body
            }
            BridgeChannel::B => {
                let $bridge = &mut $self.bridge_b;
                $body
            }
        }
    };
}

/// What a bridge was last told to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum BridgeState {
    /// Both lines at zero
    Coast,
    /// Both lines at full scale
    Brake,
    /// Running a duty-cycle command
    Driving(DriveCommand),
}

/// One bridge driven by a PWM peripheral
///
/// Holds the peripheral, the two input pins and the sub-channels they are bound to.
/// Sub-channels are resolved by [`Drv8833Pwm::configure`].
pub struct PwmBridge<P: PwmInterface> {
    pwm: P,
    pins: [PinId; 2],
    channels: [ChannelId; 2],
    state: BridgeState,
}

impl<P: PwmInterface> PwmBridge<P> {
    /// Create a bridge from its peripheral and the xIN1/xIN2 pins routed to it
    pub fn new(pwm: P, line1: PinId, line2: PinId) -> Self {
        Self {
            pwm,
            pins: [line1, line2],
            channels: [ChannelId::default(); 2],
            state: BridgeState::Coast,
        }
    }

    /// The PWM peripheral
    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    /// Sub-channel bound to `line`
    pub fn channel(&self, line: Line) -> ChannelId {
        self.channels[Self::index(line)]
    }

    /// Current drive state
    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Command the bridge is driving, `None` when braked or coasting
    pub fn last_command(&self) -> Option<DriveCommand> {
        match self.state {
            BridgeState::Driving(command) => Some(command),
            BridgeState::Brake | BridgeState::Coast => None,
        }
    }

    /// Release the peripheral
    pub fn free(self) -> P {
        self.pwm
    }

    fn index(line: Line) -> usize {
        match line {
            Line::One => 0,
            Line::Two => 1,
        }
    }

    fn configure<W: WarningSink>(
        &mut self,
        bridge: BridgeChannel,
        config: &PwmDriverConfig,
        warnings: &mut W,
    ) {
        if let Err(error) = self.pwm.configure(config.pwm_config()) {
            warnings.warn(DriverWarning::Configure { bridge, error });
        }

        for (channel, &pin) in self.channels.iter_mut().zip(self.pins.iter()) {
            *channel = match self.pwm.channel(pin) {
                Ok(bound) => bound,
                Err(error) => {
                    warnings.warn(DriverWarning::Bind { bridge, pin, error });
                    ChannelId::default()
                }
            };
        }
    }

    fn set_period<W: WarningSink>(
        &mut self,
        bridge: BridgeChannel,
        period_ns: u64,
        warnings: &mut W,
    ) {
        if let Err(error) = self.pwm.set_period(period_ns) {
            warnings.warn(DriverWarning::Period { bridge, error });
        }
    }

    fn set_inverting<W: WarningSink>(
        &mut self,
        bridge: BridgeChannel,
        channel: ChannelId,
        inverting: bool,
        warnings: &mut W,
    ) {
        if let Err(error) = self.pwm.set_inverting(channel, inverting) {
            warnings.warn(DriverWarning::Inverting {
                bridge,
                channel,
                error,
            });
        }
    }

    /// Write the compare values for `command`
    fn apply<W: WarningSink>(
        &mut self,
        bridge: BridgeChannel,
        command: DriveCommand,
        invert_slow_decay: bool,
        warnings: &mut W,
    ) -> Result<ChannelValues, MotorError> {
        let values = duty::channel_values(self.pwm.top(), &command);
        let polarity = self.channel(command.polarity.line());
        let hold = self.channel(command.polarity.reversed().line());

        if invert_slow_decay {
            let inverting = command.decay == DecayMode::Slow;
            self.set_inverting(bridge, polarity, inverting, warnings);
            self.set_inverting(bridge, hold, false, warnings);
        }

        self.pwm
            .set(polarity, values.polarity)
            .map_err(MotorError::Pwm)?;
        self.pwm.set(hold, values.hold).map_err(MotorError::Pwm)?;
        self.state = BridgeState::Driving(command);
        Ok(values)
    }

    /// Write the same value to both lines, with inversion cleared
    fn set_both<W: WarningSink>(
        &mut self,
        bridge: BridgeChannel,
        full_scale: bool,
        invert_slow_decay: bool,
        warnings: &mut W,
    ) -> Result<(), MotorError> {
        let value = if full_scale { self.pwm.top() } else { 0 };
        for line in [Line::One, Line::Two] {
            let channel = self.channel(line);
            if invert_slow_decay {
                self.set_inverting(bridge, channel, false, warnings);
            }
            self.pwm.set(channel, value).map_err(MotorError::Pwm)?;
        }
        self.state = if full_scale {
            BridgeState::Brake
        } else {
            BridgeState::Coast
        };
        Ok(())
    }

    /// Zero the modulated line after a fast-decay pulse, leaving the bridge coasting
    fn zero_line(&mut self, line: Line) -> Result<(), MotorError> {
        self.pwm.set(self.channel(line), 0).map_err(MotorError::Pwm)?;
        self.state = BridgeState::Coast;
        Ok(())
    }

    /// Rewrite the current state against the peripheral's present full scale
    fn redrive<W: WarningSink>(
        &mut self,
        bridge: BridgeChannel,
        invert_slow_decay: bool,
        warnings: &mut W,
    ) -> Result<(), MotorError> {
        match self.state {
            BridgeState::Driving(command) => self
                .apply(bridge, command, invert_slow_decay, warnings)
                .map(|_| ()),
            BridgeState::Brake => self.set_both(bridge, true, invert_slow_decay, warnings),
            BridgeState::Coast => Ok(()),
        }
    }
}

/// DRV8833 driver with PWM inputs
///
/// # Type Parameters
///
/// * `PA`, `PB` - PWM peripherals driving bridge A and bridge B
/// * `SLP` - nSLEEP pin type
/// * `T` - blocking timer used for pulses
/// * `W` - receiver for fail-soft configuration warnings
pub struct Drv8833Pwm<PA, PB, SLP, T, W = LogWarnings>
where
    PA: PwmInterface,
    PB: PwmInterface,
    SLP: GpioInterface,
    T: TimerInterface,
    W: WarningSink,
{
    bridge_a: PwmBridge<PA>,
    bridge_b: PwmBridge<PB>,
    gate: SleepGate<SLP>,
    timer: T,
    config: PwmDriverConfig,
    warnings: W,
}

impl<PA, PB, SLP, T> Drv8833Pwm<PA, PB, SLP, T, LogWarnings>
where
    PA: PwmInterface,
    PB: PwmInterface,
    SLP: GpioInterface,
    T: TimerInterface,
{
    /// Create a driver that logs configuration warnings
    pub fn new(
        bridge_a: PwmBridge<PA>,
        bridge_b: PwmBridge<PB>,
        sleep: SLP,
        timer: T,
        config: PwmDriverConfig,
    ) -> Self {
        Self::with_warnings(bridge_a, bridge_b, sleep, timer, config, LogWarnings)
    }
}

impl<PA, PB, SLP, T, W> Drv8833Pwm<PA, PB, SLP, T, W>
where
    PA: PwmInterface,
    PB: PwmInterface,
    SLP: GpioInterface,
    T: TimerInterface,
    W: WarningSink,
{
    /// Create a driver reporting configuration warnings to `warnings`
    pub fn with_warnings(
        bridge_a: PwmBridge<PA>,
        bridge_b: PwmBridge<PB>,
        sleep: SLP,
        timer: T,
        config: PwmDriverConfig,
        warnings: W,
    ) -> Self {
        Self {
            bridge_a,
            bridge_b,
            gate: SleepGate::new(sleep),
            timer,
            config,
            warnings,
        }
    }

    /// Configure both peripherals, bind the sub-channels, coast and sleep
    ///
    /// Call once before any control operation. Peripheral and binding failures are
    /// reported as warnings and leave a zero sub-channel; write failures are returned.
    pub fn configure(&mut self) -> Result<(), MotorError> {
        let config = self.config;
        self.bridge_a
            .configure(BridgeChannel::A, &config, &mut self.warnings);
        self.bridge_b
            .configure(BridgeChannel::B, &config, &mut self.warnings);
        if let Err(error) = self.gate.configure() {
            self.warnings.warn(DriverWarning::PinMode { error });
        }
        crate::log_info!("DRV8833 configured, period {} ns", config.period_ns);
        self.stop()
    }

    /// Drive nSLEEP high
    pub fn wake(&mut self) -> Result<(), MotorError> {
        self.gate.wake()
    }

    /// Drive nSLEEP low; compare values are kept
    pub fn sleep(&mut self) -> Result<(), MotorError> {
        self.gate.sleep()
    }

    /// Whether the chip is awake
    pub fn is_awake(&self) -> bool {
        self.gate.is_awake()
    }

    /// Drive a bridge at `duty` percent and wake the chip if it sleeps
    ///
    /// `duty` above 100 is treated as 100. `polarity` selects the modulated line,
    /// `decay` the level of the other one.
    pub fn run(
        &mut self,
        channel: BridgeChannel,
        duty: u8,
        polarity: Polarity,
        decay: DecayMode,
    ) -> Result<(), MotorError> {
        let command = DriveCommand::new(duty, polarity, decay);
        let values = self.apply(channel, command)?;

        let count = RUN_LOG_COUNTER.fetch_add(1, Ordering::Relaxed);
        if count % 100 == 0 {
            crate::log_debug!("DRV8833 run {:?}: {:?} -> {:?}", channel, command, values);
        }

        if !self.gate.is_awake() {
            self.gate.wake()?;
        }
        Ok(())
    }

    /// Drive a bridge for `duration_ms`, then put the chip to sleep
    ///
    /// Blocks the caller for the whole duration. The chip is asleep when this returns,
    /// including when the wait itself failed (`MotorError::Timer`). Fast-decay pulses
    /// also zero the modulated line; slow-decay pulses leave the compare values as
    /// driven.
    pub fn pulse(
        &mut self,
        channel: BridgeChannel,
        duty: u8,
        polarity: Polarity,
        duration_ms: u32,
        decay: DecayMode,
    ) -> Result<(), MotorError> {
        let command = DriveCommand::new(duty, polarity, decay);
        self.apply(channel, command)?;

        crate::log_debug!("DRV8833 pulse {:?}: {:?} for {} ms", channel, command, duration_ms);

        self.gate.wake()?;
        let waited = self.timer.delay_ms(duration_ms);
        let slept = self.gate.sleep();

        let reset = match decay {
            DecayMode::Fast => on_bridge!(self, channel, bridge => bridge.zero_line(polarity.line())),
            DecayMode::Slow => Ok(()),
        };

        slept?;
        reset?;
        waited.map_err(|error| {
            crate::log_error!("DRV8833 pulse wait failed: {:?}", error);
            MotorError::Timer(error)
        })
    }

    /// Brake: both lines at full scale. The gate is not touched.
    pub fn brake_channel(&mut self, channel: BridgeChannel) -> Result<(), MotorError> {
        let invert = self.config.invert_slow_decay;
        on_bridge!(self, channel, bridge => bridge.set_both(channel, true, invert, &mut self.warnings))
    }

    /// Coast: both lines at zero. The gate is not touched.
    pub fn coast_channel(&mut self, channel: BridgeChannel) -> Result<(), MotorError> {
        let invert = self.config.invert_slow_decay;
        on_bridge!(self, channel, bridge => bridge.set_both(channel, false, invert, &mut self.warnings))
    }

    /// Coast both bridges and sleep
    pub fn stop(&mut self) -> Result<(), MotorError> {
        self.coast_channel(BridgeChannel::A)?;
        self.coast_channel(BridgeChannel::B)?;
        self.gate.sleep()
    }

    /// Change the PWM period of both bridges
    ///
    /// Period failures are reported as warnings. Running and braked bridges are
    /// re-driven so duty percentages and brake survive a change of full scale.
    pub fn set_period(&mut self, period_ns: u64) -> Result<(), MotorError> {
        self.config.period_ns = period_ns;
        let invert = self.config.invert_slow_decay;
        for channel in [BridgeChannel::A, BridgeChannel::B] {
            on_bridge!(self, channel, bridge => {
                bridge.set_period(channel, period_ns, &mut self.warnings);
                bridge.redrive(channel, invert, &mut self.warnings)?;
            });
        }
        Ok(())
    }

    /// Command a bridge is driving, `None` after brake, coast, stop or a fast-decay
    /// pulse
    pub fn last_command(&self, channel: BridgeChannel) -> Option<DriveCommand> {
        match channel {
            BridgeChannel::A => self.bridge_a.last_command(),
            BridgeChannel::B => self.bridge_b.last_command(),
        }
    }

    /// Drive state of a bridge
    pub fn state(&self, channel: BridgeChannel) -> BridgeState {
        match channel {
            BridgeChannel::A => self.bridge_a.state(),
            BridgeChannel::B => self.bridge_b.state(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &PwmDriverConfig {
        &self.config
    }

    /// Bridge A
    pub fn bridge_a(&self) -> &PwmBridge<PA> {
        &self.bridge_a
    }

    /// Bridge B
    pub fn bridge_b(&self) -> &PwmBridge<PB> {
        &self.bridge_b
    }

    /// nSLEEP gate
    pub fn gate(&self) -> &SleepGate<SLP> {
        &self.gate
    }

    /// Pulse timer
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Warning sink
    pub fn warnings(&self) -> &W {
        &self.warnings
    }

    /// Release the bridges, the nSLEEP pin and the timer
    pub fn release(self) -> (PwmBridge<PA>, PwmBridge<PB>, SLP, T) {
        (self.bridge_a, self.bridge_b, self.gate.free(), self.timer)
    }

    fn apply(
        &mut self,
        channel: BridgeChannel,
        command: DriveCommand,
    ) -> Result<ChannelValues, MotorError> {
        let invert = self.config.invert_slow_decay;
        on_bridge!(self, channel, bridge => bridge.apply(channel, command, invert, &mut self.warnings))
    }
}
