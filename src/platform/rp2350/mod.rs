//! RP2350 platform implementation for Raspberry Pi Pico 2 W
//!
//! This module provides concrete implementations of the platform abstraction
//! traits for the RP2350 microcontroller using the `rp235x-hal` crate.
//!
//! # Feature Gate
//!
//! This module is only available when the `pico2_w` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! drv8833 = { version = "0.1", features = ["pico2_w"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use drv8833::libraries::motor_driver::{Drv8833Pwm, PwmBridge, PwmDriverConfig};
//! use drv8833::platform::rp2350::{Rp2350Gpio, Rp2350Pwm, Rp2350Timer};
//! use drv8833::platform::{GpioMode, PinId};
//! use rp235x_hal::gpio::FunctionPwm;
//!
//! // AIN1/AIN2 on GPIO18/19 (slice 1), BIN1/BIN2 on GPIO20/21 (slice 2)
//! let _ = pins.gpio18.into_function::<FunctionPwm>();
//! let _ = pins.gpio19.into_function::<FunctionPwm>();
//! let _ = pins.gpio20.into_function::<FunctionPwm>();
//! let _ = pins.gpio21.into_function::<FunctionPwm>();
//!
//! let sys_hz = clocks.system_clock.freq().to_Hz();
//! let bridge_a = PwmBridge::new(Rp2350Pwm::new(pwm_slices.pwm1, sys_hz), PinId(18), PinId(19));
//! let bridge_b = PwmBridge::new(Rp2350Pwm::new(pwm_slices.pwm2, sys_hz), PinId(20), PinId(21));
//! let nsleep = Rp2350Gpio::new(pins.gpio22.into_push_pull_output(), GpioMode::OutputPushPull);
//!
//! let mut driver = Drv8833Pwm::new(
//!     bridge_a,
//!     bridge_b,
//!     nsleep,
//!     Rp2350Timer::new(timer),
//!     PwmDriverConfig::default(),
//! );
//! driver.configure()?;
//! ```

mod gpio;
mod pwm;
mod timer;

pub use gpio::Rp2350Gpio;
pub use pwm::Rp2350Pwm;
pub use timer::Rp2350Timer;
