//! Platform abstraction layer
//!
//! This module provides the hardware capabilities the DRV8833 drivers consume.
//! All platform-specific code is isolated to this module.

pub mod error;
pub mod traits;

// Platform implementations (feature-gated)
#[cfg(feature = "pico2_w")]
pub mod rp2350;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{
    ChannelId, GpioInterface, GpioMode, PinId, PwmConfig, PwmInterface, TimerInterface,
};
