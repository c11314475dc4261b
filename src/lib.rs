#![cfg_attr(not(test), no_std)]

//! drv8833 - Driver for the TI DRV8833 dual H-bridge motor/solenoid driver
//!
//! This library provides the platform abstraction the driver is written against,
//! the DRV8833 control logic (digital and PWM variants), and the logging macros
//! shared by both.

// Platform abstraction layer (GPIO, PWM, timer traits plus adapters)
pub mod platform;

// Logging infrastructure
pub mod core;

// DRV8833 drivers built on the platform abstraction
pub mod libraries;
