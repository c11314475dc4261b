//! Core infrastructure
//!
//! Shared infrastructure used across the crate. Currently only logging.

pub mod logging;
