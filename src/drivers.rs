//! Peripheral Drivers
//!
//! Drivers for the external sensors and the display.
//! Each one implements the capability trait the monitoring core consumes.

pub mod dht22;
pub mod display;
pub mod hcsr04;
