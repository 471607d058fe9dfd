//! Flood Monitor Firmware Library
//!
//! This library provides the core functionality for an STM32G474-based flood
//! warning station. The station measures the distance to the water surface
//! with an ultrasonic sensor, reads a rain proxy potentiometer and a
//! humidity/temperature sensor, and warns through LEDs, a buzzer, a text
//! display and a serial status stream.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │       Monitor cycle (read → classify → actuate → report)     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                       CORE LOGIC                             │
//! │  Sensor Reader │ Hazard Classifier │ Indicators │ UI │ Telemetry │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  GPIO  │  ADC  │  HC-SR04  │  DHT22  │  SSD1306  │  USB CDC  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Functional core, imperative shell**: classification and formatting are
//!   pure; hardware is reached through small capability traits
//! - **Explicit state**: everything that outlives a cycle lives in [`monitor::Monitor`]
//! - **Degrade, don't stop**: invalid sensor data is normalized and failing
//!   outputs are reported, never fatal
//! - **No unsafe in application code**

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;
#[cfg(feature = "embedded")]
pub use embassy_usb;

/// Hardware Abstraction Layer
///
/// Safe wrappers over STM32G474 peripherals used by the station.
#[cfg(feature = "embedded")]
pub mod hal;

/// Peripheral Drivers
///
/// Drivers for the external sensors and the display.
#[cfg(feature = "embedded")]
pub mod drivers;

/// USB Subsystem
///
/// CDC ACM port carrying the telemetry stream.
#[cfg(feature = "embedded")]
pub mod usb;

/// Sensor Reader
///
/// Capability traits and conversion of raw reads into a reading.
pub mod sensors;

/// Hazard Classifier
///
/// Threshold rules and the optional hazard hold.
pub mod hazard;

/// Indicator Driver
///
/// Mode LEDs and buzzer cadence.
pub mod alert;

/// Display Presenter
///
/// Two-line text frame for the character display.
pub mod ui;

/// Telemetry Reporter
///
/// Human-readable status block for the serial stream.
pub mod telemetry;

/// Monitoring cycle and cross-cycle state
pub mod monitor;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::digital::OutputPin;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
