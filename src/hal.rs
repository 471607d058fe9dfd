//! Hardware Abstraction Layer
//!
//! Provides safe abstractions over the STM32G474 peripherals used by the
//! station. This module isolates hardware-specific code and implements the
//! capability traits consumed by the monitoring core.

pub mod adc;
pub mod gpio;
pub mod timer;
