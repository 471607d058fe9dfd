//! GPIO Abstractions
//!
//! Type-safe GPIO pin wrappers for the flood monitor station.
//! Indicator outputs expose `embedded-hal` [`OutputPin`] so the indicator
//! driver stays hardware independent.

use core::convert::Infallible;

use embassy_stm32::gpio::{Level, Output, Pin, Speed};
use embassy_stm32::Peripheral;
use embedded_hal::digital::{ErrorType, OutputPin};

/// Indicator output state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LedState {
    /// Output is off
    #[default]
    Off,
    /// Output is on
    On,
}

impl defmt::Format for LedState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Off => defmt::write!(f, "OFF"),
            Self::On => defmt::write!(f, "ON"),
        }
    }
}

/// LED or buzzer output that remembers what it is driving
pub struct IndicatorOutput<'d> {
    pin: Output<'d>,
    name: &'static str,
    state: LedState,
}

impl<'d> IndicatorOutput<'d> {
    /// Configure `pin` as a push-pull output, initially off
    #[must_use]
    pub fn new(pin: impl Peripheral<P = impl Pin> + 'd, name: &'static str) -> Self {
        Self {
            pin: Output::new(pin, Level::Low, Speed::Low),
            name,
            state: LedState::Off,
        }
    }

    fn drive(&mut self, state: LedState) {
        match state {
            LedState::On => self.pin.set_high(),
            LedState::Off => self.pin.set_low(),
        }
        if state != self.state {
            defmt::trace!("{} {}", self.name, state);
        }
        self.state = state;
    }

    /// Turn output on
    pub fn on(&mut self) {
        self.drive(LedState::On);
    }

    /// Turn output off
    pub fn off(&mut self) {
        self.drive(LedState::Off);
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> LedState {
        self.state
    }
}

impl ErrorType for IndicatorOutput<'_> {
    type Error = Infallible;
}

impl OutputPin for IndicatorOutput<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.off();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.on();
        Ok(())
    }
}
