//! HC-SR04 Ultrasonic Driver
//!
//! Measures the round-trip time of an ultrasonic ping. A 10 us trigger pulse
//! starts a measurement; the echo line then stays high for as long as the
//! sound took to come back. With nothing in range the module still raises the
//! echo line and drops it after about 38 ms.

use embassy_stm32::gpio::{Input, Level, Output, Pin, Pull, Speed};
use embassy_stm32::Peripheral;
use embassy_time::{block_for, Duration};

use crate::config::{ECHO_MAX_WIDTH_US, ECHO_TIMEOUT_US, TRIGGER_PULSE_US, TRIGGER_SETTLE_US};
use crate::hal::timer::spin_until;
use crate::sensors::{Echo, RangeFinder};

/// HC-SR04 trigger/echo pair
pub struct Hcsr04<'d> {
    trig: Output<'d>,
    echo: Input<'d>,
}

impl<'d> Hcsr04<'d> {
    /// Create the driver; trigger starts low
    #[must_use]
    pub fn new(
        trig: impl Peripheral<P = impl Pin> + 'd,
        echo: impl Peripheral<P = impl Pin> + 'd,
    ) -> Self {
        Self {
            trig: Output::new(trig, Level::Low, Speed::Low),
            echo: Input::new(echo, Pull::Down),
        }
    }

    fn trigger(&mut self) {
        self.trig.set_low();
        block_for(Duration::from_micros(u64::from(TRIGGER_SETTLE_US)));
        self.trig.set_high();
        block_for(Duration::from_micros(u64::from(TRIGGER_PULSE_US)));
        self.trig.set_low();
    }

    /// Ping once and time the echo pulse
    pub fn ping(&mut self) -> Echo {
        self.trigger();

        let echo = &self.echo;
        if spin_until(|| echo.is_high(), ECHO_TIMEOUT_US).is_none() {
            return Echo::Missing;
        }
        match spin_until(|| echo.is_low(), u64::from(ECHO_MAX_WIDTH_US)) {
            Some(width) => Echo::Pulse(u32::try_from(width.as_micros()).unwrap_or(u32::MAX)),
            None => Echo::Overrun,
        }
    }
}

impl RangeFinder for Hcsr04<'_> {
    fn echo_duration_us(&mut self) -> u32 {
        let echo = self.ping();
        match echo {
            Echo::Missing => defmt::debug!("hc-sr04: no echo within {}us", ECHO_TIMEOUT_US),
            Echo::Overrun => defmt::debug!("hc-sr04: echo longer than {}us", ECHO_MAX_WIDTH_US),
            Echo::Pulse(_) => {}
        }
        echo.duration_us()
    }
}
