//! DHT22 Humidity/Temperature Driver
//!
//! Single-wire protocol on an open-drain pin:
//!
//! ```text
//! host:   ‾‾‾\____1.1ms____/‾‾‾
//! sensor:                       \__80us__/‾‾80us‾‾\ then 40 bits:
//! bit:    \__50us__/‾‾26us‾‾   -> 0
//!         \__50us__/‾‾‾‾70us‾‾‾‾ -> 1
//! ```
//!
//! The sensor needs 2 s between conversions; reads inside that window return
//! the previous result.

use core::fmt;

use embassy_stm32::gpio::{Flex, Pin, Speed};
use embassy_stm32::Peripheral;
use embassy_time::{block_for, Duration, Instant};

use crate::config::{
    DHT22_EDGE_TIMEOUT_US, DHT22_MIN_INTERVAL_MS, DHT22_ONE_THRESHOLD_US, DHT22_START_LOW_US,
};
use crate::hal::timer::spin_until;
use crate::sensors::{ClimateSensor, Dht22Frame, FrameError};
use crate::types::ClimateSample;

/// DHT22 read failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dht22Error {
    /// Sensor did not answer the start signal
    NoResponse,
    /// A bit edge did not arrive in time
    Timeout {
        /// Index of the bit being read
        bit: u8,
    },
    /// Frame received but invalid
    Frame(FrameError),
}

impl fmt::Display for Dht22Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => f.write_str("no response"),
            Self::Timeout { bit } => write!(f, "timeout at bit {bit}"),
            Self::Frame(e) => write!(f, "bad frame: {e}"),
        }
    }
}

impl defmt::Format for Dht22Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::NoResponse => defmt::write!(f, "NoResponse"),
            Self::Timeout { bit } => defmt::write!(f, "Timeout(bit {})", bit),
            Self::Frame(e) => defmt::write!(f, "Frame({})", e),
        }
    }
}

/// DHT22 sensor on one open-drain line
pub struct Dht22<'d> {
    pin: Flex<'d>,
    last: Option<(Instant, Result<ClimateSample, Dht22Error>)>,
}

impl<'d> Dht22<'d> {
    /// Create the driver; the line is released (high) until the first read
    #[must_use]
    pub fn new(pin: impl Peripheral<P = impl Pin> + 'd) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_high();
        pin.set_as_input_output(Speed::Low);
        Self { pin, last: None }
    }

    fn wait_level(&self, high: bool, bit: u8) -> Result<u64, Dht22Error> {
        let pin = &self.pin;
        spin_until(|| pin.is_high() == high, DHT22_EDGE_TIMEOUT_US)
            .map(|d| d.as_micros())
            .ok_or(Dht22Error::Timeout { bit })
    }

    /// Run one conversion and return the raw frame
    pub fn read_frame(&mut self) -> Result<Dht22Frame, Dht22Error> {
        self.pin.set_low();
        block_for(Duration::from_micros(u64::from(DHT22_START_LOW_US)));
        self.pin.set_high();

        critical_section::with(|_| {
            // Response: sensor pulls low, then high, then low again for bit 0
            self.wait_level(false, 0).map_err(|_| Dht22Error::NoResponse)?;
            self.wait_level(true, 0).map_err(|_| Dht22Error::NoResponse)?;
            self.wait_level(false, 0).map_err(|_| Dht22Error::NoResponse)?;

            let mut bytes = [0u8; 5];
            for bit in 0..40u8 {
                self.wait_level(true, bit)?;
                let high_us = self.wait_level(false, bit)?;
                let byte = &mut bytes[usize::from(bit / 8)];
                *byte = (*byte << 1) | u8::from(high_us > DHT22_ONE_THRESHOLD_US);
            }
            Ok(Dht22Frame::new(bytes))
        })
    }

    /// Read and decode, without the 2 s cache
    pub fn measure(&mut self) -> Result<ClimateSample, Dht22Error> {
        self.read_frame()?.decode().map_err(Dht22Error::Frame)
    }
}

impl ClimateSensor for Dht22<'_> {
    type Error = Dht22Error;

    fn read_climate(&mut self) -> Result<ClimateSample, Self::Error> {
        let now = Instant::now();
        if let Some((at, result)) = self.last {
            if now - at < Duration::from_millis(DHT22_MIN_INTERVAL_MS) {
                return result;
            }
        }

        let result = self.measure();
        if let Err(e) = result {
            defmt::warn!("dht22: {}", e);
        }
        self.last = Some((now, result));
        result
    }
}
