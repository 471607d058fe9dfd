//! Sensor Reader
//!
//! Turns raw hardware reads into a [`Reading`]. The hardware itself is
//! reached through small capability traits so the conversion rules can be
//! exercised on the host; the embedded drivers implement them.
//!
//! Invalid data is never signalled upward: a failed or NaN humidity and
//! temperature read becomes `0 / 0`, and a missing ultrasonic echo shows up
//! as a 0 cm distance.

use core::fmt;

use crate::config::{ECHO_MAX_WIDTH_US, RAIN_LEVEL_MAX, SOUND_SPEED_CM_PER_US};
use crate::types::{ClimateSample, Reading};

/// Ultrasonic range finder (trigger/echo pair)
pub trait RangeFinder {
    /// Fire one trigger pulse and return the echo pulse width in microseconds.
    ///
    /// Returns 0 when the echo line never rose, see [`Echo::duration_us`].
    fn echo_duration_us(&mut self) -> u32;
}

/// Outcome of one ultrasonic ping
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Echo {
    /// Echo line never rose
    Missing,
    /// Echo pulse of the given width (us)
    Pulse(u32),
    /// Echo line still high after [`ECHO_MAX_WIDTH_US`]
    Overrun,
}

impl Echo {
    /// Pulse width handed to the distance conversion.
    ///
    /// A missing echo is 0 (0 cm); an overrun counts as the full measuring
    /// window, which lies beyond any mounting height.
    #[must_use]
    pub const fn duration_us(self) -> u32 {
        match self {
            Self::Missing => 0,
            Self::Pulse(us) => us,
            Self::Overrun => ECHO_MAX_WIDTH_US,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Echo {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Missing => defmt::write!(f, "Missing"),
            Self::Pulse(us) => defmt::write!(f, "Pulse({}us)", us),
            Self::Overrun => defmt::write!(f, "Overrun"),
        }
    }
}

/// Analog rain proxy
pub trait RainGauge {
    /// Read the rain level on the 0-1023 scale
    fn read_level(&mut self) -> u16;
}

/// Combined humidity and temperature sensor
pub trait ClimateSensor {
    /// Error reported by a failed conversion
    type Error;

    /// Read humidity and temperature
    fn read_climate(&mut self) -> Result<ClimateSample, Self::Error>;
}

/// Anything that can produce a complete [`Reading`]
pub trait Sensors {
    /// Take one reading; never fails, invalid values are normalized
    fn read(&mut self) -> Reading;
}

/// Convert an echo round-trip time into a distance in centimeters
#[must_use]
pub fn distance_from_echo_us(duration_us: u32) -> f32 {
    duration_us as f32 * SOUND_SPEED_CM_PER_US / 2.0
}

/// Scale a 12-bit ADC sample to the 10-bit rain range
#[must_use]
pub const fn scale_adc_to_rain_level(raw: u16) -> u16 {
    let level = (raw & 0x0FFF) >> 2;
    if level > RAIN_LEVEL_MAX {
        RAIN_LEVEL_MAX
    } else {
        level
    }
}

/// Reduce a climate read to `(humidity, temperature)`.
///
/// A failed read or a NaN in either field yields `(0.0, 0.0)`.
#[must_use]
pub fn normalize_climate<E>(sample: Result<ClimateSample, E>) -> (f32, f32) {
    match sample {
        Ok(s) if s.is_valid() => (s.humidity_pct, s.temperature_c),
        _ => (0.0, 0.0),
    }
}

/// DHT22 frame decoding error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// Checksum byte does not match the payload
    Checksum {
        /// Checksum computed from the payload
        expected: u8,
        /// Checksum byte received
        received: u8,
    },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checksum { expected, received } => {
                write!(f, "checksum mismatch: expected {expected:#04x}, got {received:#04x}")
            }
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for FrameError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Checksum { expected, received } => {
                defmt::write!(f, "Checksum({=u8:#x} != {=u8:#x})", expected, received);
            }
        }
    }
}

/// Raw 40-bit DHT22 frame
///
/// Layout: humidity (u16, 0.1 %), temperature (sign bit + 15-bit magnitude,
/// 0.1 °C), checksum (low byte of the sum of the first four bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dht22Frame([u8; 5]);

impl Dht22Frame {
    /// Wrap five received bytes
    #[must_use]
    pub const fn new(bytes: [u8; 5]) -> Self {
        Self(bytes)
    }

    /// Build a frame with a correct checksum from its raw fields
    #[must_use]
    pub fn encode(humidity_tenths: u16, temperature_tenths: i16) -> Self {
        let [h_hi, h_lo] = humidity_tenths.to_be_bytes();
        let magnitude = temperature_tenths.unsigned_abs() & 0x7FFF;
        let sign = if temperature_tenths < 0 { 0x8000 } else { 0 };
        let [t_hi, t_lo] = (magnitude | sign).to_be_bytes();
        let checksum = Self::checksum_of(&[h_hi, h_lo, t_hi, t_lo]);
        Self([h_hi, h_lo, t_hi, t_lo, checksum])
    }

    /// Raw bytes
    #[must_use]
    pub const fn bytes(&self) -> [u8; 5] {
        self.0
    }

    fn checksum_of(payload: &[u8; 4]) -> u8 {
        payload.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
    }

    /// Validate the checksum and decode the sample
    pub fn decode(&self) -> Result<ClimateSample, FrameError> {
        let [h_hi, h_lo, t_hi, t_lo, received] = self.0;
        let expected = Self::checksum_of(&[h_hi, h_lo, t_hi, t_lo]);
        if expected != received {
            return Err(FrameError::Checksum { expected, received });
        }

        let humidity = f32::from(u16::from_be_bytes([h_hi, h_lo])) / 10.0;
        let magnitude = f32::from(u16::from_be_bytes([t_hi & 0x7F, t_lo])) / 10.0;
        let temperature = if t_hi & 0x80 != 0 { -magnitude } else { magnitude };

        Ok(ClimateSample::new(humidity, temperature))
    }
}

/// Reads all sensors into one [`Reading`] per call
pub struct SensorReader<R, G, C> {
    range: R,
    rain: G,
    climate: C,
}

impl<R, G, C> SensorReader<R, G, C>
where
    R: RangeFinder,
    G: RainGauge,
    C: ClimateSensor,
{
    /// Create a reader over the three sensors
    #[must_use]
    pub const fn new(range: R, rain: G, climate: C) -> Self {
        Self {
            range,
            rain,
            climate,
        }
    }

    /// Access the range finder
    pub fn range_mut(&mut self) -> &mut R {
        &mut self.range
    }

    /// Access the rain gauge
    pub fn rain_mut(&mut self) -> &mut G {
        &mut self.rain
    }

    /// Access the climate sensor
    pub fn climate_mut(&mut self) -> &mut C {
        &mut self.climate
    }

    /// Give the sensors back
    pub fn release(self) -> (R, G, C) {
        (self.range, self.rain, self.climate)
    }
}

impl<R, G, C> Sensors for SensorReader<R, G, C>
where
    R: RangeFinder,
    G: RainGauge,
    C: ClimateSensor,
{
    fn read(&mut self) -> Reading {
        let distance_cm = distance_from_echo_us(self.range.echo_duration_us());
        let rain_level = self.rain.read_level().min(RAIN_LEVEL_MAX);
        let (humidity_pct, temperature_c) = normalize_climate(self.climate.read_climate());

        Reading {
            distance_cm,
            rain_level,
            humidity_pct,
            temperature_c,
        }
    }
}
