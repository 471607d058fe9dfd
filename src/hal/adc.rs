//! ADC Driver
//!
//! Blocking reads of the rain proxy potentiometer.
//! The STM32G4 converts with 12 bits; the station works on a 10-bit scale.

use embassy_stm32::adc::{Adc, AdcChannel, AnyAdcChannel, SampleTime};
use embassy_stm32::peripherals::ADC1;

use crate::sensors::{scale_adc_to_rain_level, RainGauge};

/// ADC reading result
#[derive(Clone, Copy, Debug)]
pub struct AdcReading {
    /// Raw 12-bit ADC value (0-4095)
    raw: u16,
}

impl AdcReading {
    /// Create a new ADC reading from raw value
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    /// Get the raw 12-bit value
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Convert to voltage (assuming 3.3V reference)
    #[must_use]
    pub fn as_voltage(self) -> f32 {
        (f32::from(self.raw) / 4095.0) * 3.3
    }

    /// Convert to the 0-1023 rain scale
    #[must_use]
    pub const fn as_rain_level(self) -> u16 {
        scale_adc_to_rain_level(self.raw)
    }
}

impl defmt::Format for AdcReading {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ADC({})", self.raw);
    }
}

/// Rain potentiometer on ADC1
pub struct RainAdc<'d> {
    adc: Adc<'d, ADC1>,
    channel: AnyAdcChannel<ADC1>,
}

impl<'d> RainAdc<'d> {
    /// Create the rain ADC on the given ADC1 channel
    #[must_use]
    pub fn new(adc: ADC1, channel: impl AdcChannel<ADC1>) -> Self {
        let mut adc = Adc::new(adc);
        // Potentiometer source impedance is high, sample slowly
        adc.set_sample_time(SampleTime::CYCLES247_5);
        Self {
            adc,
            channel: channel.degrade_adc(),
        }
    }

    /// Read a single sample
    pub fn read(&mut self) -> AdcReading {
        AdcReading::from_raw(self.adc.blocking_read(&mut self.channel))
    }
}

impl RainGauge for RainAdc<'_> {
    fn read_level(&mut self) -> u16 {
        let reading = self.read();
        defmt::trace!("rain {} ({}V)", reading, reading.as_voltage());
        reading.as_rain_level()
    }
}
