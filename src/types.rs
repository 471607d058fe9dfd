//! Shared types used across the flood monitor firmware
//!
//! This module defines the domain types passed between the sensor reader,
//! the classifier and the output stages of a monitoring cycle.

use core::fmt;

// F32Ext provides round for no_std; in std it is built-in
#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::Thresholds;

/// Round to `decimals` places with exact halves going away from zero.
///
/// `core::fmt` breaks ties towards the even digit; values are passed through
/// this first so `94.5` shows as `95`.
#[must_use]
pub fn round_half_away(value: f32, decimals: u32) -> f32 {
    let scale = (0..decimals).fold(1.0_f32, |s, _| s * 10.0);
    (value * scale).round() / scale
}

/// One set of sensor values, taken fresh every cycle
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Reading {
    /// Distance from the sensor to the water surface (cm)
    pub distance_cm: f32,
    /// Rain proxy level (0-1023)
    pub rain_level: u16,
    /// Relative humidity (%), 0 when the sensor read was invalid
    pub humidity_pct: f32,
    /// Air temperature (°C), 0 when the sensor read was invalid
    pub temperature_c: f32,
}

impl Reading {
    /// Create a reading from its four values
    #[must_use]
    pub const fn new(distance_cm: f32, rain_level: u16, humidity_pct: f32, temperature_c: f32) -> Self {
        Self {
            distance_cm,
            rain_level,
            humidity_pct,
            temperature_c,
        }
    }

    /// Water level above ground for a sensor mounted at `baseline_cm`
    #[must_use]
    pub fn water_level_cm(&self, baseline_cm: f32) -> f32 {
        baseline_cm - self.distance_cm
    }

    /// Qualitative rain intensity
    #[must_use]
    pub const fn rain_intensity(&self, thresholds: &Thresholds) -> RainIntensity {
        RainIntensity::from_level(self.rain_level, thresholds)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Reading {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "dist={}cm rain={} hum={}% temp={}C",
            self.distance_cm,
            self.rain_level,
            self.humidity_pct,
            self.temperature_c
        );
    }
}

/// Flood hazard level, ordered by severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum HazardState {
    /// No flood risk
    #[default]
    Safe,
    /// Rising water or heavy weather, keep watching
    Watch,
    /// Flooding imminent
    Danger,
}

impl HazardState {
    /// All states in ascending severity
    pub const ALL: [Self; 3] = [Self::Safe, Self::Watch, Self::Danger];

    /// Raise to `other` if it is more severe
    #[must_use]
    pub fn escalate(self, other: Self) -> Self {
        self.max(other)
    }

    /// Label shown on the display
    #[must_use]
    pub const fn display_label(self) -> &'static str {
        match self {
            Self::Safe => "SEGURO",
            Self::Watch => "ATENCAO",
            Self::Danger => "PERIGO!",
        }
    }

    /// Label written to the telemetry stream
    #[must_use]
    pub const fn report_label(self) -> &'static str {
        match self {
            Self::Safe => "SEGURO ✓",
            Self::Watch => "ATENÇÃO ⚠\u{fe0f}",
            Self::Danger => "PERIGO! 🚨",
        }
    }

    /// Check if the buzzer has anything to say in this state
    #[must_use]
    pub const fn is_alerting(self) -> bool {
        !matches!(self, Self::Safe)
    }
}

impl fmt::Display for HazardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_label())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for HazardState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Safe => defmt::write!(f, "SAFE"),
            Self::Watch => defmt::write!(f, "WATCH"),
            Self::Danger => defmt::write!(f, "DANGER"),
        }
    }
}

/// Rain intensity derived from the rain proxy level
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RainIntensity {
    /// No rain or light rain
    Light,
    /// Moderate rain
    Moderate,
    /// Heavy rain
    Heavy,
}

impl RainIntensity {
    /// Classify a rain proxy level
    #[must_use]
    pub const fn from_level(level: u16, thresholds: &Thresholds) -> Self {
        if level >= thresholds.heavy_rain {
            Self::Heavy
        } else if level >= thresholds.moderate_rain {
            Self::Moderate
        } else {
            Self::Light
        }
    }

    /// Short label for the display
    #[must_use]
    pub const fn display_label(self) -> &'static str {
        match self {
            Self::Light => "FRACA",
            Self::Moderate => "MOD",
            Self::Heavy => "FORTE",
        }
    }

    /// Long label for the telemetry stream
    #[must_use]
    pub const fn report_label(self) -> &'static str {
        match self {
            Self::Light => "Sem chuva/Chuva fraca",
            Self::Moderate => "Chuva Moderada",
            Self::Heavy => "Chuva Forte",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RainIntensity {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.display_label());
    }
}

/// Raw humidity/temperature pair as delivered by the climate sensor
///
/// Either value may be NaN when the sensor could not produce it.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ClimateSample {
    /// Relative humidity (%)
    pub humidity_pct: f32,
    /// Air temperature (°C)
    pub temperature_c: f32,
}

impl ClimateSample {
    /// Sample used when the sensor failed
    pub const INVALID: Self = Self {
        humidity_pct: f32::NAN,
        temperature_c: f32::NAN,
    };

    /// Create a sample
    #[must_use]
    pub const fn new(humidity_pct: f32, temperature_c: f32) -> Self {
        Self {
            humidity_pct,
            temperature_c,
        }
    }

    /// Check that both values are numbers
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.humidity_pct.is_nan() && !self.temperature_c.is_nan()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ClimateSample {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}% {}C", self.humidity_pct, self.temperature_c);
    }
}
