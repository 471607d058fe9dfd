//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the flood monitor station.
//! Thresholds, timing, pin mappings and peripheral parameters are centralized here.

/// Distance from the ultrasonic sensor to the ground, in centimeters.
///
/// Water level is derived as this baseline minus the measured distance.
pub const BASELINE_HEIGHT_CM: f32 = 200.0;

/// Sensor-to-surface distance at or below which the station is on watch (cm)
pub const WATCH_DISTANCE_CM: f32 = 150.0;

/// Sensor-to-surface distance at or below which the station is in danger (cm)
pub const DANGER_DISTANCE_CM: f32 = 100.0;

/// Rain proxy level for moderate rain (0-1023 scale)
pub const MODERATE_RAIN_LEVEL: u16 = 400;

/// Rain proxy level for heavy rain (0-1023 scale)
pub const HEAVY_RAIN_LEVEL: u16 = 700;

/// Relative humidity that puts the station on watch by itself (%)
pub const WATCH_HUMIDITY_PCT: f32 = 90.0;

/// Relative humidity required by the compound danger rule (%)
pub const COMPOUND_HUMIDITY_PCT: f32 = 85.0;

/// Full scale of the rain proxy input (10-bit)
pub const RAIN_LEVEL_MAX: u16 = 1023;

/// Speed of sound in cm per microsecond
pub const SOUND_SPEED_CM_PER_US: f32 = 0.034;

/// Minimum time between buzzer pulses while on watch (ms)
pub const WATCH_ALERT_INTERVAL_MS: u64 = 2000;

/// Minimum time between buzzer pulses while in danger (ms)
pub const DANGER_ALERT_INTERVAL_MS: u64 = WATCH_ALERT_INTERVAL_MS / 4;

/// Buzzer pulse length while on watch (ms)
pub const WATCH_PULSE_MS: u32 = 200;

/// Buzzer pulse length while in danger (ms)
pub const DANGER_PULSE_MS: u32 = 100;

/// Delay between monitoring cycles (ms)
pub const CYCLE_INTERVAL_MS: u64 = 1000;

/// How long the boot splash stays on the display (ms)
pub const SPLASH_DURATION_MS: u64 = 2000;

/// Number of cycles a raised hazard state is held by default.
///
/// `1` keeps the raw per-cycle classification.
pub const DEFAULT_HOLD_CYCLES: usize = 1;

/// Capacity of the hazard history used for hold/debounce
pub const HAZARD_HISTORY_LEN: usize = 8;

/// HC-SR04 trigger low settle time (us)
pub const TRIGGER_SETTLE_US: u32 = 2;

/// HC-SR04 trigger pulse width (us)
pub const TRIGGER_PULSE_US: u32 = 10;

/// Longest wait for the echo line to rise after a trigger (us).
///
/// Past this the ping is reported as no echo.
pub const ECHO_TIMEOUT_US: u64 = 30_000;

/// Longest echo pulse measured (us).
///
/// The HC-SR04 holds the echo line for about 38 ms when nothing is in range;
/// a pulse still high at this point is reported at this width.
pub const ECHO_MAX_WIDTH_US: u32 = 40_000;

/// DHT22 minimum time between two conversions (ms)
pub const DHT22_MIN_INTERVAL_MS: u64 = 2000;

/// DHT22 host start signal length (us)
pub const DHT22_START_LOW_US: u32 = 1_100;

/// DHT22 per-edge timeout (us)
pub const DHT22_EDGE_TIMEOUT_US: u64 = 100;

/// DHT22 high time above which a bit is decoded as `1` (us)
pub const DHT22_ONE_THRESHOLD_US: u64 = 40;

/// I2C bus frequency for the display
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// SSD1306 OLED I2C address
pub const DISPLAY_I2C_ADDR: u8 = 0x3C;

/// Text columns on the display
pub const DISPLAY_COLUMNS: usize = 16;

/// Text rows on the display
pub const DISPLAY_ROWS: usize = 2;

/// USB VID (use test VID for development)
pub const USB_VID: u16 = 0x1209;

/// USB PID (get from pid.codes for production)
pub const USB_PID: u16 = 0x0002;

/// USB CDC ACM packet size
pub const USB_CDC_PACKET_SIZE: u16 = 64;

/// Longest telemetry line in bytes
pub const TELEMETRY_LINE_LEN: usize = 96;

/// Telemetry lines buffered between the monitor and the USB port
pub const TELEMETRY_QUEUE_DEPTH: usize = 24;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments for the Nucleo-G474RE wiring

    /// HC-SR04 trigger output
    pub const ULTRASONIC_TRIG: &str = "PA8";

    /// HC-SR04 echo input (5V tolerant)
    pub const ULTRASONIC_ECHO: &str = "PA9";

    /// Rain potentiometer wiper (ADC1)
    pub const RAIN_ADC: &str = "PA0";

    /// DHT22 data line (open drain, external pull-up)
    pub const DHT22_DATA: &str = "PB0";

    /// Safe indicator LED (green)
    pub const LED_SAFE: &str = "PC0";

    /// Watch indicator LED (yellow)
    pub const LED_WATCH: &str = "PC1";

    /// Danger indicator LED (red)
    pub const LED_DANGER: &str = "PC2";

    /// Buzzer output
    pub const BUZZER: &str = "PB4";

    /// I2C1 SCL (display)
    pub const I2C1_SCL: &str = "PB8";

    /// I2C1 SDA (display)
    pub const I2C1_SDA: &str = "PB9";

    /// USB D+ (handled by USB peripheral)
    pub const USB_DP: &str = "PA12";

    /// USB D- (handled by USB peripheral)
    pub const USB_DM: &str = "PA11";
}

/// Hazard thresholds used by the classifier
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// Distance at or below which the station is on watch (cm)
    pub watch_distance_cm: f32,
    /// Distance at or below which the station is in danger (cm)
    pub danger_distance_cm: f32,
    /// Rain level for moderate rain
    pub moderate_rain: u16,
    /// Rain level for heavy rain
    pub heavy_rain: u16,
    /// Humidity that raises a watch on its own (%)
    pub watch_humidity_pct: f32,
    /// Humidity required by the compound danger rule (%)
    pub compound_humidity_pct: f32,
}

impl Thresholds {
    /// Factory thresholds
    pub const DEFAULT: Self = Self {
        watch_distance_cm: WATCH_DISTANCE_CM,
        danger_distance_cm: DANGER_DISTANCE_CM,
        moderate_rain: MODERATE_RAIN_LEVEL,
        heavy_rain: HEAVY_RAIN_LEVEL,
        watch_humidity_pct: WATCH_HUMIDITY_PCT,
        compound_humidity_pct: COMPOUND_HUMIDITY_PCT,
    };
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Runtime view of the monitor configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonitorConfig {
    /// Classifier thresholds
    pub thresholds: Thresholds,
    /// Sensor mounting height above ground (cm)
    pub baseline_cm: f32,
    /// Cycles a raised hazard is held (1 = no hold)
    pub hold_cycles: usize,
}

impl MonitorConfig {
    /// Factory configuration
    pub const DEFAULT: Self = Self {
        thresholds: Thresholds::DEFAULT,
        baseline_cm: BASELINE_HEIGHT_CM,
        hold_cycles: DEFAULT_HOLD_CYCLES,
    };

    /// Replace the hold length, clamped to `1..=HAZARD_HISTORY_LEN`
    #[must_use]
    pub const fn with_hold_cycles(self, cycles: usize) -> Self {
        let hold_cycles = if cycles == 0 {
            1
        } else if cycles > HAZARD_HISTORY_LEN {
            HAZARD_HISTORY_LEN
        } else {
            cycles
        };
        Self { hold_cycles, ..self }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
