//! Indicator Driver
//!
//! Drives the three mode LEDs and the buzzer from the hazard state.
//! The buzzer cadence is throttled by an [`AlertTimer`] that only moves when a
//! pulse actually fires, so intervals are measured from the previous pulse and
//! not on a fixed grid.
//!
//! A pulse is a blocking hold: the driver keeps the buzzer high for the pulse
//! length through [`DelayNs`] before returning.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::{
    DANGER_ALERT_INTERVAL_MS, DANGER_PULSE_MS, WATCH_ALERT_INTERVAL_MS, WATCH_PULSE_MS,
};
use crate::types::HazardState;

/// Timestamp of the last buzzer pulse (monotonic milliseconds)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AlertTimer {
    last_alert_ms: u64,
}

impl AlertTimer {
    /// Timer as it is at boot
    #[must_use]
    pub const fn new() -> Self {
        Self { last_alert_ms: 0 }
    }

    /// Timestamp of the last pulse
    #[must_use]
    pub const fn last_alert_ms(&self) -> u64 {
        self.last_alert_ms
    }

    /// Time since the last pulse (0 if the clock reads earlier)
    #[must_use]
    pub const fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_alert_ms)
    }

    /// Check if at least `interval_ms` passed since the last pulse
    #[must_use]
    pub const fn is_due(&self, now_ms: u64, interval_ms: u64) -> bool {
        self.elapsed_ms(now_ms) >= interval_ms
    }

    /// Record a pulse at `now_ms`
    pub fn mark(&mut self, now_ms: u64) {
        self.last_alert_ms = now_ms;
    }
}

/// Buzzer rhythm for an alerting state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuzzerCadence {
    /// Minimum time between pulses (ms)
    pub interval_ms: u64,
    /// Pulse length (ms)
    pub pulse_ms: u32,
}

impl BuzzerCadence {
    /// Slow beeping while on watch
    pub const WATCH: Self = Self {
        interval_ms: WATCH_ALERT_INTERVAL_MS,
        pulse_ms: WATCH_PULSE_MS,
    };

    /// Fast beeping in danger
    pub const DANGER: Self = Self {
        interval_ms: DANGER_ALERT_INTERVAL_MS,
        pulse_ms: DANGER_PULSE_MS,
    };

    /// Cadence for a state, `None` when the buzzer stays silent
    #[must_use]
    pub const fn for_state(state: HazardState) -> Option<Self> {
        match state {
            HazardState::Safe => None,
            HazardState::Watch => Some(Self::WATCH),
            HazardState::Danger => Some(Self::DANGER),
        }
    }
}

/// A buzzer pulse that was fired
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pulse {
    /// When the pulse started (ms)
    pub at_ms: u64,
    /// How long the buzzer was held (ms)
    pub duration_ms: u32,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Pulse {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Pulse({}ms @ {}ms)", self.duration_ms, self.at_ms);
    }
}

/// The four indicator outputs
pub struct IndicatorPins<P> {
    /// Safe LED (green)
    pub safe: P,
    /// Watch LED (yellow)
    pub watch: P,
    /// Danger LED (red)
    pub danger: P,
    /// Buzzer
    pub buzzer: P,
}

impl<P: OutputPin> IndicatorPins<P> {
    /// Bundle the indicator outputs
    pub const fn new(safe: P, watch: P, danger: P, buzzer: P) -> Self {
        Self {
            safe,
            watch,
            danger,
            buzzer,
        }
    }

    /// Drive every LED and the buzzer low
    pub fn all_off(&mut self) -> Result<(), P::Error> {
        self.safe.set_low()?;
        self.watch.set_low()?;
        self.danger.set_low()?;
        self.buzzer.set_low()
    }

    fn mode_led(&mut self, state: HazardState) -> &mut P {
        match state {
            HazardState::Safe => &mut self.safe,
            HazardState::Watch => &mut self.watch,
            HazardState::Danger => &mut self.danger,
        }
    }
}

/// LED and buzzer driver
pub struct IndicatorDriver<P, D> {
    pins: IndicatorPins<P>,
    delay: D,
    timer: AlertTimer,
    shown: Option<HazardState>,
}

impl<P, D> IndicatorDriver<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Create a driver; nothing is driven until [`Self::apply`] is called
    pub const fn new(pins: IndicatorPins<P>, delay: D) -> Self {
        Self {
            pins,
            delay,
            timer: AlertTimer::new(),
            shown: None,
        }
    }

    /// Show `state` and pulse the buzzer if its cadence allows.
    ///
    /// Returns the pulse that fired, if any. The alert timer only moves when a
    /// pulse fires.
    pub fn apply(&mut self, state: HazardState, now_ms: u64) -> Result<Option<Pulse>, P::Error> {
        self.pins.all_off()?;
        self.pins.mode_led(state).set_high()?;
        self.shown = Some(state);

        let Some(cadence) = BuzzerCadence::for_state(state) else {
            return Ok(None);
        };
        if !self.timer.is_due(now_ms, cadence.interval_ms) {
            return Ok(None);
        }

        self.pins.buzzer.set_high()?;
        self.delay.delay_ms(cadence.pulse_ms);
        self.pins.buzzer.set_low()?;
        self.timer.mark(now_ms);

        Ok(Some(Pulse {
            at_ms: now_ms,
            duration_ms: cadence.pulse_ms,
        }))
    }

    /// State currently shown on the LEDs
    #[must_use]
    pub const fn shown(&self) -> Option<HazardState> {
        self.shown
    }

    /// Alert timer
    #[must_use]
    pub const fn timer(&self) -> &AlertTimer {
        &self.timer
    }

    /// Indicator outputs
    #[must_use]
    pub const fn pins(&self) -> &IndicatorPins<P> {
        &self.pins
    }

    /// Delay provider
    #[must_use]
    pub const fn delay(&self) -> &D {
        &self.delay
    }

    /// Give the pins and delay back
    pub fn release(self) -> (IndicatorPins<P>, D) {
        (self.pins, self.delay)
    }
}
