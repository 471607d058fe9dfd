//! Monitoring Cycle
//!
//! Owns the sensors, the outputs and the state that survives between cycles
//! (alert timer, hazard history). One call to [`Monitor::cycle`] is one pass
//! of read → classify → indicators → display → telemetry.
//!
//! Output stages never stop the cycle: a failing stage is recorded in
//! [`Faults`] and the remaining stages still run.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::alert::{IndicatorDriver, Pulse};
use crate::config::MonitorConfig;
use crate::hazard::{classify, HazardFilter};
use crate::sensors::Sensors;
use crate::telemetry::{banner, report, TelemetrySink};
use crate::types::{HazardState, Reading};
use crate::ui::{present, render_frame, splash_frame, DisplayFrame, TextDisplay};

/// Output stages that failed during a cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Faults {
    /// LED or buzzer pin could not be driven
    pub indicators: bool,
    /// Display rejected the frame
    pub display: bool,
    /// Telemetry line could not be written
    pub telemetry: bool,
}

impl Faults {
    /// No stage failed
    pub const NONE: Self = Self {
        indicators: false,
        display: false,
        telemetry: false,
    };

    /// Check if any stage failed
    #[must_use]
    pub const fn any(&self) -> bool {
        self.indicators || self.display || self.telemetry
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Faults {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Faults(ind={}, disp={}, tlm={})",
            self.indicators,
            self.display,
            self.telemetry
        );
    }
}

/// Outcome of one monitoring cycle
#[derive(Clone, Debug, PartialEq)]
pub struct CycleReport {
    /// Values read this cycle
    pub reading: Reading,
    /// Classifier output
    pub raw_state: HazardState,
    /// State after the hazard hold, the one shown on the outputs
    pub state: HazardState,
    /// Buzzer pulse fired this cycle
    pub pulse: Option<Pulse>,
    /// Frame sent to the display
    pub frame: DisplayFrame,
    /// Stages that failed
    pub faults: Faults,
}

/// Flood monitor station
pub struct Monitor<Sen, P, D, T, S> {
    config: MonitorConfig,
    sensors: Sen,
    indicators: IndicatorDriver<P, D>,
    display: T,
    sink: S,
    filter: HazardFilter,
    cycles: u32,
}

impl<Sen, P, D, T, S> Monitor<Sen, P, D, T, S>
where
    Sen: Sensors,
    P: OutputPin,
    D: DelayNs,
    T: TextDisplay,
    S: TelemetrySink,
{
    /// Assemble a station
    pub fn new(
        config: MonitorConfig,
        sensors: Sen,
        indicators: IndicatorDriver<P, D>,
        display: T,
        sink: S,
    ) -> Self {
        Self {
            config,
            sensors,
            indicators,
            display,
            sink,
            filter: HazardFilter::new(config.hold_cycles),
            cycles: 0,
        }
    }

    /// Boot actions: safe indicators, splash frame, telemetry banner
    pub fn start(&mut self, now_ms: u64) -> Faults {
        let mut faults = Faults::NONE;
        faults.indicators = self.indicators.apply(HazardState::Safe, now_ms).is_err();
        faults.display = present(&mut self.display, &splash_frame()).is_err();
        faults.telemetry = banner(&mut self.sink).is_err();
        faults
    }

    /// Run one monitoring cycle at monotonic time `now_ms`
    pub fn cycle(&mut self, now_ms: u64) -> CycleReport {
        let reading = self.sensors.read();
        let raw_state = classify(&reading, &self.config.thresholds);
        let state = self.filter.apply(raw_state);

        let mut faults = Faults::NONE;

        let pulse = match self.indicators.apply(state, now_ms) {
            Ok(pulse) => pulse,
            Err(_) => {
                faults.indicators = true;
                None
            }
        };

        let frame = render_frame(state, &reading, &self.config);
        faults.display = present(&mut self.display, &frame).is_err();
        faults.telemetry = report(&mut self.sink, state, &reading, &self.config).is_err();

        self.cycles = self.cycles.wrapping_add(1);

        CycleReport {
            reading,
            raw_state,
            state,
            pulse,
            frame,
            faults,
        }
    }

    /// Completed cycles since boot
    #[must_use]
    pub const fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Indicator driver
    #[must_use]
    pub const fn indicators(&self) -> &IndicatorDriver<P, D> {
        &self.indicators
    }

    /// Display
    #[must_use]
    pub const fn display(&self) -> &T {
        &self.display
    }

    /// Telemetry sink
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Sensors
    pub fn sensors_mut(&mut self) -> &mut Sen {
        &mut self.sensors
    }
}
