//! Hazard Classifier
//!
//! Maps a [`Reading`] to a [`HazardState`]. Every rule is evaluated on its
//! own and the most severe outcome wins, so the result never depends on the
//! order the rules are written in.

use heapless::Deque;

use crate::config::{Thresholds, HAZARD_HISTORY_LEN};
use crate::types::{HazardState, Reading};

/// Classify one reading.
///
/// | rule | condition                                            | result          |
/// |------|------------------------------------------------------|-----------------|
/// | 1    | distance ≤ danger distance                           | Danger          |
/// | 2    | distance ≤ watch distance                            | at least Watch  |
/// | 3    | rain ≥ heavy                                         | Danger          |
/// | 4    | rain ≥ moderate                                      | at least Watch  |
/// | 5    | humidity ≥ watch humidity                            | at least Watch  |
/// | 6    | distance ≤ watch ∧ rain ≥ moderate ∧ humidity ≥ compound | Danger      |
#[must_use]
pub fn classify(reading: &Reading, thresholds: &Thresholds) -> HazardState {
    let near_danger = reading.distance_cm <= thresholds.danger_distance_cm;
    let near_watch = reading.distance_cm <= thresholds.watch_distance_cm;
    let heavy_rain = reading.rain_level >= thresholds.heavy_rain;
    let moderate_rain = reading.rain_level >= thresholds.moderate_rain;
    let humid = reading.humidity_pct >= thresholds.watch_humidity_pct;
    let compound = near_watch
        && moderate_rain
        && reading.humidity_pct >= thresholds.compound_humidity_pct;

    let rules = [
        (near_danger, HazardState::Danger),
        (near_watch, HazardState::Watch),
        (heavy_rain, HazardState::Danger),
        (moderate_rain, HazardState::Watch),
        (humid, HazardState::Watch),
        (compound, HazardState::Danger),
    ];

    rules
        .iter()
        .filter(|(triggered, _)| *triggered)
        .fold(HazardState::Safe, |state, (_, level)| state.escalate(*level))
}

/// Rolling hold over the last few classifications.
///
/// Reports the most severe state among the last `hold_cycles` raw states:
/// a rise is reported immediately, a drop only once the higher state has
/// aged out of the window. With `hold_cycles == 1` the output equals the
/// raw state.
#[derive(Clone, Debug)]
pub struct HazardFilter {
    history: Deque<HazardState, HAZARD_HISTORY_LEN>,
    hold_cycles: usize,
}

impl HazardFilter {
    /// Create a filter holding raised states for `hold_cycles` cycles
    #[must_use]
    pub fn new(hold_cycles: usize) -> Self {
        Self {
            history: Deque::new(),
            hold_cycles: hold_cycles.clamp(1, HAZARD_HISTORY_LEN),
        }
    }

    /// Configured window length
    #[must_use]
    pub const fn hold_cycles(&self) -> usize {
        self.hold_cycles
    }

    /// Push a raw state and return the held state
    pub fn apply(&mut self, raw: HazardState) -> HazardState {
        while self.history.len() >= self.hold_cycles {
            self.history.pop_front();
        }
        // Cannot fail: the loop above leaves room for one more entry
        let _ = self.history.push_back(raw);

        self.history
            .iter()
            .copied()
            .fold(HazardState::Safe, HazardState::escalate)
    }

    /// Forget the history
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

impl Default for HazardFilter {
    fn default() -> Self {
        Self::new(1)
    }
}
