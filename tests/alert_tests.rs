//! Indicator Driver Tests
//!
//! Tests for LED selection, buzzer cadence and the alert timer.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test alert_tests

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use flood_firmware::alert::{AlertTimer, BuzzerCadence, IndicatorDriver, IndicatorPins, Pulse};
use flood_firmware::types::HazardState;

// =============================================================================
// Test Doubles
// =============================================================================

/// Output pin that remembers its level and counts rising edges
#[derive(Default)]
struct FakePin {
    high: bool,
    rises: u32,
}

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.high {
            self.rises += 1;
        }
        self.high = true;
        Ok(())
    }
}

/// Output pin on a dead port
struct BrokenPin;

impl ErrorType for BrokenPin {
    type Error = ErrorKind;
}

impl OutputPin for BrokenPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }
}

/// Delay that records requested holds instead of waiting
#[derive(Default)]
struct RecordingDelay {
    holds_ms: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.holds_ms.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.holds_ms.push(ms);
    }
}

fn driver() -> IndicatorDriver<FakePin, RecordingDelay> {
    IndicatorDriver::new(
        IndicatorPins::new(
            FakePin::default(),
            FakePin::default(),
            FakePin::default(),
            FakePin::default(),
        ),
        RecordingDelay::default(),
    )
}

fn leds(driver: &IndicatorDriver<FakePin, RecordingDelay>) -> (bool, bool, bool) {
    let pins = driver.pins();
    (pins.safe.high, pins.watch.high, pins.danger.high)
}

// =============================================================================
// AlertTimer Tests
// =============================================================================

#[test]
fn test_alert_timer_starts_at_zero() {
    let timer = AlertTimer::new();
    assert_eq!(timer.last_alert_ms(), 0);
    assert_eq!(timer, AlertTimer::default());
}

#[test]
fn test_alert_timer_due() {
    let mut timer = AlertTimer::new();
    timer.mark(1000);
    assert!(!timer.is_due(2999, 2000));
    assert!(timer.is_due(3000, 2000));
    assert_eq!(timer.elapsed_ms(3500), 2500);
}

#[test]
fn test_alert_timer_clock_behind_is_not_due() {
    let mut timer = AlertTimer::new();
    timer.mark(5000);
    assert_eq!(timer.elapsed_ms(4000), 0);
    assert!(!timer.is_due(4000, 500));
}

// =============================================================================
// Cadence Tests
// =============================================================================

#[test]
fn test_cadence_per_state() {
    assert_eq!(BuzzerCadence::for_state(HazardState::Safe), None);
    assert_eq!(
        BuzzerCadence::for_state(HazardState::Watch),
        Some(BuzzerCadence {
            interval_ms: 2000,
            pulse_ms: 200
        })
    );
    assert_eq!(
        BuzzerCadence::for_state(HazardState::Danger),
        Some(BuzzerCadence {
            interval_ms: 500,
            pulse_ms: 100
        })
    );
}

// =============================================================================
// LED Tests
// =============================================================================

#[test]
fn test_exactly_one_led_per_state() {
    let mut d = driver();

    d.apply(HazardState::Safe, 0).unwrap();
    assert_eq!(leds(&d), (true, false, false));

    d.apply(HazardState::Watch, 100).unwrap();
    assert_eq!(leds(&d), (false, true, false));

    d.apply(HazardState::Danger, 200).unwrap();
    assert_eq!(leds(&d), (false, false, true));

    d.apply(HazardState::Safe, 300).unwrap();
    assert_eq!(leds(&d), (true, false, false));
    assert_eq!(d.shown(), Some(HazardState::Safe));
}

#[test]
fn test_nothing_shown_before_first_apply() {
    let d = driver();
    assert_eq!(d.shown(), None);
    assert_eq!(leds(&d), (false, false, false));
}

#[test]
fn test_safe_never_sounds() {
    let mut d = driver();
    for t in (0..10_000).step_by(1000) {
        assert_eq!(d.apply(HazardState::Safe, t).unwrap(), None);
    }
    assert_eq!(d.pins().buzzer.rises, 0);
    assert!(d.delay().holds_ms.is_empty());
}

// =============================================================================
// Buzzer Throttling Tests
// =============================================================================

#[test]
fn test_watch_pulse_throttling() {
    let mut d = driver();

    // First call: last alert at 0, 2000 ms have passed
    assert_eq!(
        d.apply(HazardState::Watch, 2000).unwrap(),
        Some(Pulse {
            at_ms: 2000,
            duration_ms: 200
        })
    );
    // 500 ms later: too soon
    assert_eq!(d.apply(HazardState::Watch, 2500).unwrap(), None);
    // 2000 ms after the last pulse: fires again
    assert!(d.apply(HazardState::Watch, 4000).unwrap().is_some());

    assert_eq!(d.pins().buzzer.rises, 2);
    assert_eq!(d.delay().holds_ms, vec![200, 200]);
}

#[test]
fn test_watch_too_early_after_boot() {
    let mut d = driver();
    assert_eq!(d.apply(HazardState::Watch, 1500).unwrap(), None);
    assert!(d.apply(HazardState::Watch, 2000).unwrap().is_some());
}

#[test]
fn test_interval_measured_from_last_pulse() {
    let mut d = driver();
    assert!(d.apply(HazardState::Watch, 2000).unwrap().is_some());
    // Skipped calls do not move the timer
    assert!(d.apply(HazardState::Watch, 3000).unwrap().is_none());
    assert!(d.apply(HazardState::Watch, 3999).unwrap().is_none());
    assert_eq!(d.timer().last_alert_ms(), 2000);
    assert!(d.apply(HazardState::Watch, 4000).unwrap().is_some());
    assert_eq!(d.timer().last_alert_ms(), 4000);
}

#[test]
fn test_danger_cadence() {
    let mut d = driver();
    assert_eq!(
        d.apply(HazardState::Danger, 3000).unwrap(),
        Some(Pulse {
            at_ms: 3000,
            duration_ms: 100
        })
    );
    assert!(d.apply(HazardState::Danger, 3400).unwrap().is_none());
    assert!(d.apply(HazardState::Danger, 3500).unwrap().is_some());
    assert!(d.apply(HazardState::Danger, 4000).unwrap().is_some());
    assert_eq!(d.delay().holds_ms, vec![100, 100, 100]);
}

#[test]
fn test_danger_once_per_second_cycle() {
    // With a 1 s loop every danger cycle beeps
    let mut d = driver();
    for t in (2000..10_000).step_by(1000) {
        assert!(d.apply(HazardState::Danger, t).unwrap().is_some(), "t={t}");
    }
}

#[test]
fn test_watch_every_other_second_cycle() {
    let mut d = driver();
    let fired: Vec<u64> = (2000..10_000)
        .step_by(1000)
        .filter(|&t| d.apply(HazardState::Watch, t).unwrap().is_some())
        .collect();
    assert_eq!(fired, vec![2000, 4000, 6000, 8000]);
}

#[test]
fn test_timer_shared_across_states() {
    let mut d = driver();
    assert!(d.apply(HazardState::Watch, 2000).unwrap().is_some());
    // Danger right after a watch pulse waits its own 500 ms
    assert!(d.apply(HazardState::Danger, 2400).unwrap().is_none());
    assert!(d.apply(HazardState::Danger, 2500).unwrap().is_some());
}

#[test]
fn test_buzzer_low_after_pulse() {
    let mut d = driver();
    d.apply(HazardState::Danger, 2000).unwrap();
    assert!(!d.pins().buzzer.high);
    assert_eq!(d.pins().buzzer.rises, 1);
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_pin_error_propagates() {
    let mut d = IndicatorDriver::new(
        IndicatorPins::new(BrokenPin, BrokenPin, BrokenPin, BrokenPin),
        RecordingDelay::default(),
    );
    assert_eq!(d.apply(HazardState::Danger, 2000), Err(ErrorKind::Other));
    // Nothing fired, so the timer did not move
    assert_eq!(d.timer().last_alert_ms(), 0);
    assert!(d.delay().holds_ms.is_empty());
}

#[test]
fn test_release_returns_parts() {
    let mut d = driver();
    d.apply(HazardState::Watch, 2000).unwrap();
    let (pins, delay) = d.release();
    assert!(pins.watch.high);
    assert_eq!(delay.holds_ms, vec![200]);
}
