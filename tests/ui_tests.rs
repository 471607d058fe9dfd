//! Display Presenter Tests
//!
//! Tests for frame rendering, line width handling and presentation.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test ui_tests

use flood_firmware::config::{MonitorConfig, DISPLAY_COLUMNS};
use flood_firmware::types::{HazardState, Reading};
use flood_firmware::ui::{present, render_frame, splash_frame, DisplayFrame, TextDisplay};

// =============================================================================
// Test Doubles
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Clear,
    Write(usize, String),
    Flush,
}

#[derive(Default)]
struct FakeDisplay {
    ops: Vec<Op>,
    fail_on_write: bool,
}

#[derive(Debug, PartialEq)]
struct BusError;

impl TextDisplay for FakeDisplay {
    type Error = BusError;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.ops.push(Op::Clear);
        Ok(())
    }

    fn write_line(&mut self, row: usize, text: &str) -> Result<(), Self::Error> {
        if self.fail_on_write {
            return Err(BusError);
        }
        self.ops.push(Op::Write(row, text.to_string()));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.ops.push(Op::Flush);
        Ok(())
    }
}

fn render(state: HazardState, reading: Reading) -> DisplayFrame {
    render_frame(state, &reading, &MonitorConfig::DEFAULT)
}

// =============================================================================
// Rendering Tests
// =============================================================================

#[test]
fn test_render_danger_frame() {
    let frame = render(HazardState::Danger, Reading::new(90.0, 800, 95.0, 25.0));
    assert_eq!(frame.line(0), "PERIGO! 110.0cm ");
    assert_eq!(frame.line(1), "Chuva:FORTE 95% ");
}

#[test]
fn test_render_safe_frame() {
    let frame = render(HazardState::Safe, Reading::new(180.0, 100, 55.0, 20.0));
    assert_eq!(frame.line(0), "SEGURO 20.0cm   ");
    assert_eq!(frame.line(1), "Chuva:FRACA 55% ");
}

#[test]
fn test_render_watch_frame() {
    let frame = render(HazardState::Watch, Reading::new(130.0, 450, 70.0, 20.0));
    assert_eq!(frame.line(0), "ATENCAO 70.0cm  ");
    assert_eq!(frame.line(1), "Chuva:MOD 70%   ");
}

#[test]
fn test_render_rounds_values() {
    let frame = render(HazardState::Safe, Reading::new(176.66, 0, 64.6, 20.0));
    assert_eq!(frame.line(0), "SEGURO 23.3cm   ");
    assert_eq!(frame.line(1), "Chuva:FRACA 65% ");
}

#[test]
fn test_render_humidity_halves_round_up() {
    let frame = render(HazardState::Safe, Reading::new(160.0, 0, 94.5, 20.0));
    assert_eq!(frame.line(1), "Chuva:FRACA 95% ");
    let frame = render(HazardState::Safe, Reading::new(160.0, 0, 92.5, 20.0));
    assert_eq!(frame.line(1), "Chuva:FRACA 93% ");
}

#[test]
fn test_render_level_halves_round_up() {
    // 200 - 150.75 = 49.25, a tie at one decimal
    let frame = render(HazardState::Safe, Reading::new(150.75, 0, 50.0, 20.0));
    assert_eq!(frame.line(0), "SEGURO 49.3cm   ");
}

#[test]
fn test_render_uses_configured_baseline() {
    let config = MonitorConfig {
        baseline_cm: 300.0,
        ..MonitorConfig::DEFAULT
    };
    let frame = render_frame(
        HazardState::Safe,
        &Reading::new(180.0, 0, 50.0, 20.0),
        &config,
    );
    assert!(frame.line(0).starts_with("SEGURO 120.0cm"));
}

#[test]
fn test_lines_always_full_width() {
    let readings = [
        Reading::new(0.0, 0, 0.0, 0.0),
        Reading::new(90.0, 800, 95.0, 25.0),
        Reading::new(199.9, 1023, 100.0, -5.0),
        Reading::new(30_000.0, 0, 0.0, 0.0),
    ];
    for r in readings {
        for state in HazardState::ALL {
            let frame = render(state, r);
            for line in frame.lines() {
                assert_eq!(line.chars().count(), DISPLAY_COLUMNS, "{line:?}");
            }
        }
    }
}

#[test]
fn test_long_line_truncated() {
    // -29800.0 does not fit next to the label
    let frame = render(HazardState::Safe, Reading::new(30_000.0, 0, 0.0, 0.0));
    assert_eq!(frame.line(0), "SEGURO -29800.0c");
}

#[test]
fn test_no_echo_frame() {
    let frame = render(HazardState::Danger, Reading::new(0.0, 0, 0.0, 0.0));
    assert_eq!(frame.line(0), "PERIGO! 200.0cm ");
    assert_eq!(frame.line(1), "Chuva:FRACA 0%  ");
}

// =============================================================================
// DisplayFrame Tests
// =============================================================================

#[test]
fn test_splash_frame() {
    let frame = splash_frame();
    assert_eq!(frame.line(0), "Sistema Anti-   ");
    assert_eq!(frame.line(1), "Enchente v1.0   ");
}

#[test]
fn test_frame_from_text_pads_and_cuts() {
    let frame = DisplayFrame::from_text("", "0123456789abcdefXYZ");
    assert_eq!(frame.line(0), " ".repeat(DISPLAY_COLUMNS));
    assert_eq!(frame.line(1), "0123456789abcdef");
}

#[test]
fn test_frame_line_out_of_range() {
    assert_eq!(splash_frame().line(2), "");
}

// =============================================================================
// Presentation Tests
// =============================================================================

#[test]
fn test_present_sequence() {
    let mut display = FakeDisplay::default();
    let frame = DisplayFrame::from_text("top", "bottom");
    present(&mut display, &frame).unwrap();

    assert_eq!(
        display.ops,
        vec![
            Op::Clear,
            Op::Write(0, frame.line(0).to_string()),
            Op::Write(1, frame.line(1).to_string()),
            Op::Flush,
        ]
    );
}

#[test]
fn test_present_stops_on_error() {
    let mut display = FakeDisplay {
        fail_on_write: true,
        ..FakeDisplay::default()
    };
    assert_eq!(present(&mut display, &splash_frame()), Err(BusError));
    assert_eq!(display.ops, vec![Op::Clear]);
}
