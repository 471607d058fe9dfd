//! Display Presenter
//!
//! Renders the hazard state and derived values into a 16x2 text frame and
//! pushes it to a [`TextDisplay`]. Lines are always exactly
//! [`DISPLAY_COLUMNS`] wide: shorter text is padded with spaces so stale
//! characters from the previous frame are overwritten, longer text is cut.

use core::fmt::{self, Write};

use heapless::String;

use crate::config::{MonitorConfig, DISPLAY_COLUMNS, DISPLAY_ROWS};
use crate::types::{round_half_away, HazardState, Reading};

/// One display row
pub type DisplayLine = String<DISPLAY_COLUMNS>;

/// A character display addressed as rows of text
pub trait TextDisplay {
    /// Error reported by the underlying device
    type Error;

    /// Blank the whole surface
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Write `text` starting at column 0 of `row`
    fn write_line(&mut self, row: usize, text: &str) -> Result<(), Self::Error>;

    /// Make pending writes visible
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Full content of the display
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayFrame {
    lines: [DisplayLine; DISPLAY_ROWS],
}

impl DisplayFrame {
    /// Build a frame from two pieces of text
    #[must_use]
    pub fn from_text(top: &str, bottom: &str) -> Self {
        Self {
            lines: [
                fixed_line(format_args!("{top}")),
                fixed_line(format_args!("{bottom}")),
            ],
        }
    }

    /// Text of `row`, empty if out of range
    #[must_use]
    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map_or("", |l| l.as_str())
    }

    /// All rows, top first
    #[must_use]
    pub fn lines(&self) -> &[DisplayLine; DISPLAY_ROWS] {
        &self.lines
    }
}

/// Writes into a line and silently drops what does not fit
struct Truncating<'a>(&'a mut DisplayLine);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

fn fixed_line(args: fmt::Arguments<'_>) -> DisplayLine {
    let mut line = DisplayLine::new();
    let _ = Truncating(&mut line).write_fmt(args);
    while line.push(' ').is_ok() {}
    line
}

/// Render the status frame for one cycle.
///
/// Top: hazard label and water level above ground, e.g. `PERIGO! 110.0cm`.
/// Bottom: rain intensity and humidity, e.g. `Chuva:FORTE 95%`.
#[must_use]
pub fn render_frame(state: HazardState, reading: &Reading, config: &MonitorConfig) -> DisplayFrame {
    let level = reading.water_level_cm(config.baseline_cm);
    let rain = reading.rain_intensity(&config.thresholds);

    DisplayFrame {
        lines: [
            fixed_line(format_args!(
                "{} {:.1}cm",
                state.display_label(),
                round_half_away(level, 1)
            )),
            fixed_line(format_args!(
                "Chuva:{} {:.0}%",
                rain.display_label(),
                round_half_away(reading.humidity_pct, 0)
            )),
        ],
    }
}

/// Frame shown while the station boots
#[must_use]
pub fn splash_frame() -> DisplayFrame {
    DisplayFrame::from_text("Sistema Anti-", "Enchente v1.0")
}

/// Replace the display content with `frame`
pub fn present<T: TextDisplay>(display: &mut T, frame: &DisplayFrame) -> Result<(), T::Error> {
    display.clear()?;
    for (row, line) in frame.lines().iter().enumerate() {
        display.write_line(row, line)?;
    }
    display.flush()
}
