//! OLED Display Driver
//!
//! Presents the 16x2 status text on an SSD1306 128x64 OLED over I2C.
//! An 8x13 font makes each row exactly 16 characters wide.

use core::fmt;

use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Blocking;
use embedded_graphics::mono_font::ascii::FONT_8X13;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

use crate::config::{DISPLAY_COLUMNS, DISPLAY_I2C_ADDR, DISPLAY_ROWS};
use crate::ui::TextDisplay;

/// Display width in pixels
pub const DISPLAY_WIDTH: u32 = 128;

/// Display height in pixels
pub const DISPLAY_HEIGHT: u32 = 64;

/// Glyph cell of `FONT_8X13`
const GLYPH_WIDTH: u32 = 8;
const GLYPH_HEIGHT: u32 = 13;

// A full text row spans the panel exactly
const _: () = assert!(DISPLAY_COLUMNS as u32 * GLYPH_WIDTH == DISPLAY_WIDTH);

/// Top pixel of each text row, each row centred in its half of the panel
const ROW_Y: [i32; DISPLAY_ROWS] = [
    ((DISPLAY_HEIGHT / 2 - GLYPH_HEIGHT) / 2) as i32,
    ((DISPLAY_HEIGHT * 3 / 2 - GLYPH_HEIGHT) / 2) as i32,
];

type Panel<'d> = Ssd1306<
    I2CInterface<I2c<'d, Blocking>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// Display error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayError {
    /// Controller did not acknowledge on the bus
    Bus,
    /// Row outside the text surface
    Row(usize),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => f.write_str("display bus error"),
            Self::Row(row) => write!(f, "row {row} out of range"),
        }
    }
}

impl defmt::Format for DisplayError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Bus => defmt::write!(f, "Bus"),
            Self::Row(row) => defmt::write!(f, "Row({})", row),
        }
    }
}

/// SSD1306 used as a two-row text surface
pub struct OledDisplay<'d> {
    panel: Panel<'d>,
    style: MonoTextStyle<'static, BinaryColor>,
}

impl<'d> OledDisplay<'d> {
    /// Wrap an I2C bus; call [`Self::init`] before the first frame
    #[must_use]
    pub fn new(i2c: I2c<'d, Blocking>) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, DISPLAY_I2C_ADDR);
        let panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        Self {
            panel,
            style: MonoTextStyle::new(&FONT_8X13, BinaryColor::On),
        }
    }

    /// Run the controller init sequence and blank the panel
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.panel.init().map_err(|_| DisplayError::Bus)?;
        self.panel.clear_buffer();
        self.panel.flush().map_err(|_| DisplayError::Bus)
    }
}

impl TextDisplay for OledDisplay<'_> {
    type Error = DisplayError;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.panel.clear_buffer();
        Ok(())
    }

    fn write_line(&mut self, row: usize, text: &str) -> Result<(), Self::Error> {
        let y = *ROW_Y.get(row).ok_or(DisplayError::Row(row))?;
        Text::with_baseline(text, Point::new(0, y), self.style, Baseline::Top)
            .draw(&mut self.panel)
            .map_err(|_| DisplayError::Bus)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.panel.flush().map_err(|_| DisplayError::Bus)
    }
}
