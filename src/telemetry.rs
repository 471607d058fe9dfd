//! Telemetry Reporter
//!
//! Human-readable status block written once per cycle to the text output
//! stream. The stream is for people reading a serial monitor; nothing in the
//! firmware parses it back.

use core::fmt;

use heapless::{String, Vec};

use crate::config::{MonitorConfig, RAIN_LEVEL_MAX, TELEMETRY_LINE_LEN};
use crate::types::{round_half_away, HazardState, Reading};

/// One line of telemetry text (without line terminator)
pub type TelemetryLine = String<TELEMETRY_LINE_LEN>;

/// Line terminator appended on the wire
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

/// A line plus its terminator, as sent on the wire
pub type FramedLine = Vec<u8, { TELEMETRY_LINE_LEN + 2 }>;

/// First line of every status block
pub const BLOCK_HEADER: &str = "==================== DADOS ATUAIS ====================";

/// Last line of every status block
pub const BLOCK_FOOTER: &str = "=====================================================";

/// Line-oriented text output
pub trait TelemetrySink {
    /// Error reported when a line could not be written
    type Error;

    /// Write one line; the sink adds the terminator
    fn write_line(&mut self, line: &str) -> Result<(), Self::Error>;
}

/// Format a line, truncating at [`TELEMETRY_LINE_LEN`] bytes
#[must_use]
pub fn format_line(args: fmt::Arguments<'_>) -> TelemetryLine {
    let mut line = TelemetryLine::new();
    // heapless rejects a whole fragment that does not fit; keep what did
    let _ = fmt::write(&mut line, args);
    line
}

/// Copy `text` into a line, cutting at the last whole character that fits
#[must_use]
pub fn truncate_line(text: &str) -> TelemetryLine {
    let mut line = TelemetryLine::new();
    for c in text.chars() {
        if line.push(c).is_err() {
            break;
        }
    }
    line
}

/// Append the line terminator
#[must_use]
pub fn frame_line(line: &str) -> FramedLine {
    let line = truncate_line(line);
    let mut framed = FramedLine::new();
    // capacity covers a full line plus terminator
    let _ = framed.extend_from_slice(line.as_bytes());
    let _ = framed.extend_from_slice(LINE_TERMINATOR);
    framed
}

/// Write the start-up banner
pub fn banner<S: TelemetrySink>(sink: &mut S) -> Result<(), S::Error> {
    sink.write_line("=== Sistema de Monitoramento de Enchentes Iniciado ===")?;
    sink.write_line("Monitorando: Nível de Água | Chuva | Umidade | Temperatura")?;
    sink.write_line("POTENCIÔMETRO: Gire no sentido horário para simular mais chuva")?;
    sink.write_line("==================================================")
}

/// Write the status block for one cycle
pub fn report<S: TelemetrySink>(
    sink: &mut S,
    state: HazardState,
    reading: &Reading,
    config: &MonitorConfig,
) -> Result<(), S::Error> {
    let level = round_half_away(reading.water_level_cm(config.baseline_cm), 2);
    let rain = reading.rain_intensity(&config.thresholds);

    sink.write_line(BLOCK_HEADER)?;
    sink.write_line(&format_line(format_args!(
        "Status do Sistema: {}",
        state.report_label()
    )))?;
    sink.write_line(&format_line(format_args!("Nível de Água: {level:.2} cm do solo")))?;
    sink.write_line(&format_line(format_args!(
        "Distância do Sensor: {:.2} cm",
        round_half_away(reading.distance_cm, 2)
    )))?;
    sink.write_line(&format_line(format_args!(
        "Potenciômetro (Chuva): {}/{} ({})",
        reading.rain_level,
        RAIN_LEVEL_MAX,
        rain.report_label()
    )))?;
    sink.write_line(&format_line(format_args!(
        "Umidade do Ar: {:.2}%",
        round_half_away(reading.humidity_pct, 2)
    )))?;
    sink.write_line(&format_line(format_args!(
        "Temperatura: {:.2}°C",
        round_half_away(reading.temperature_c, 2)
    )))?;
    sink.write_line(BLOCK_FOOTER)?;
    sink.write_line("")
}
