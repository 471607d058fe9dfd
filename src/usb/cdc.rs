//! USB CDC ACM telemetry port
//!
//! Lines are queued in a bounded channel. When the queue is full the newest
//! line is dropped and the writer is told so; the monitor loop never waits
//! on the host.

use core::fmt;

use embassy_futures::select::select;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::driver::EndpointError;

use crate::config::{TELEMETRY_QUEUE_DEPTH, USB_CDC_PACKET_SIZE};
use crate::telemetry::{frame_line, truncate_line, TelemetryLine, TelemetrySink};
use crate::usb::UsbDriver;

/// Queue between the monitor loop and the USB task
pub type TelemetryChannel = Channel<CriticalSectionRawMutex, TelemetryLine, TELEMETRY_QUEUE_DEPTH>;

/// Telemetry queue shared by the monitor loop and the USB task
pub static TELEMETRY: TelemetryChannel = Channel::new();

/// Telemetry write error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TelemetryError {
    /// Queue full, line dropped
    QueueFull,
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull => f.write_str("telemetry queue full"),
        }
    }
}

impl defmt::Format for TelemetryError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::QueueFull => defmt::write!(f, "QueueFull"),
        }
    }
}

/// [`TelemetrySink`] that queues lines for the USB task
#[derive(Clone, Copy)]
pub struct ChannelSink {
    channel: &'static TelemetryChannel,
}

impl ChannelSink {
    /// Sink over a telemetry queue
    #[must_use]
    pub const fn new(channel: &'static TelemetryChannel) -> Self {
        Self { channel }
    }
}

impl Default for ChannelSink {
    fn default() -> Self {
        Self::new(&TELEMETRY)
    }
}

impl TelemetrySink for ChannelSink {
    type Error = TelemetryError;

    fn write_line(&mut self, line: &str) -> Result<(), Self::Error> {
        self.channel
            .try_send(truncate_line(line))
            .map_err(|_| TelemetryError::QueueFull)
    }
}

/// Drain the telemetry queue to the host, forever.
///
/// While no host is attached queued lines are discarded, so the stream a
/// newly opened terminal sees starts with current data.
pub async fn run_telemetry(
    mut class: CdcAcmClass<'static, UsbDriver>,
    channel: &'static TelemetryChannel,
) -> ! {
    loop {
        discard_until_connected(&mut class, channel).await;
        defmt::info!("telemetry: host connected");

        if let Err(e) = stream_lines(&mut class, channel).await {
            defmt::info!("telemetry: host disconnected ({})", e);
        }
    }
}

async fn discard_until_connected(
    class: &mut CdcAcmClass<'static, UsbDriver>,
    channel: &'static TelemetryChannel,
) {
    let discard = async {
        loop {
            let _ = channel.receive().await;
        }
    };

    select(class.wait_connection(), discard).await;
}

async fn stream_lines(
    class: &mut CdcAcmClass<'static, UsbDriver>,
    channel: &'static TelemetryChannel,
) -> Result<(), EndpointError> {
    let packet_size = usize::from(USB_CDC_PACKET_SIZE);

    loop {
        let line = channel.receive().await;
        let framed = frame_line(&line);

        for packet in framed.chunks(packet_size) {
            class.write_packet(packet).await?;
        }
        // a full final packet needs a ZLP to end the transfer
        if framed.len() % packet_size == 0 {
            class.write_packet(&[]).await?;
        }
    }
}
