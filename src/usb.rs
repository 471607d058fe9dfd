//! USB Subsystem
//!
//! The telemetry stream leaves the board on a CDC ACM virtual serial port.
//! The monitor loop never touches USB directly: it queues lines through
//! [`cdc::ChannelSink`] and [`cdc::run_telemetry`] drains them to the host.

pub mod cdc;

use embassy_stm32::peripherals::USB;
use embassy_stm32::usb::Driver;
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::{Builder, UsbDevice};
use static_cell::StaticCell;

use crate::config::{USB_CDC_PACKET_SIZE, USB_PID, USB_VID};

/// USB driver for the on-chip full-speed peripheral
pub type UsbDriver = Driver<'static, USB>;

/// USB device descriptor strings
pub struct UsbStrings {
    /// Manufacturer name
    pub manufacturer: &'static str,
    /// Product name
    pub product: &'static str,
    /// Serial number
    pub serial: &'static str,
}

impl Default for UsbStrings {
    fn default() -> Self {
        Self {
            manufacturer: "Flood Monitor",
            product: "Flood Warning Station",
            serial: "0001",
        }
    }
}

static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static CDC_STATE: StaticCell<State<'static>> = StaticCell::new();

/// Build the USB device with a single CDC ACM function.
///
/// Must be called once; the descriptor buffers are static.
pub fn build(
    driver: UsbDriver,
    strings: &UsbStrings,
) -> (UsbDevice<'static, UsbDriver>, CdcAcmClass<'static, UsbDriver>) {
    let mut config = embassy_usb::Config::new(USB_VID, USB_PID);
    config.manufacturer = Some(strings.manufacturer);
    config.product = Some(strings.product);
    config.serial_number = Some(strings.serial);
    config.max_power = 100;
    config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        config,
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        &mut [],
        CONTROL_BUF.init([0; 64]),
    );

    let class = CdcAcmClass::new(
        &mut builder,
        CDC_STATE.init(State::new()),
        USB_CDC_PACKET_SIZE,
    );

    (builder.build(), class)
}
