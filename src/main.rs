//! Flood Monitor Main Application
//!
//! Entry point for the STM32G474-based flood warning station.
//! Initializes hardware, spawns the USB tasks and runs the monitoring loop.

#![no_std]
#![no_main]

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_stm32::i2c::I2c;
use embassy_stm32::time::Hertz;
use embassy_stm32::usb::Driver;
use embassy_stm32::{bind_interrupts, peripherals, usb};
use embassy_time::{Delay, Timer};
use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::UsbDevice;
use {defmt_rtt as _, panic_probe as _};

use flood_firmware::alert::{IndicatorDriver, IndicatorPins};
use flood_firmware::drivers::dht22::Dht22;
use flood_firmware::drivers::display::OledDisplay;
use flood_firmware::drivers::hcsr04::Hcsr04;
use flood_firmware::hal::adc::RainAdc;
use flood_firmware::hal::gpio::IndicatorOutput;
use flood_firmware::hal::timer::uptime_ms;
use flood_firmware::monitor::{Faults, Monitor};
use flood_firmware::prelude::*;
use flood_firmware::sensors::SensorReader;
use flood_firmware::usb::cdc::{run_telemetry, ChannelSink, TELEMETRY};
use flood_firmware::usb::{self as telemetry_usb, UsbDriver, UsbStrings};

// Bind interrupt handlers
bind_interrupts!(struct Irqs {
    USB_LP => usb::InterruptHandler<peripherals::USB>;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Flood Monitor Firmware v{}", env!("CARGO_PKG_VERSION"));

    // USB needs a 48 MHz clock; HSI48 trimmed by USB SOF
    let mut config = embassy_stm32::Config::default();
    {
        use embassy_stm32::rcc::{mux, Hsi48Config};
        config.rcc.hsi48 = Some(Hsi48Config { sync_from_usb: true });
        config.rcc.mux.clk48sel = mux::Clk48sel::HSI48;
    }
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    // USB CDC ACM telemetry port (PA12 = D+, PA11 = D-)
    let driver = Driver::new(p.USB, Irqs, p.PA12, p.PA11);
    let (device, class) = telemetry_usb::build(driver, &UsbStrings::default());
    spawner.spawn(usb_device_task(device)).unwrap();
    spawner.spawn(telemetry_task(class)).unwrap();

    // Sensors: HC-SR04 on PA8/PA9, rain potentiometer on PA0, DHT22 on PB0
    let sensors = SensorReader::new(
        Hcsr04::new(p.PA8, p.PA9),
        RainAdc::new(p.ADC1, p.PA0),
        Dht22::new(p.PB0),
    );

    // Indicators: LEDs on PC0/PC1/PC2, buzzer on PB4
    let indicators = IndicatorDriver::new(
        IndicatorPins::new(
            IndicatorOutput::new(p.PC0, "led safe"),
            IndicatorOutput::new(p.PC1, "led watch"),
            IndicatorOutput::new(p.PC2, "led danger"),
            IndicatorOutput::new(p.PB4, "buzzer"),
        ),
        Delay,
    );

    // I2C1 for the OLED: PB8 = SCL, PB9 = SDA
    let i2c = I2c::new_blocking(
        p.I2C1,
        p.PB8,
        p.PB9,
        Hertz(I2C_FREQUENCY_HZ),
        Default::default(),
    );
    let mut display = OledDisplay::new(i2c);
    if let Err(e) = display.init() {
        warn!("display init failed: {}", e);
    }

    info!("I2C1 initialized at {}Hz", I2C_FREQUENCY_HZ);

    let mut monitor = Monitor::new(
        MonitorConfig::DEFAULT,
        sensors,
        indicators,
        display,
        ChannelSink::new(&TELEMETRY),
    );

    log_faults(monitor.start(uptime_ms()));
    Timer::after(Duration::from_millis(SPLASH_DURATION_MS)).await;

    info!("Entering monitoring loop");

    loop {
        let report = monitor.cycle(uptime_ms());
        let r = report.reading;
        info!(
            "{} dist={}cm rain={} hum={}% temp={}C",
            report.state, r.distance_cm, r.rain_level, r.humidity_pct, r.temperature_c
        );
        if report.raw_state != report.state {
            info!("held {} (raw {})", report.state, report.raw_state);
        }
        if let Some(pulse) = report.pulse {
            info!("buzzer {}ms", pulse.duration_ms);
        }
        log_faults(report.faults);

        Timer::after(Duration::from_millis(CYCLE_INTERVAL_MS)).await;
    }
}

fn log_faults(faults: Faults) {
    if faults.indicators {
        warn!("indicator outputs failed");
    }
    if faults.display {
        warn!("display update failed");
    }
    if faults.telemetry {
        warn!("telemetry line dropped");
    }
}

/// USB device task - runs the USB stack
#[embassy_executor::task]
async fn usb_device_task(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    device.run().await
}

/// Telemetry task - drains status lines to the CDC ACM port
#[embassy_executor::task]
async fn telemetry_task(class: CdcAcmClass<'static, UsbDriver>) -> ! {
    run_telemetry(class, &TELEMETRY).await
}
