//! Garage firmware entry point.
//!
//! Hexagonal architecture with one worker thread per loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  AnyHal             AnyServer           Esp32TimeAdapter       │
//! │  (Sensors+Button)   (HTTP or fake)      (ClockPort)            │
//! │  WifiAdapter                                                   │
//! │  (Connectivity)                                                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  sensors ──▶ REPORT_CHANNEL ──▶ uploader                       │
//! │  commands ─▶ PUSH_CHANNEL ────▶ push                           │
//! │                                                                │
//! │  main: WiFi supervision                                        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{error, info, warn};

use garage::adapters::device_id;
use garage::adapters::hardware::AnyHal;
use garage::adapters::server::AnyServer;
use garage::adapters::time::Esp32TimeAdapter;
use garage::adapters::wifi::{ConnectivityPort, WifiAdapter};
use garage::app::command_loop::CommandPollLoop;
use garage::app::ports::ClockPort;
use garage::app::sensor_loop::SensorPollLoop;
use garage::app::uploader::Uploader;
use garage::channels::{self, PushQueue, ReportQueue, PUSH_CHANNEL, REPORT_CHANNEL};
use garage::config::GarageConfig;
use garage::drivers::door_button::ButtonPresser;
use garage::drivers::hw_init;
use garage::drivers::task_pin::{
    spawn_worker, COMMAND_WORKER, PUSH_WORKER, SENSOR_WORKER, UPLOAD_WORKER,
};
use garage::error::Error;

/// WiFi supervision period on the main thread.
const WIFI_POLL_MS: u32 = 1_000;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Garage firmware v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = GarageConfig::from_build_env().map_err(Error::from)?;
    config.validate().map_err(Error::from)?;

    // ── 3. Peripherals + identity ─────────────────────────────
    if let Err(e) = hw_init::init_gpio() {
        error!("GPIO init failed: {}", e);
        return Err(Error::Init("gpio").into());
    }

    let dev_id = device_id::resolve(&config.device_id, &device_id::read_mac());
    info!("Device ID: {}", dev_id);

    // ── 4. WiFi ───────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let driver = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
        sysloop,
    )?;

    let mut wifi = WifiAdapter::new(driver);
    match wifi.set_credentials(&config.wifi_ssid, &config.wifi_password) {
        Ok(()) => {
            if let Err(e) = wifi.connect() {
                // Poll loops fail their exchanges until `wifi.poll()` recovers.
                warn!("WiFi: initial connect failed ({}), will retry", e);
            }
        }
        Err(e) => warn!("WiFi: credentials rejected ({}), staying offline", e),
    }

    // ── 5. Workers ────────────────────────────────────────────
    let clock = Esp32TimeAdapter::new();

    {
        let mut hal = AnyHal::from_config(&config, clock);
        info!("Sensors: {} HAL", if hal.is_fake() { "simulated" } else { "GPIO" });
        let mut sensor_loop = SensorPollLoop::from_config(&config);
        let period_ms = config.sensor_poll_interval_ms;
        spawn_worker(SENSOR_WORKER, move || {
            let mut sink = ReportQueue::new(&REPORT_CHANNEL);
            loop {
                sensor_loop.tick(&mut hal, &mut sink, clock.uptime_ms());
                FreeRtos::delay_ms(period_ms);
            }
        })?;
    }

    {
        let mut server = AnyServer::from_config(&config);
        if server.is_fake() {
            info!("Server: fake");
        } else {
            info!("Server: {}", config.server_base_url);
        }
        let mut uploader = Uploader::new(&dev_id);
        spawn_worker(UPLOAD_WORKER, move || loop {
            let report = channels::wait_report(&REPORT_CHANNEL);
            // Failures are logged and counted by the uploader.
            let _ = uploader.upload(&mut server, &report);
        })?;
    }

    {
        let mut server = AnyServer::from_config(&config);
        let mut command_loop = CommandPollLoop::new(&dev_id);
        let period_ms = config.button_poll_interval_ms;
        spawn_worker(COMMAND_WORKER, move || {
            let mut sink = PushQueue::new(&PUSH_CHANNEL);
            loop {
                command_loop.poll(&mut server, &mut sink);
                FreeRtos::delay_ms(period_ms);
            }
        })?;
    }

    {
        let mut hal = AnyHal::from_config(&config, clock);
        let mut presser = ButtonPresser::new(config.button_pulse_ms);
        spawn_worker(PUSH_WORKER, move || {
            let mut delay = FreeRtos;
            loop {
                channels::wait_push(&PUSH_CHANNEL);
                presser.press(&mut hal, &mut delay);
            }
        })?;
    }

    info!("System ready. Supervising WiFi.");

    // ── 6. Main thread: connectivity supervision ──────────────
    loop {
        wifi.poll(clock.uptime_ms());
        FreeRtos::delay_ms(WIFI_POLL_MS);
    }
}
