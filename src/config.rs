//! System configuration parameters
//!
//! All tunable parameters for the garage controller.  Defaults match the
//! deployed board; site-specific values (server URL, WiFi credentials,
//! device id, fake adapters) are overlaid from build-time environment
//! variables by [`GarageConfig::from_build_env`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest device id, configured or MAC-derived.
pub const MAX_DEVICE_ID_LEN: usize = 64;
/// Longest server base URL.
pub const MAX_BASE_URL_LEN: usize = 128;
/// Longest endpoint path.
pub const MAX_ENDPOINT_LEN: usize = 64;

/// Device id as sent to the server.
pub type DeviceIdString = heapless::String<MAX_DEVICE_ID_LEN>;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarageConfig {
    // --- Identity ---
    /// Reported device id.  Empty = derive from the factory MAC.
    pub device_id: DeviceIdString,

    // --- Server ---
    /// Scheme + host (+ optional port), no trailing slash.
    pub server_base_url: heapless::String<MAX_BASE_URL_LEN>,
    /// Path for sensor reports.
    pub sensor_values_endpoint: heapless::String<MAX_ENDPOINT_LEN>,
    /// Path for the button-token exchange.
    pub button_token_endpoint: heapless::String<MAX_ENDPOINT_LEN>,
    /// Per-request HTTP timeout (milliseconds)
    pub http_timeout_ms: u32,

    // --- Sensors ---
    /// Time a new raw level must persist before it is accepted (milliseconds)
    pub debounce_ms: u32,
    /// Sensor sampling period (milliseconds)
    pub sensor_poll_interval_ms: u32,
    /// Report at least this often even without a change (milliseconds)
    pub heartbeat_interval_ms: u32,

    // --- Button ---
    /// Token exchange period (milliseconds)
    pub button_poll_interval_ms: u32,
    /// How long the relay is held closed per push (milliseconds)
    pub button_pulse_ms: u32,

    // --- Adapters ---
    /// Drive the simulated door instead of GPIO.
    pub use_fake_hal: bool,
    /// Answer exchanges locally instead of over HTTP.
    pub use_fake_server: bool,

    // --- WiFi ---
    pub wifi_ssid: heapless::String<32>,
    pub wifi_password: heapless::String<64>,
}

impl Default for GarageConfig {
    fn default() -> Self {
        Self {
            device_id: heapless::String::new(),

            server_base_url: heapless::String::new(),
            sensor_values_endpoint: fixed("/sensor_values"),
            button_token_endpoint: fixed("/button_token"),
            http_timeout_ms: 10_000,

            debounce_ms: 50,
            sensor_poll_interval_ms: 10,       // 100 Hz
            heartbeat_interval_ms: 600_000,    // 10 min
            button_poll_interval_ms: 5_000,    // 0.2 Hz
            button_pulse_ms: 1_000,

            use_fake_hal: false,
            use_fake_server: false,

            wifi_ssid: heapless::String::new(),
            wifi_password: heapless::String::new(),
        }
    }
}

impl GarageConfig {
    /// Defaults overlaid with the `GARAGE_*` variables present at build time.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Some(v) = option_env!("GARAGE_SERVER_BASE_URL") {
            cfg.server_base_url = copy_str(v.trim_end_matches('/'), "server_base_url")?;
        }
        if let Some(v) = option_env!("GARAGE_DEVICE_ID") {
            cfg.device_id = copy_str(v, "device_id")?;
        }
        if let Some(v) = option_env!("GARAGE_WIFI_SSID") {
            cfg.wifi_ssid = copy_str(v, "wifi_ssid")?;
        }
        if let Some(v) = option_env!("GARAGE_WIFI_PASSWORD") {
            cfg.wifi_password = copy_str(v, "wifi_password")?;
        }
        if let Some(v) = option_env!("GARAGE_FAKE_HAL") {
            cfg.use_fake_hal = is_truthy(v);
        }
        if let Some(v) = option_env!("GARAGE_FAKE_SERVER") {
            cfg.use_fake_server = is_truthy(v);
        }
        Ok(cfg)
    }

    /// Reject configurations the loops cannot run with.
    ///
    /// A zero debounce threshold is valid: every change is accepted on
    /// the first sample.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensor_poll_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("sensor_poll_interval_ms"));
        }
        if self.button_poll_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("button_poll_interval_ms"));
        }
        if self.button_pulse_ms == 0 {
            return Err(ConfigError::ZeroInterval("button_pulse_ms"));
        }
        if self.heartbeat_interval_ms < self.sensor_poll_interval_ms {
            return Err(ConfigError::HeartbeatTooShort);
        }
        if !self.use_fake_server && self.server_base_url.is_empty() {
            return Err(ConfigError::MissingServerUrl);
        }
        Ok(())
    }
}

fn copy_str<const N: usize>(
    value: &str,
    field: &'static str,
) -> Result<heapless::String<N>, ConfigError> {
    let mut out = heapless::String::new();
    out.push_str(value).map_err(|_| ConfigError::ValueTooLong(field))?;
    Ok(out)
}

fn fixed<const N: usize>(value: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    let _ = out.push_str(value);
    out
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes" | "on" | "y")
}
