//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`], the boundary for network connectivity.
//! The poll loops never look at WiFi state: while the link is down their
//! exchanges simply fail and are retried on the next period.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `BlockingWifi<EspWifi>` from `esp_idf_svc`.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## Reconnection policy
//!
//! Once the link is lost, [`ConnectivityPort::poll`] starts a wait and
//! retries when it runs out.  Each failed retry doubles the next wait
//! (2 s, 4 s, 8 s, capped at 60 s).

use core::fmt;
use log::{error, info, warn};

#[cfg(target_os = "espidf")]
use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    /// `connect` before any SSID was set.
    MissingCredentials,
    BadSsid,
    BadPassword,
    /// Driver refused a step of association or DHCP.
    AssociationFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::MissingCredentials => "SSID not set",
            Self::BadSsid => "SSID must be 1-32 printable ASCII characters",
            Self::BadPassword => "password must be empty (open) or 8-64 bytes",
            Self::AssociationFailed => "could not join the access point",
        };
        f.write_str(msg)
    }
}

/// Station-mode link owned by the main thread.
pub trait ConnectivityPort {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
    /// Join the configured AP.  A no-op while already connected.
    fn connect(&mut self) -> Result<(), ConnectivityError>;
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
    /// Supervise the link; call periodically with the current uptime.
    fn poll(&mut self, now_ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connected,
    Reconnecting { attempt: u32 },
}

const INITIAL_BACKOFF_MS: u32 = 2_000;
const MAX_BACKOFF_MS: u32 = 60_000;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn check_credentials(ssid: &str, password: &str) -> Result<(), ConnectivityError> {
    let printable = ssid.bytes().all(|b| b == b' ' || b.is_ascii_graphic());
    if !(1..=32).contains(&ssid.len()) || !printable {
        return Err(ConnectivityError::BadSsid);
    }
    if !password.is_empty() && !(8..=64).contains(&password.len()) {
        return Err(ConnectivityError::BadPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    backoff_ms: u32,
    wait_started_ms: Option<u32>,
    #[cfg(target_os = "espidf")]
    driver: BlockingWifi<EspWifi<'static>>,
    /// Simulation: number of upcoming connect attempts that fail.
    #[cfg(not(target_os = "espidf"))]
    sim_failures: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_link_up: bool,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(driver: BlockingWifi<EspWifi<'static>>) -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            backoff_ms: INITIAL_BACKOFF_MS,
            wait_started_ms: None,
            driver,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            backoff_ms: INITIAL_BACKOFF_MS,
            wait_started_ms: None,
            sim_failures: 0,
            sim_link_up: false,
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    /// Wait before the next reconnect attempt.
    pub fn backoff_ms(&self) -> u32 {
        self.backoff_ms
    }

    /// Simulation: fail the next `n` connect attempts.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next(&mut self, n: u32) {
        self.sim_failures = n;
    }

    /// Simulation: drop the link as if the AP went away.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_drop_link(&mut self) {
        self.sim_link_up = false;
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPAWPA2Personal
        };
        let config = Configuration::Client(ClientConfiguration {
            ssid: self.ssid.as_str().try_into().map_err(|_| ConnectivityError::BadSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::BadPassword)?,
            auth_method,
            ..Default::default()
        });

        let fail = |stage: &str, e: esp_idf_svc::sys::EspError| {
            warn!("WiFi: {} failed: {}", stage, e);
            ConnectivityError::AssociationFailed
        };

        self.driver
            .set_configuration(&config)
            .map_err(|e| fail("set_configuration", e))?;
        if !self.driver.is_started().unwrap_or(false) {
            self.driver.start().map_err(|e| fail("start", e))?;
        }
        self.driver.connect().map_err(|e| fail("connect", e))?;
        self.driver.wait_netif_up().map_err(|e| fail("netif up", e))?;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        if self.sim_failures > 0 {
            self.sim_failures -= 1;
            warn!("WiFi(sim): injected association failure");
            return Err(ConnectivityError::AssociationFailed);
        }
        self.sim_link_up = true;
        info!("WiFi(sim): associated with '{}'", self.ssid);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        if let Err(e) = self.driver.disconnect() {
            warn!("WiFi: disconnect failed: {}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        self.sim_link_up = false;
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.driver.is_connected().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.sim_link_up
    }

    /// Starts the wait on the first call after the link is lost.
    fn retry_due(&mut self, now_ms: u32) -> bool {
        match self.wait_started_ms {
            Some(at) => now_ms.wrapping_sub(at) >= self.backoff_ms,
            None => {
                self.wait_started_ms = Some(now_ms);
                false
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        check_credentials(ssid, password)?;
        self.ssid = heapless::String::try_from(ssid).map_err(|_| ConnectivityError::BadSsid)?;
        self.password =
            heapless::String::try_from(password).map_err(|_| ConnectivityError::BadPassword)?;
        info!("WiFi: station SSID set to '{}'", self.ssid);
        Ok(())
    }

    fn connect(&mut self) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::MissingCredentials);
        }
        if self.state == WifiState::Connected {
            return Ok(());
        }

        info!("WiFi: joining '{}'", self.ssid);
        match self.platform_connect() {
            Ok(()) => {
                self.state = WifiState::Connected;
                self.backoff_ms = INITIAL_BACKOFF_MS;
                info!("WiFi: connected");
                Ok(())
            }
            Err(e) => {
                error!("WiFi: connection failed: {}", e);
                self.state = WifiState::Reconnecting { attempt: 0 };
                self.wait_started_ms = None;
                Err(e)
            }
        }
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        self.state = WifiState::Disconnected;
        self.wait_started_ms = None;
        info!("WiFi: left '{}'", self.ssid);
    }

    fn is_connected(&self) -> bool {
        self.state == WifiState::Connected && self.platform_is_connected()
    }

    fn poll(&mut self, now_ms: u32) {
        match { self.state } {
            WifiState::Reconnecting { attempt } if self.retry_due(now_ms) => {
                info!("WiFi: reconnect attempt {} (after {}ms)", attempt + 1, self.backoff_ms);
                self.wait_started_ms = Some(now_ms);
                match self.platform_connect() {
                    Ok(()) => {
                        self.state = WifiState::Connected;
                        self.backoff_ms = INITIAL_BACKOFF_MS;
                        info!("WiFi: reconnected");
                    }
                    Err(_) => {
                        self.backoff_ms = self.backoff_ms.saturating_mul(2).min(MAX_BACKOFF_MS);
                        self.state = WifiState::Reconnecting { attempt: attempt + 1 };
                    }
                }
            }
            WifiState::Connected if !self.platform_is_connected() => {
                warn!("WiFi: link to '{}' dropped", self.ssid);
                self.state = WifiState::Reconnecting { attempt: 0 };
                self.backoff_ms = INITIAL_BACKOFF_MS;
                self.wait_started_ms = Some(now_ms);
            }
            _ => {}
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
