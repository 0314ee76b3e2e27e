//! Construction-time choice between the real and the fake garage server.

use std::time::Duration;

use crate::app::button_token::ButtonToken;
use crate::app::ports::GarageServerPort;
use crate::config::GarageConfig;
use crate::error::CommsError;
use crate::sensors::DoorSensors;

use super::fake_server::FakeGarageServer;
#[cfg(target_os = "espidf")]
use super::http_server::HttpGarageServer;

/// Simulated round trip for the fake server outside tests.
const FAKE_LATENCY: Duration = Duration::from_millis(1000);

pub enum AnyServer {
    #[cfg(target_os = "espidf")]
    Http(HttpGarageServer),
    Fake(FakeGarageServer),
}

impl AnyServer {
    /// Real HTTP client unless [`GarageConfig::use_fake_server`] is set.
    /// Host builds have no HTTP stack and always get the fake.
    pub fn from_config(config: &GarageConfig) -> Self {
        #[cfg(target_os = "espidf")]
        if !config.use_fake_server {
            return Self::Http(HttpGarageServer::from_config(config));
        }
        #[cfg(not(target_os = "espidf"))]
        if !config.use_fake_server {
            log::warn!("Server(sim): no HTTP stack on host, using fake server");
        }
        Self::Fake(FakeGarageServer::new(FAKE_LATENCY))
    }

    pub fn is_fake(&self) -> bool {
        matches!(self, Self::Fake(_))
    }
}

impl GarageServerPort for AnyServer {
    fn send_sensor_values(
        &mut self,
        device_id: &str,
        sensors: &DoorSensors,
    ) -> Result<(), CommsError> {
        match self {
            #[cfg(target_os = "espidf")]
            Self::Http(s) => s.send_sensor_values(device_id, sensors),
            Self::Fake(s) => s.send_sensor_values(device_id, sensors),
        }
    }

    fn exchange_button_token(
        &mut self,
        device_id: &str,
        last: Option<&ButtonToken>,
    ) -> Result<ButtonToken, CommsError> {
        match self {
            #[cfg(target_os = "espidf")]
            Self::Http(s) => s.exchange_button_token(device_id, last),
            Self::Fake(s) => s.exchange_button_token(device_id, last),
        }
    }
}
