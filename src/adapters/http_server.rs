//! HTTPS client for the garage server (ESP-IDF only).
//!
//! Opens a fresh `EspHttpConnection` per exchange.  TLS uses the ESP-IDF
//! certificate bundle; the receive buffer is fixed at
//! [`RECEIVE_BUFFER_LEN`] bytes.

use std::time::Duration;

use embedded_svc::http::client::Client;
use embedded_svc::http::Status;
use embedded_svc::io::{Read, Write};
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
use log::{debug, warn};

use crate::app::button_token::ButtonToken;
use crate::app::ports::GarageServerPort;
use crate::config::GarageConfig;
use crate::error::CommsError;
use crate::protocol::{self, ButtonRequest, SensorRequest, RECEIVE_BUFFER_LEN};
use crate::sensors::DoorSensors;

pub struct HttpGarageServer {
    base_url: heapless::String<128>,
    sensor_endpoint: heapless::String<64>,
    button_endpoint: heapless::String<64>,
    timeout: Duration,
    rx: [u8; RECEIVE_BUFFER_LEN],
}

impl HttpGarageServer {
    pub fn from_config(config: &GarageConfig) -> Self {
        Self {
            base_url: config.server_base_url.clone(),
            sensor_endpoint: config.sensor_values_endpoint.clone(),
            button_endpoint: config.button_token_endpoint.clone(),
            timeout: Duration::from_millis(u64::from(config.http_timeout_ms)),
            rx: [0u8; RECEIVE_BUFFER_LEN],
        }
    }

    /// POST `body` to `url`; on 200, returns the number of body bytes
    /// read into `self.rx`.
    fn post(&mut self, url: &str, body: &[u8]) -> Result<usize, CommsError> {
        debug!("HTTP: POST {}", url);

        let config = Configuration {
            timeout: Some(self.timeout),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        };
        let conn = EspHttpConnection::new(&config).map_err(|e| {
            warn!("HTTP: connection setup failed: {:?}", e);
            CommsError::Transport
        })?;
        let mut client = Client::wrap(conn);

        let content_length = body.len().to_string();
        let headers = [
            ("Content-Type", "application/json"),
            ("Content-Length", content_length.as_str()),
        ];

        let mut request = client.post(url, &headers).map_err(|e| {
            warn!("HTTP: request open failed: {:?}", e);
            CommsError::Transport
        })?;
        request.write_all(body).map_err(|_| CommsError::Transport)?;
        request.flush().map_err(|_| CommsError::Transport)?;

        let mut response = request.submit().map_err(|e| {
            warn!("HTTP: submit failed: {:?}", e);
            CommsError::Transport
        })?;

        let status = response.status();
        if status != 200 {
            return Err(CommsError::HttpStatus(status));
        }

        let mut total = 0;
        while total < self.rx.len() {
            let n = response
                .read(&mut self.rx[total..])
                .map_err(|_| CommsError::Transport)?;
            if n == 0 {
                return Ok(total);
            }
            total += n;
        }

        // Buffer full: only acceptable if the body ends exactly here.
        let mut probe = [0u8; 1];
        match response.read(&mut probe) {
            Ok(0) => Ok(total),
            Ok(_) => Err(CommsError::ResponseTooLarge),
            Err(_) => Err(CommsError::Transport),
        }
    }
}

impl GarageServerPort for HttpGarageServer {
    fn send_sensor_values(
        &mut self,
        device_id: &str,
        sensors: &DoorSensors,
    ) -> Result<(), CommsError> {
        let req = SensorRequest::new(device_id, sensors);
        let url = req.url(&self.base_url, &self.sensor_endpoint)?;
        let body = req.body()?;
        // Response body is an echo of the request; only the status matters.
        self.post(&url, &body).map(|_| ())
    }

    fn exchange_button_token(
        &mut self,
        device_id: &str,
        last: Option<&ButtonToken>,
    ) -> Result<ButtonToken, CommsError> {
        let req = ButtonRequest::new(device_id, last);
        let url = req.url(&self.base_url, &self.button_endpoint)?;
        let body = req.body()?;
        let n = self.post(&url, &body)?;
        protocol::parse_button_response(&self.rx[..n])
    }
}
