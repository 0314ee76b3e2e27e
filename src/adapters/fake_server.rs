//! In-process stand-in for the garage server.
//!
//! Token exchanges return `button_token_{n / 2}` where `n` counts calls, so
//! every token is seen twice before it changes: the command loop arms on
//! the first, sees one unchanged poll, then pushes on each new value.
//! Sensor reports are accepted and remembered.

use std::time::Duration;

use log::info;

use crate::app::button_token::ButtonToken;
use crate::app::ports::GarageServerPort;
use crate::error::CommsError;
use crate::sensors::DoorSensors;

pub struct FakeGarageServer {
    exchanges: u64,
    latency: Duration,
    fail_next: u32,
    last_report: Option<DoorSensors>,
    last_seen_token: Option<ButtonToken>,
}

impl Default for FakeGarageServer {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl FakeGarageServer {
    /// `latency` is slept on every call to mimic a network round trip.
    pub fn new(latency: Duration) -> Self {
        Self {
            exchanges: 0,
            latency,
            fail_next: 0,
            last_report: None,
            last_seen_token: None,
        }
    }

    /// Make the next `n` calls (of either kind) fail.
    pub fn fail_next(&mut self, n: u32) {
        self.fail_next = n;
    }

    pub fn last_report(&self) -> Option<DoorSensors> {
        self.last_report
    }

    /// Token the device sent on its most recent exchange.
    pub fn last_seen_token(&self) -> Option<&ButtonToken> {
        self.last_seen_token.as_ref()
    }

    fn round_trip(&mut self) -> Result<(), CommsError> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(CommsError::Injected);
        }
        Ok(())
    }
}

impl GarageServerPort for FakeGarageServer {
    fn send_sensor_values(
        &mut self,
        device_id: &str,
        sensors: &DoorSensors,
    ) -> Result<(), CommsError> {
        self.round_trip()?;
        info!(
            "FakeServer: sensors from {} A={} B={}",
            device_id,
            sensors.a.as_u8(),
            sensors.b.as_u8()
        );
        self.last_report = Some(*sensors);
        Ok(())
    }

    fn exchange_button_token(
        &mut self,
        device_id: &str,
        last: Option<&ButtonToken>,
    ) -> Result<ButtonToken, CommsError> {
        self.round_trip()?;
        self.last_seen_token = last.cloned();

        let mut minted = heapless::String::<32>::new();
        let _ = core::fmt::write(
            &mut minted,
            format_args!("button_token_{}", self.exchanges / 2),
        );
        self.exchanges += 1;

        info!(
            "FakeServer: token exchange from {} (sent '{}'), replying '{}'",
            device_id,
            last.map_or("", ButtonToken::as_str),
            minted
        );
        ButtonToken::new(&minted).map_err(|_| CommsError::MalformedResponse)
    }
}
