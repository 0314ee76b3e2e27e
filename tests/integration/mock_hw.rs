//! Mock adapters for integration tests.
//!
//! The door and button mocks record every call so tests can assert on the
//! full history without touching GPIO.  The server mock replays a script.

use std::collections::VecDeque;

use garage::app::button_token::ButtonToken;
use garage::app::ports::{ButtonPort, DoorSensorPort, GarageServerPort};
use garage::config::DeviceIdString;
use garage::error::CommsError;
use garage::sensors::{DoorSensors, Level, SensorId};

/// Id used by every integration test.
pub fn device_id() -> DeviceIdString {
    DeviceIdString::try_from("GD-1A2B3C").unwrap()
}

// ── Door ──────────────────────────────────────────────────────

/// Reed switches whose raw levels the test sets directly.
#[derive(Debug, Default)]
pub struct MockDoor {
    pub raw: DoorSensors,
    pub reads: usize,
}

#[allow(dead_code)]
impl MockDoor {
    pub fn new(a: Level, b: Level) -> Self {
        Self {
            raw: DoorSensors { a, b },
            reads: 0,
        }
    }

    pub fn set(&mut self, id: SensorId, level: Level) {
        match id {
            SensorId::A => self.raw.a = level,
            SensorId::B => self.raw.b = level,
        }
    }
}

impl DoorSensorPort for MockDoor {
    fn read_sensor(&mut self, id: SensorId) -> Level {
        self.reads += 1;
        self.raw.get(id)
    }
}

// ── Button ────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockButton {
    pub writes: Vec<Level>,
}

#[allow(dead_code)]
impl MockButton {
    /// Completed HIGH→LOW pulses.
    pub fn pulses(&self) -> usize {
        self.writes
            .windows(2)
            .filter(|w| w[0] == Level::High && w[1] == Level::Low)
            .count()
    }
}

impl ButtonPort for MockButton {
    fn set_button(&mut self, level: Level) {
        self.writes.push(level);
    }
}

// ── Server ────────────────────────────────────────────────────

/// What the device sent on one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerCall {
    Sensors { device_id: String, sensors: DoorSensors },
    Token { device_id: String, sent: Option<String> },
}

/// Replays scripted token replies; sensor uploads always succeed unless
/// `reject_sensors` is set.
#[derive(Debug, Default)]
pub struct MockServer {
    pub replies: VecDeque<Result<String, CommsError>>,
    pub calls: Vec<ServerCall>,
    pub reject_sensors: Option<CommsError>,
}

#[allow(dead_code)]
impl MockServer {
    pub fn with_tokens(tokens: &[&str]) -> Self {
        Self {
            replies: tokens.iter().map(|t| Ok((*t).to_string())).collect(),
            ..Self::default()
        }
    }

    pub fn push_reply(&mut self, reply: Result<&str, CommsError>) {
        self.replies.push_back(reply.map(str::to_string));
    }

    pub fn sensor_reports(&self) -> Vec<DoorSensors> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ServerCall::Sensors { sensors, .. } => Some(*sensors),
                ServerCall::Token { .. } => None,
            })
            .collect()
    }

    pub fn tokens_sent(&self) -> Vec<Option<String>> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ServerCall::Token { sent, .. } => Some(sent.clone()),
                ServerCall::Sensors { .. } => None,
            })
            .collect()
    }
}

impl GarageServerPort for MockServer {
    fn send_sensor_values(
        &mut self,
        device_id: &str,
        sensors: &DoorSensors,
    ) -> Result<(), CommsError> {
        self.calls.push(ServerCall::Sensors {
            device_id: device_id.to_string(),
            sensors: *sensors,
        });
        match self.reject_sensors {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn exchange_button_token(
        &mut self,
        device_id: &str,
        last: Option<&ButtonToken>,
    ) -> Result<ButtonToken, CommsError> {
        self.calls.push(ServerCall::Token {
            device_id: device_id.to_string(),
            sent: last.map(|t| t.as_str().to_string()),
        });
        let reply = self.replies.pop_front().unwrap_or(Err(CommsError::Transport))?;
        ButtonToken::new(&reply).map_err(|_| CommsError::EmptyToken)
    }
}
