//! Door sensor model.
//!
//! Two reed switches bracket the door's travel.  Each reads LOW when its
//! magnet is present:
//!
//! | A    | B    | Position  |
//! |------|------|-----------|
//! | LOW  | HIGH | Closed    |
//! | HIGH | LOW  | Open      |
//! | HIGH | HIGH | Between   |
//! | LOW  | LOW  | Fault     |

pub mod debounce;

use serde::{Deserialize, Serialize};

/// Which of the two door sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorId {
    A,
    B,
}

/// A digital level as read from (or written to) a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Level {
    #[default]
    Low,
    High,
}

impl Level {
    /// Wire representation: 0 or 1.
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }

    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level.is_high()
    }
}

/// Debounced level of both sensors at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DoorSensors {
    pub a: Level,
    pub b: Level,
}

impl DoorSensors {
    pub fn get(&self, id: SensorId) -> Level {
        match id {
            SensorId::A => self.a,
            SensorId::B => self.b,
        }
    }

    pub fn position(&self) -> DoorPosition {
        DoorPosition::from_sensors(self.a, self.b)
    }
}

/// Human-readable interpretation of the two sensors (log output only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorPosition {
    Closed,
    Open,
    Between,
    /// Both switches report their magnet; wiring or mounting problem.
    Fault,
}

impl DoorPosition {
    pub fn from_sensors(a: Level, b: Level) -> Self {
        match (a, b) {
            (Level::Low, Level::High) => Self::Closed,
            (Level::High, Level::Low) => Self::Open,
            (Level::High, Level::High) => Self::Between,
            (Level::Low, Level::Low) => Self::Fault,
        }
    }
}
