//! Simulated door for bench runs without the reed switches wired up.
//!
//! Each sensor flips on its own period (13 s and 37 s, coprime so all four
//! combinations appear).  Button writes are logged and recorded.

use log::info;

use crate::app::ports::{ButtonPort, ClockPort, DoorSensorPort};
use crate::sensors::{Level, SensorId};

pub const SENSOR_A_PERIOD_MS: u32 = 13_000;
pub const SENSOR_B_PERIOD_MS: u32 = 37_000;

pub struct FakeHal<C: ClockPort> {
    clock: C,
    button: Level,
    button_writes: u32,
}

impl<C: ClockPort> FakeHal<C> {
    pub fn new(clock: C) -> Self {
        info!("FakeHal: simulated door (A every {}s, B every {}s)",
            SENSOR_A_PERIOD_MS / 1000, SENSOR_B_PERIOD_MS / 1000);
        Self {
            clock,
            button: Level::Low,
            button_writes: 0,
        }
    }

    /// Level a sensor reports at `now_ms`.
    pub fn level_at(id: SensorId, now_ms: u32) -> Level {
        let period = match id {
            SensorId::A => SENSOR_A_PERIOD_MS,
            SensorId::B => SENSOR_B_PERIOD_MS,
        };
        Level::from((now_ms / period) % 2 == 1)
    }

    pub fn button(&self) -> Level {
        self.button
    }

    pub fn button_writes(&self) -> u32 {
        self.button_writes
    }
}

impl<C: ClockPort> DoorSensorPort for FakeHal<C> {
    fn read_sensor(&mut self, id: SensorId) -> Level {
        Self::level_at(id, self.clock.uptime_ms())
    }
}

impl<C: ClockPort> ButtonPort for FakeHal<C> {
    fn set_button(&mut self, level: Level) {
        info!("FakeHal: button -> {}", level.as_u8());
        self.button = level;
        self.button_writes = self.button_writes.wrapping_add(1);
    }
}
