//! Hardware adapter: bridges the door GPIO to domain port traits.
//!
//! [`GarageHal`] reads the reed switches and drives the relay through
//! [`hw_init`](crate::drivers::hw_init).  [`AnyHal`] picks between it and
//! the simulated door once, at construction, so the loops stay generic
//! over a single concrete type.

use crate::app::ports::{ButtonPort, ClockPort, DoorSensorPort};
use crate::config::GarageConfig;
use crate::drivers::hw_init::{gpio_read, gpio_write};
use crate::pins;
use crate::sensors::{Level, SensorId};

use super::fake_hal::FakeHal;

/// Concrete adapter over the board's GPIO.
#[derive(Debug, Clone, Copy, Default)]
pub struct GarageHal;

impl GarageHal {
    pub fn new() -> Self {
        Self
    }

    fn pin(id: SensorId) -> i32 {
        match id {
            SensorId::A => pins::SENSOR_A_GPIO,
            SensorId::B => pins::SENSOR_B_GPIO,
        }
    }
}

impl DoorSensorPort for GarageHal {
    fn read_sensor(&mut self, id: SensorId) -> Level {
        Level::from(gpio_read(Self::pin(id)))
    }
}

impl ButtonPort for GarageHal {
    fn set_button(&mut self, level: Level) {
        gpio_write(pins::BUTTON_GPIO, level.is_high());
    }
}

// ── Construction-time selection ───────────────────────────────

/// Real or simulated HAL, chosen from [`GarageConfig::use_fake_hal`].
pub enum AnyHal<C: ClockPort> {
    Real(GarageHal),
    Fake(FakeHal<C>),
}

impl<C: ClockPort> AnyHal<C> {
    pub fn from_config(config: &GarageConfig, clock: C) -> Self {
        if config.use_fake_hal {
            Self::Fake(FakeHal::new(clock))
        } else {
            Self::Real(GarageHal::new())
        }
    }

    pub fn is_fake(&self) -> bool {
        matches!(self, Self::Fake(_))
    }
}

impl<C: ClockPort> DoorSensorPort for AnyHal<C> {
    fn read_sensor(&mut self, id: SensorId) -> Level {
        match self {
            Self::Real(hal) => hal.read_sensor(id),
            Self::Fake(hal) => hal.read_sensor(id),
        }
    }
}

impl<C: ClockPort> ButtonPort for AnyHal<C> {
    fn set_button(&mut self, level: Level) {
        match self {
            Self::Real(hal) => hal.set_button(level),
            Self::Fake(hal) => hal.set_button(level),
        }
    }
}
