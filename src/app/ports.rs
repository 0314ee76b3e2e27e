//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ poll loops (domain)
//! ```
//!
//! Driven adapters (GPIO, HTTP, channels, clock) implement these traits.
//! The poll loops consume them via generics, so the domain core never
//! touches hardware or the network directly.  Each port has a real and a
//! fake adapter; which one is used is decided once, at construction.

use crate::app::button_token::ButtonToken;
use crate::app::events::SensorReport;
use crate::error::{CommsError, HandoffError};
use crate::sensors::{DoorSensors, Level, SensorId};

// ───────────────────────────────────────────────────────────────
// Door sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the two reed switches.
pub trait DoorSensorPort {
    /// Instantaneous raw level.  Must be cheap and side-effect free; it is
    /// called at the sensor poll rate.
    fn read_sensor(&mut self, id: SensorId) -> Level;
}

// ───────────────────────────────────────────────────────────────
// Button port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the opener relay.
pub trait ButtonPort {
    fn set_button(&mut self, level: Level);
}

// ───────────────────────────────────────────────────────────────
// Garage server port (driven adapter: domain ↔ remote service)
// ───────────────────────────────────────────────────────────────

/// Request/response exchanges with the garage server.
///
/// Any `Err` means "nothing observed this cycle"; callers never retry
/// inside one cycle.
pub trait GarageServerPort {
    /// Report the current debounced sensor levels.
    fn send_sensor_values(
        &mut self,
        device_id: &str,
        sensors: &DoorSensors,
    ) -> Result<(), CommsError>;

    /// Send the last consumed token (none before the first exchange) and
    /// return the token the server currently holds.
    fn exchange_button_token(
        &mut self,
        device_id: &str,
        last: Option<&ButtonToken>,
    ) -> Result<ButtonToken, CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Hand-off ports (domain → worker threads)
// ───────────────────────────────────────────────────────────────

/// Outbound queue for sensor reports.
pub trait ReportSink {
    /// Non-blocking.  `Err(Full)` if the previous report is still queued.
    fn submit(&mut self, report: SensorReport) -> Result<(), HandoffError>;
}

/// Outbound queue for button pushes.
pub trait PushSink {
    /// Non-blocking.  `Err(Full)` while a push is still pending, in which
    /// case this request collapses into it.
    fn request_push(&mut self) -> Result<(), HandoffError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond uptime, truncated to `u32` (wraps after ~49 days).
pub trait ClockPort {
    fn uptime_ms(&self) -> u32;
}
