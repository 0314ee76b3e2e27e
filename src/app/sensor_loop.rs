//! Sensor poll loop: debounce both door sensors and decide when to report.
//!
//! ```text
//!  DoorSensorPort ──▶ SensorChannel ×2 ──▶ SensorPollLoop ──▶ ReportSink
//! ```
//!
//! Report triggers, in priority order:
//!
//! | Trigger   | Condition                                         |
//! |-----------|---------------------------------------------------|
//! | Boot      | nothing has been handed off since boot            |
//! | Changed   | any channel accepted a new level this tick        |
//! | Heartbeat | `now - last_report > heartbeat_interval_ms`       |
//!
//! The heartbeat timer is only reset by a successful hand-off.  A report
//! rejected by a full queue is retried on every following tick, keeping its
//! original trigger, until the uploader frees the slot.

use log::{info, warn};

use crate::config::GarageConfig;
use crate::sensors::debounce::SensorChannel;
use crate::sensors::{DoorSensors, SensorId};

use super::events::{ReportReason, SensorReport};
use super::ports::{DoorSensorPort, ReportSink};

/// Result of one [`SensorPollLoop::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to report.
    Idle,
    /// A report was accepted by the sink.
    Reported(ReportReason),
    /// A report was due but the sink was full; it will be retried.
    Dropped(ReportReason),
}

pub struct SensorPollLoop {
    a: SensorChannel,
    b: SensorChannel,
    heartbeat_interval_ms: u32,
    last_report_ms: Option<u32>,
    /// Trigger of a report the sink rejected; retried until accepted.
    retry: Option<ReportReason>,
}

impl SensorPollLoop {
    pub fn new(debounce_ms: u32, heartbeat_interval_ms: u32) -> Self {
        Self {
            a: SensorChannel::new(debounce_ms),
            b: SensorChannel::new(debounce_ms),
            heartbeat_interval_ms,
            last_report_ms: None,
            retry: None,
        }
    }

    pub fn from_config(config: &GarageConfig) -> Self {
        Self::new(config.debounce_ms, config.heartbeat_interval_ms)
    }

    /// Run one sampling cycle at `now_ms`.
    pub fn tick(
        &mut self,
        hw: &mut impl DoorSensorPort,
        sink: &mut impl ReportSink,
        now_ms: u32,
    ) -> TickOutcome {
        let raw_a = hw.read_sensor(SensorId::A);
        let raw_b = hw.read_sensor(SensorId::B);
        let changed_a = self.a.observe(raw_a, now_ms);
        let changed_b = self.b.observe(raw_b, now_ms);

        let Some(reason) = self.due(changed_a || changed_b, now_ms) else {
            return TickOutcome::Idle;
        };

        let report = SensorReport {
            sensors: self.levels(),
            reason,
            at_ms: now_ms,
        };

        match sink.submit(report) {
            Ok(()) => {
                self.last_report_ms = Some(now_ms);
                self.retry = None;
                info!(
                    "Sensors: report ({:?}) A={} B={} door={:?}",
                    reason,
                    report.sensors.a.as_u8(),
                    report.sensors.b.as_u8(),
                    report.sensors.position()
                );
                TickOutcome::Reported(reason)
            }
            Err(e) => {
                if self.retry.is_none() {
                    warn!("Sensors: report ({:?}) not queued ({}), will retry", reason, e);
                }
                self.retry = Some(reason);
                TickOutcome::Dropped(reason)
            }
        }
    }

    fn due(&self, changed: bool, now_ms: u32) -> Option<ReportReason> {
        let Some(last) = self.last_report_ms else {
            return Some(ReportReason::Boot);
        };
        if changed {
            return Some(ReportReason::Changed);
        }
        if self.retry.is_some() {
            return self.retry;
        }
        (now_ms.wrapping_sub(last) > self.heartbeat_interval_ms).then_some(ReportReason::Heartbeat)
    }

    /// Latest debounced level of every channel.
    pub fn levels(&self) -> DoorSensors {
        DoorSensors {
            a: self.a.level(),
            b: self.b.level(),
        }
    }

    /// Uptime of the last successful hand-off.
    pub fn last_report_ms(&self) -> Option<u32> {
        self.last_report_ms
    }
}
