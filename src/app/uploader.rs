//! Uploader: drains sensor reports to the garage server.
//!
//! A failed upload is logged and dropped.  The sensor loop will produce a
//! fresher report on the next change or heartbeat, so nothing is queued
//! for retry here.

use log::{info, warn};

use crate::config::DeviceIdString;
use crate::error::CommsError;

use super::events::SensorReport;
use super::ports::GarageServerPort;

pub struct Uploader {
    device_id: DeviceIdString,
    sent: u32,
    failed: u32,
}

impl Uploader {
    pub fn new(device_id: &DeviceIdString) -> Self {
        Self {
            device_id: device_id.clone(),
            sent: 0,
            failed: 0,
        }
    }

    pub fn upload(
        &mut self,
        server: &mut impl GarageServerPort,
        report: &SensorReport,
    ) -> Result<(), CommsError> {
        match server.send_sensor_values(&self.device_id, &report.sensors) {
            Ok(()) => {
                self.sent = self.sent.wrapping_add(1);
                info!(
                    "Upload: sensors A={} B={} ({:?}) sent",
                    report.sensors.a.as_u8(),
                    report.sensors.b.as_u8(),
                    report.reason
                );
                Ok(())
            }
            Err(e) => {
                self.failed = self.failed.wrapping_add(1);
                warn!("Upload: failed ({}), dropping report from t={}ms", e, report.at_ms);
                Err(e)
            }
        }
    }

    /// (sent, failed) counters since boot.
    pub fn stats(&self) -> (u32, u32) {
        (self.sent, self.failed)
    }
}
