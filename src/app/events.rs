//! Messages handed between the poll loops and their worker threads.

use crate::sensors::DoorSensors;

/// Why a sensor report was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportReason {
    /// At least one channel accepted a new level this tick.
    Changed,
    /// First report since boot.
    Boot,
    /// No report for longer than the heartbeat interval.
    Heartbeat,
}

/// Snapshot of every channel's stable level, ready for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReport {
    pub sensors: DoorSensors,
    pub reason: ReportReason,
    /// Uptime at which the report was produced.
    pub at_ms: u32,
}

/// "Pulse the button once."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushRequest;
