//! Single-slot hand-off channels between the poll loops and their workers.
//!
//! Uses `embassy-sync` bounded channels of depth 1.  Producers never block:
//! `try_send` fails while the slot is occupied, which is exactly the
//! "one outstanding item" rule both hand-offs need.  Consumers are plain
//! threads that park on `receive()` through `futures_lite::future::block_on`.
//!
//! ```text
//! ┌──────────────┐ SensorReport ┌──────────────┐
//! │ Sensor loop  │─────────────▶│   Uploader   │
//! └──────────────┘              └──────────────┘
//! ┌──────────────┐ PushRequest  ┌──────────────┐
//! │ Command loop │─────────────▶│ Push worker  │
//! └──────────────┘              └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use futures_lite::future::block_on;

use crate::app::events::{PushRequest, SensorReport};
use crate::app::ports::{PushSink, ReportSink};
use crate::error::HandoffError;

/// Slot depth for both hand-offs.
const HANDOFF_DEPTH: usize = 1;

pub type ReportChannel = Channel<CriticalSectionRawMutex, SensorReport, HANDOFF_DEPTH>;
pub type PushChannel = Channel<CriticalSectionRawMutex, PushRequest, HANDOFF_DEPTH>;

/// Sensor loop → uploader.
pub static REPORT_CHANNEL: ReportChannel = Channel::new();

/// Command loop → push worker.
pub static PUSH_CHANNEL: PushChannel = Channel::new();

// ── Producer side ────────────────────────────────────────────

/// [`ReportSink`] backed by a report channel.
#[derive(Clone, Copy)]
pub struct ReportQueue<'a>(&'a ReportChannel);

impl<'a> ReportQueue<'a> {
    pub fn new(channel: &'a ReportChannel) -> Self {
        Self(channel)
    }
}

impl ReportSink for ReportQueue<'_> {
    fn submit(&mut self, report: SensorReport) -> Result<(), HandoffError> {
        self.0.try_send(report).map_err(|_| HandoffError::Full)
    }
}

/// [`PushSink`] backed by a push channel.
#[derive(Clone, Copy)]
pub struct PushQueue<'a>(&'a PushChannel);

impl<'a> PushQueue<'a> {
    pub fn new(channel: &'a PushChannel) -> Self {
        Self(channel)
    }
}

impl PushSink for PushQueue<'_> {
    fn request_push(&mut self) -> Result<(), HandoffError> {
        self.0.try_send(PushRequest).map_err(|_| HandoffError::Full)
    }
}

// ── Consumer side ────────────────────────────────────────────

/// Block the calling thread until a report is available.
pub fn wait_report(channel: &ReportChannel) -> SensorReport {
    block_on(channel.receive())
}

/// Block the calling thread until a push is requested.
pub fn wait_push(channel: &PushChannel) -> PushRequest {
    block_on(channel.receive())
}
