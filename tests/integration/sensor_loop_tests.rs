//! Sensor poll loop driven through the real report channel.

use garage::app::events::ReportReason;
use garage::app::sensor_loop::{SensorPollLoop, TickOutcome};
use garage::channels::{self, ReportChannel, ReportQueue};
use garage::sensors::{DoorPosition, DoorSensors, Level, SensorId};

use super::mock_hw::MockDoor;

const POLL_MS: u32 = 10;
const DEBOUNCE_MS: u32 = 50;

/// Tick every `POLL_MS` from `from` to `to` inclusive, collecting outcomes
/// that were not idle.
fn run(
    lp: &mut SensorPollLoop,
    door: &mut MockDoor,
    q: &mut ReportQueue<'_>,
    from: u32,
    to: u32,
) -> Vec<(u32, TickOutcome)> {
    (from..=to)
        .step_by(POLL_MS as usize)
        .map(|t| (t, lp.tick(door, q, t)))
        .filter(|(_, o)| *o != TickOutcome::Idle)
        .collect()
}

#[test]
fn quiet_door_sends_exactly_one_heartbeat_per_interval() {
    let ch = ReportChannel::new();
    let mut q = ReportQueue::new(&ch);
    let mut lp = SensorPollLoop::new(DEBOUNCE_MS, 1_000);
    let mut door = MockDoor::new(Level::Low, Level::High);

    assert_eq!(
        lp.tick(&mut door, &mut q, 0),
        TickOutcome::Reported(ReportReason::Boot)
    );
    channels::wait_report(&ch);

    // 1000 ms elapsed is not yet "more than" the interval; 1010 is.
    let reported = run(&mut lp, &mut door, &mut q, POLL_MS, 1_500);
    assert_eq!(reported, vec![(1_010, TickOutcome::Reported(ReportReason::Heartbeat))]);

    let report = channels::wait_report(&ch);
    assert_eq!(report.reason, ReportReason::Heartbeat);
    assert_eq!(report.at_ms, 1_010);
    assert_eq!(report.sensors.position(), DoorPosition::Closed);
}

#[test]
fn door_opening_reports_once_after_debounce() {
    let ch = ReportChannel::new();
    let mut q = ReportQueue::new(&ch);
    let mut lp = SensorPollLoop::new(DEBOUNCE_MS, 600_000);
    let mut door = MockDoor::new(Level::Low, Level::High);

    lp.tick(&mut door, &mut q, 0);
    channels::wait_report(&ch);

    // Closed switch releases, open switch makes contact.
    door.set(SensorId::A, Level::High);
    door.set(SensorId::B, Level::Low);
    let reported = run(&mut lp, &mut door, &mut q, 100, 400);
    assert_eq!(reported, vec![(150, TickOutcome::Reported(ReportReason::Changed))]);

    let report = channels::wait_report(&ch);
    assert_eq!(report.sensors, DoorSensors { a: Level::High, b: Level::Low });
    assert_eq!(report.sensors.position(), DoorPosition::Open);
}

#[test]
fn bounce_shorter_than_threshold_is_ignored() {
    let ch = ReportChannel::new();
    let mut q = ReportQueue::new(&ch);
    let mut lp = SensorPollLoop::new(DEBOUNCE_MS, 600_000);
    let mut door = MockDoor::new(Level::Low, Level::High);

    lp.tick(&mut door, &mut q, 0);
    channels::wait_report(&ch);

    // 30 ms glitch on A, then back.
    door.set(SensorId::A, Level::High);
    assert!(run(&mut lp, &mut door, &mut q, 10, 40).is_empty());
    door.set(SensorId::A, Level::Low);
    assert!(run(&mut lp, &mut door, &mut q, 50, 500).is_empty());
    assert_eq!(lp.levels().a, Level::Low);
}

#[test]
fn report_waits_for_uploader_to_drain_slot() {
    let ch = ReportChannel::new();
    let mut q = ReportQueue::new(&ch);
    let mut lp = SensorPollLoop::new(0, 600_000);
    let mut door = MockDoor::new(Level::Low, Level::High);

    lp.tick(&mut door, &mut q, 0);

    // Slot still holds the boot report, so this change cannot be queued.
    door.set(SensorId::A, Level::High);
    assert_eq!(
        lp.tick(&mut door, &mut q, 10),
        TickOutcome::Dropped(ReportReason::Changed)
    );

    assert_eq!(channels::wait_report(&ch).at_ms, 0);

    // Retried on the next tick with the same trigger and the new level.
    assert_eq!(
        lp.tick(&mut door, &mut q, 20),
        TickOutcome::Reported(ReportReason::Changed)
    );
    let report = channels::wait_report(&ch);
    assert_eq!(report.sensors.a, Level::High);
    assert_eq!(report.at_ms, 20);
    assert_eq!(lp.tick(&mut door, &mut q, 30), TickOutcome::Idle);
}

#[test]
fn reads_both_sensors_every_tick() {
    let ch = ReportChannel::new();
    let mut q = ReportQueue::new(&ch);
    let mut lp = SensorPollLoop::new(DEBOUNCE_MS, 600_000);
    let mut door = MockDoor::default();

    for t in (0..100).step_by(POLL_MS as usize) {
        lp.tick(&mut door, &mut q, t);
    }
    assert_eq!(door.reads, 20);
}
