//! Whole-system runs: loops, channels, workers and adapters together.

use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use garage::adapters::fake_server::FakeGarageServer;
use garage::adapters::hardware::GarageHal;
use garage::app::command_loop::{CommandPollLoop, PollOutcome};
use garage::app::events::ReportReason;
use garage::app::ports::{ButtonPort, DoorSensorPort, GarageServerPort};
use garage::app::sensor_loop::SensorPollLoop;
use garage::app::uploader::Uploader;
use garage::channels::{self, PushChannel, PushQueue, ReportChannel, ReportQueue};
use garage::drivers::door_button::ButtonPresser;
use garage::drivers::hw_init;
use garage::error::CommsError;
use garage::pins;
use garage::sensors::{DoorSensors, Level, SensorId};

use super::mock_hw::{device_id, MockButton, MockDoor, MockServer};

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

#[test]
fn fake_server_drives_one_press_per_new_token() {
    let ch = PushChannel::new();
    let mut q = PushQueue::new(&ch);
    let mut lp = CommandPollLoop::new(&device_id());
    let mut srv = FakeGarageServer::default();
    let mut presser = ButtonPresser::new(1000);
    let mut button = MockButton::default();

    // Tokens go 0,0,1,1,2,2: armed, then a new token every other poll.
    for _ in 0..6 {
        lp.poll(&mut srv, &mut q);
        if ch.try_receive().is_ok() {
            presser.press(&mut button, &mut NoDelay);
        }
    }

    assert_eq!(button.pulses(), 2);
    assert_eq!(presser.presses(), 2);
    assert_eq!(
        srv.last_seen_token().map(|t| t.as_str()),
        Some("button_token_2")
    );
}

#[test]
fn push_worker_pulses_button_from_another_thread() {
    static CH: PushChannel = PushChannel::new();

    let worker = thread::spawn(|| {
        let mut presser = ButtonPresser::new(5);
        let mut button = MockButton::default();
        for _ in 0..2 {
            channels::wait_push(&CH);
            presser.press(&mut button, &mut NoDelay);
        }
        button
    });

    let mut lp = CommandPollLoop::new(&device_id());
    let mut srv = MockServer::with_tokens(&["a", "b", "c"]);
    let mut q = PushQueue::new(&CH);
    assert_eq!(lp.poll(&mut srv, &mut q), PollOutcome::Armed);
    assert_eq!(lp.poll(&mut srv, &mut q), PollOutcome::PushRequested);
    while !CH.is_empty() {
        thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(lp.poll(&mut srv, &mut q), PollOutcome::PushRequested);

    let button = worker.join().unwrap();
    assert_eq!(button.writes, vec![Level::High, Level::Low, Level::High, Level::Low]);
}

#[test]
fn reports_flow_from_sensors_to_server() {
    let ch = ReportChannel::new();
    let mut q = ReportQueue::new(&ch);
    let mut lp = SensorPollLoop::new(50, 1_000);
    let mut door = MockDoor::new(Level::Low, Level::High);
    let mut uploader = Uploader::new(&device_id());
    let mut srv = MockServer::default();

    let mut drain = |srv: &mut MockServer| {
        if let Ok(report) = ch.try_receive() {
            let _ = uploader.upload(srv, &report);
            Some(report.reason)
        } else {
            None
        }
    };

    let mut reasons = Vec::new();
    for t in (0..=1_200).step_by(10) {
        if t == 300 {
            door.set(SensorId::A, Level::High);
        }
        lp.tick(&mut door, &mut q, t);
        reasons.extend(drain(&mut srv));
    }

    assert_eq!(
        reasons,
        vec![ReportReason::Boot, ReportReason::Changed]
    );
    assert_eq!(
        srv.sensor_reports(),
        vec![
            DoorSensors { a: Level::Low, b: Level::High },
            DoorSensors { a: Level::High, b: Level::High },
        ]
    );
}

#[test]
fn failed_upload_is_dropped_not_requeued() {
    let ch = ReportChannel::new();
    let mut q = ReportQueue::new(&ch);
    let mut lp = SensorPollLoop::new(50, 100);
    let mut door = MockDoor::default();
    let mut uploader = Uploader::new(&device_id());
    let mut srv = MockServer {
        reject_sensors: Some(CommsError::HttpStatus(500)),
        ..MockServer::default()
    };

    lp.tick(&mut door, &mut q, 0);
    let report = channels::wait_report(&ch);
    assert!(uploader.upload(&mut srv, &report).is_err());
    assert!(ch.is_empty());

    // Next report is the heartbeat, not a replay of the failed one.
    srv.reject_sensors = None;
    lp.tick(&mut door, &mut q, 101);
    let report = channels::wait_report(&ch);
    assert_eq!(report.reason, ReportReason::Heartbeat);
    assert!(uploader.upload(&mut srv, &report).is_ok());
    assert_eq!(uploader.stats(), (1, 1));
}

/// Only test touching the simulated GPIO bank.
#[test]
fn gpio_hal_reads_pins_and_drives_relay() {
    hw_init::init_gpio().unwrap();
    let mut hal = GarageHal::new();

    // Inputs idle HIGH through the pull-ups.
    assert_eq!(hal.read_sensor(SensorId::A), Level::High);
    assert_eq!(hal.read_sensor(SensorId::B), Level::High);

    hw_init::sim::set(pins::SENSOR_A_GPIO, false);
    assert_eq!(hal.read_sensor(SensorId::A), Level::Low);

    assert!(!hw_init::sim::level(pins::BUTTON_GPIO));
    hal.set_button(Level::High);
    assert!(hw_init::sim::level(pins::BUTTON_GPIO));

    let mut presser = ButtonPresser::new(1);
    presser.press(&mut hal, &mut NoDelay);
    assert!(!hw_init::sim::level(pins::BUTTON_GPIO));
}

#[test]
fn fake_server_remembers_uploaded_levels() {
    let mut srv = FakeGarageServer::default();
    let mut uploader = Uploader::new(&device_id());
    let ch = ReportChannel::new();
    let mut q = ReportQueue::new(&ch);
    let mut lp = SensorPollLoop::new(0, 600_000);
    let mut door = MockDoor::new(Level::High, Level::Low);

    lp.tick(&mut door, &mut q, 0);
    uploader.upload(&mut srv, &channels::wait_report(&ch)).unwrap();
    assert_eq!(
        srv.last_report(),
        Some(DoorSensors { a: Level::High, b: Level::Low })
    );
    // Token exchange is independent of uploads.
    assert_eq!(
        srv.exchange_button_token("GD-1A2B3C", None).unwrap().as_str(),
        "button_token_0"
    );
}
