//! Named worker threads with explicit stack size and priority.
//!
//! ESP-IDF implements `std::thread` on top of pthreads, which are FreeRTOS
//! tasks underneath.  `esp_pthread_set_cfg()` sets a thread-local template
//! that applies to the *next* `pthread_create()` from the calling thread,
//! so configure-then-spawn must not interleave with other spawns on the
//! same thread.  Only `main` spawns workers.

use std::io;
use std::thread::{Builder, JoinHandle};

/// Scheduling parameters for one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSpec {
    /// NUL-terminated for FreeRTOS (e.g. `"sensors\0"`).
    pub name: &'static str,
    pub priority: u8,
    pub stack_kb: usize,
}

impl WorkerSpec {
    pub fn display_name(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }
}

/// Sensor sampling, highest priority so the 10 ms cadence holds.
pub const SENSOR_WORKER: WorkerSpec = WorkerSpec { name: "sensors\0", priority: 10, stack_kb: 4 };
/// Report uploads (HTTP + TLS need the larger stack).
pub const UPLOAD_WORKER: WorkerSpec = WorkerSpec { name: "uploader\0", priority: 5, stack_kb: 12 };
/// Token exchanges.
pub const COMMAND_WORKER: WorkerSpec = WorkerSpec { name: "commands\0", priority: 5, stack_kb: 12 };
/// Relay pulses.
pub const PUSH_WORKER: WorkerSpec = WorkerSpec { name: "push\0", priority: 8, stack_kb: 4 };

#[cfg(target_os = "espidf")]
pub fn spawn_worker(
    spec: WorkerSpec,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    // SAFETY: plain struct initialisation and a thread-local config write;
    // `name` is 'static and NUL-terminated per `WorkerSpec`.
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.prio = i32::from(spec.priority);
        cfg.stack_size = (spec.stack_kb * 1024) as _;
        cfg.thread_name = spec.name.as_ptr().cast();
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK as i32 {
        return Err(io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
    }

    log::info!(
        "Spawning '{}' (pri={}, stack={}KB)",
        spec.display_name(),
        spec.priority,
        spec.stack_kb
    );

    Builder::new()
        .name(spec.display_name().into())
        .stack_size(spec.stack_kb * 1024)
        .spawn(f)
}

/// Simulation fallback: ignores priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_worker(
    spec: WorkerSpec,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    log::info!(
        "Spawning '{}' (sim, stack={}KB)",
        spec.display_name(),
        spec.stack_kb
    );

    Builder::new()
        .name(spec.display_name().into())
        .stack_size(spec.stack_kb.max(64) * 1024)
        .spawn(f)
}
