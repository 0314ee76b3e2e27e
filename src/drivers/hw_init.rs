//! One-shot GPIO initialisation and raw pin access.
//!
//! Configures the two sensor inputs (pull-up) and the button output using
//! raw ESP-IDF sys calls.  Called once from `main()` before any worker
//! thread starts.
//!
//! On host targets the pins are backed by an atomic bitmask so adapters
//! and tests can drive inputs and observe outputs.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed { pin: i32, rc: i32 },
    GpioWriteFailed { pin: i32, rc: i32 },
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed { pin, rc } => {
                write!(f, "GPIO{} config failed (rc={})", pin, rc)
            }
            Self::GpioWriteFailed { pin, rc } => {
                write!(f, "GPIO{} initial write failed (rc={})", pin, rc)
            }
        }
    }
}

// ── Init ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_gpio() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before worker threads exist.
    unsafe {
        init_inputs()?;
        init_button_output()?;
    }
    info!("hw_init: GPIO configured (sensors={},{} button={})",
        pins::SENSOR_A_GPIO, pins::SENSOR_B_GPIO, pins::BUTTON_GPIO);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_gpio() -> Result<(), HwInitError> {
    sim::reset();
    log::info!("hw_init(sim): GPIO init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_inputs() -> Result<(), HwInitError> {
    for pin in [pins::SENSOR_A_GPIO, pins::SENSOR_B_GPIO] {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed { pin, rc: ret });
        }
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_button_output() -> Result<(), HwInitError> {
    let pin = pins::BUTTON_GPIO;
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed { pin, rc: ret });
    }
    // Relay open before anything else can run.
    let ret = unsafe { gpio_set_level(pin, 0) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioWriteFailed { pin, rc: ret });
    }
    Ok(())
}

// ── Pin access ────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    sim::level(pin)
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level on the output configured in init_button_output();
    // only the push worker writes this pin.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    sim::set(pin, high);
}

// ── Host simulation ───────────────────────────────────────────

/// Simulated pin levels for host builds.
#[cfg(not(target_os = "espidf"))]
pub mod sim {
    use core::sync::atomic::{AtomicU64, Ordering};

    use crate::pins;

    /// Inputs idle HIGH (pull-up), button output LOW.
    const RESET_LEVELS: u64 = (1u64 << pins::SENSOR_A_GPIO) | (1u64 << pins::SENSOR_B_GPIO);

    static LEVELS: AtomicU64 = AtomicU64::new(RESET_LEVELS);

    pub fn reset() {
        LEVELS.store(RESET_LEVELS, Ordering::SeqCst);
    }

    pub fn level(pin: i32) -> bool {
        LEVELS.load(Ordering::SeqCst) & (1u64 << pin) != 0
    }

    /// Drive a simulated pin (inputs from tests, outputs from `gpio_write`).
    pub fn set(pin: i32, high: bool) {
        let mask = 1u64 << pin;
        if high {
            LEVELS.fetch_or(mask, Ordering::SeqCst);
        } else {
            LEVELS.fetch_and(!mask, Ordering::SeqCst);
        }
    }
}
