//! Opener button driver: one fixed-width relay pulse per push.
//!
//! ```text
//!  button ─┐         ┌──────── pulse_ms ────────┐
//!          └─────────┘                          └──────
//!            LOW            HIGH                 LOW
//! ```
//!
//! `press()` blocks for the whole pulse.  The push worker is the only
//! caller, so a second request arriving mid-pulse waits in the hand-off
//! slot (and further ones collapse into it).

use embedded_hal::delay::DelayNs;
use log::info;

use crate::app::ports::ButtonPort;
use crate::sensors::Level;

pub struct ButtonPresser {
    pulse_ms: u32,
    presses: u32,
}

impl ButtonPresser {
    pub fn new(pulse_ms: u32) -> Self {
        Self { pulse_ms, presses: 0 }
    }

    /// Drive the button HIGH, hold for the pulse width, then release.
    pub fn press(&mut self, button: &mut impl ButtonPort, delay: &mut impl DelayNs) {
        self.presses = self.presses.wrapping_add(1);
        info!("Button: press #{} ({}ms)", self.presses, self.pulse_ms);
        button.set_button(Level::High);
        delay.delay_ms(self.pulse_ms);
        button.set_button(Level::Low);
        info!("Button: released");
    }

    /// Completed presses since boot.
    pub fn presses(&self) -> u32 {
        self.presses
    }
}
