//! GPIO pin assignments for the garage controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Door sensors (reed switches to GND, internal pull-up)
// ---------------------------------------------------------------------------

/// Sensor A: mounted at the closed end of travel.
/// LOW = door closed, HIGH = door not closed.
pub const SENSOR_A_GPIO: i32 = 25;
/// Sensor B: mounted at the open end of travel.
/// LOW = door open, HIGH = door not open.
pub const SENSOR_B_GPIO: i32 = 26;

// ---------------------------------------------------------------------------
// Opener button (relay across the wall-button terminals)
// ---------------------------------------------------------------------------

/// Digital output: HIGH closes the relay ("button pressed").
/// Driven LOW at boot before the push worker starts.
pub const BUTTON_GPIO: i32 = 27;
