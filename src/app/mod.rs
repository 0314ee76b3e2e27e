//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the garage controller:
//! sensor reporting, the button-token protocol, and the uploader.  All
//! interaction with hardware and the network happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals or a clock.

pub mod button_token;
pub mod command_loop;
pub mod events;
pub mod ports;
pub mod sensor_loop;
pub mod uploader;
