//! Button driver, GPIO initialisation, and worker-thread helpers.

pub mod door_button;
pub mod hw_init;
pub mod task_pin;
