//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements                   | Connects to                |
//! |---------------|------------------------------|----------------------------|
//! | `hardware`    | DoorSensorPort, ButtonPort   | ESP32 GPIO (or `fake_hal`) |
//! | `fake_hal`    | DoorSensorPort, ButtonPort   | Simulated door             |
//! | `server`      | GarageServerPort             | `http_server` or fake      |
//! | `http_server` | GarageServerPort             | HTTPS via esp-idf-svc      |
//! | `fake_server` | GarageServerPort             | In-process token minting   |
//! | `time`        | ClockPort                    | ESP32 system timer         |
//! | `wifi`        | ConnectivityPort             | ESP-IDF WiFi STA           |
//! | `device_id`   |                              | Factory MAC in eFuse       |

pub mod device_id;
pub mod fake_hal;
pub mod fake_server;
pub mod hardware;
#[cfg(target_os = "espidf")]
pub mod http_server;
pub mod server;
pub mod time;
pub mod wifi;
