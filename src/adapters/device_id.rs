//! Device identity.
//!
//! The id sent with every request is the configured `device_id` when set,
//! otherwise `GD-XXYYZZ` built from the last three bytes of the
//! factory-burned eFuse MAC (stable across reboots).

use core::fmt::Write;

pub use crate::config::DeviceIdString;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: writes exactly 6 bytes into `mac`.
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0x24, 0x6F, 0x28, 0x1A, 0x2B, 0x3C]
}

/// `GD-XXYYZZ` from the last three MAC bytes.
pub fn from_mac(mac: &MacAddress) -> DeviceIdString {
    let mut id = DeviceIdString::new();
    let _ = write!(id, "GD-{:02X}{:02X}{:02X}", mac[3], mac[4], mac[5]);
    id
}

/// The configured id, or the MAC-derived one if none is configured.
pub fn resolve(configured: &DeviceIdString, mac: &MacAddress) -> DeviceIdString {
    if configured.is_empty() {
        from_mac(mac)
    } else {
        configured.clone()
    }
}
