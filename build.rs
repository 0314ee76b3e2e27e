fn main() {
    println!("cargo:rerun-if-env-changed=GARAGE_SERVER_BASE_URL");
    println!("cargo:rerun-if-env-changed=GARAGE_DEVICE_ID");
    println!("cargo:rerun-if-env-changed=GARAGE_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=GARAGE_WIFI_PASSWORD");
    println!("cargo:rerun-if-env-changed=GARAGE_FAKE_HAL");
    println!("cargo:rerun-if-env-changed=GARAGE_FAKE_SERVER");

    // Host builds (tests, fuzzing) have no ESP-IDF environment to export.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
