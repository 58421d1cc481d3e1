const CONFIG_ENV: [&str; 8] = [
    "FWLOCATE_WIFI_SSID",
    "FWLOCATE_WIFI_PASSWORD",
    "FWLOCATE_ENDPOINT_URL",
    "FWLOCATE_REQUEST_BODY",
    "FWLOCATE_FIELD",
    "FWLOCATE_TIMEOUT_MS",
    "FWLOCATE_RECONNECT_DELAY_MS",
    "FWLOCATE_RECONNECT_MAX_MS",
];

fn main() {
    for name in CONFIG_ENV {
        println!("cargo:rerun-if-env-changed={name}");
    }
    println!("cargo:rerun-if-env-changed=ESP_LOG");

    println!("cargo:rustc-link-arg=-Tlinkall.x");
    println!("cargo:rustc-link-arg-tests=-Tembedded-test.x");
}
