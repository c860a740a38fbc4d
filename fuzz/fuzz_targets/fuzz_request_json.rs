#![no_main]
use libfuzzer_sys::fuzz_target;
use linediff::config::AppConfig;
use linediff::pipeline::respond;

/// Fuzz the request boundary: any bytes must produce a serializable response.
fuzz_target!(|data: &[u8]| {
    let response = respond(data, &AppConfig::default());
    let _ = response.to_json();
});
