#![no_main]

use chrono::{DateTime, Utc};
use libfuzzer_sys::fuzz_target;

// Parsing, extraction, and validation must never panic, whatever the
// input bytes look like.
fuzz_target!(|data: &[u8]| {
    let _ = omg_core::parse(data);
    let _ = omg_core::Mirrors::from(data.to_vec()).list();
    let _ = omg_core::Canary::from(data.to_vec()).validate(DateTime::<Utc>::MIN_UTC);
});
