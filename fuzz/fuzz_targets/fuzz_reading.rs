//! Fuzz target: telemetry wire parsing and sample conversion
//!
//! Transport payloads come straight off the broker. Drives arbitrary
//! bytes through `parse_reading` and, for accepted readings, through the
//! sample conversion (which must absorb arbitrary timestamp text).
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Accepted readings convert to exactly one sample with the same value
//!
//! cargo fuzz run fuzz_reading

#![no_main]

use libfuzzer_sys::fuzz_target;
use mapsense::sensor::{format_readings, parse_reading};

fuzz_target!(|data: &[u8]| {
    if let Ok(reading) = parse_reading(data) {
        let samples = format_readings(core::slice::from_ref(&reading));
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value, reading.value);
    }
});
