//! Fuzz target: `PoiCustomData::parse` (persisted blob path)
//!
//! POI custom data is free text owned by the host — anything can be in
//! there. Feeds arbitrary bytes through the parser and verifies:
//! - No panics under any input
//! - Accepted blobs re-encode to something the parser accepts again,
//!   yielding the same record (round-trip stability)
//!
//! cargo fuzz run fuzz_custom_data

#![no_main]

use libfuzzer_sys::fuzz_target;
use mapsense::custom_data::PoiCustomData;

fuzz_target!(|data: &[u8]| {
    let Ok(blob) = core::str::from_utf8(data) else {
        return;
    };

    if let Ok(parsed) = PoiCustomData::parse(blob) {
        // Overflowing literals parse to infinities, which JSON cannot
        // write back; the round-trip guarantee covers finite records.
        let finite = |o: Option<f64>| o.is_none_or(f64::is_finite);
        if !finite(parsed.threshold) || !finite(parsed.value) {
            return;
        }
        let reencoded = parsed.encode();
        let reparsed = PoiCustomData::parse(&reencoded)
            .expect("re-encoded blob must parse");
        assert_eq!(
            reparsed, parsed,
            "round trip must preserve the record"
        );
    }
});
