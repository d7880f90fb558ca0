//! Fuzz target for JSON record decoding
//!
//! Arbitrary text goes through `TextRecord::from_json` and, if it parses,
//! through the conversion to a semantic action. Missing fields, unknown
//! message types and out-of-range deltas must all surface as errors.

#![no_main]

use glidepad_proto::{SemanticAction, TextRecord};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(record) = TextRecord::from_json(text) else {
        return;
    };
    let _ = SemanticAction::try_from(record);
});
