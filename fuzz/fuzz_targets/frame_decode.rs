//! Fuzz target for Frame::decode
//!
//! This fuzzer tests frame decoding with arbitrary byte sequences to find:
//! - Parser crashes or panics
//! - Length checks that accept truncated or padded frames
//! - Button codes that bypass the translation table
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error,
//! and every accepted frame must re-encode to the same bytes.

#![no_main]

use glidepad_proto::Frame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(frame) = Frame::decode(data) {
        let reencoded = Frame::from_action(frame.action());
        assert_eq!(reencoded.as_bytes(), data);
    }
});
