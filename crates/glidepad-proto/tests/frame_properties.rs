//! Property-based tests for frame encoding/decoding.
//!
//! Verifies the byte layout for all inputs, not just the documented
//! examples.

use glidepad_proto::{Button, Frame, Framing, ProtocolError, SemanticAction, Tag, WireMessage};
use proptest::prelude::*;

/// Buttons that survive a binary round trip unchanged.
fn arbitrary_wire_button() -> impl Strategy<Value = Button> {
    prop_oneof![Just(Button::Left), Just(Button::Right), Just(Button::Middle)]
}

fn arbitrary_action() -> impl Strategy<Value = SemanticAction> {
    prop_oneof![
        (any::<i32>(), any::<i32>()).prop_map(|(dx, dy)| SemanticAction::Move { dx, dy }),
        any::<i32>().prop_map(|dy| SemanticAction::Scroll { dy }),
        arbitrary_wire_button().prop_map(|button| SemanticAction::Click { button }),
    ]
}

#[test]
fn prop_frame_round_trip() {
    proptest!(|(action in arbitrary_action())| {
        let frame = Frame::from_action(action);
        let decoded = Frame::decode(frame.as_bytes()).expect("decode should succeed");

        prop_assert_eq!(decoded.action(), action);
        prop_assert_eq!(decoded.as_bytes(), frame.as_bytes());
    });
}

#[test]
fn prop_frame_size_fixed_by_tag() {
    proptest!(|(action in arbitrary_action())| {
        let frame = Frame::from_action(action);
        let tag = Tag::from_u8(frame.as_bytes()[0]).expect("first byte is a tag");

        prop_assert_eq!(tag, frame.tag());
        prop_assert_eq!(frame.as_bytes().len(), tag.frame_size());
    });
}

#[test]
fn prop_move_fields_little_endian() {
    proptest!(|(dx in any::<i32>(), dy in any::<i32>())| {
        let frame = Frame::from_action(SemanticAction::Move { dx, dy });
        let bytes = frame.as_bytes();

        prop_assert_eq!(&bytes[1..5], &dx.to_le_bytes());
        prop_assert_eq!(&bytes[5..9], &dy.to_le_bytes());
    });
}

#[test]
fn prop_truncated_frames_rejected() {
    proptest!(|(action in arbitrary_action(), seed in any::<usize>())| {
        let frame = Frame::from_action(action);
        let bytes = frame.as_bytes();
        let cut = 1 + seed % (bytes.len() - 1);

        let result = Frame::decode(&bytes[..cut]);
        let is_invalid_length = matches!(result, Err(ProtocolError::InvalidLength { .. }));
        prop_assert!(is_invalid_length);
    });
}

#[test]
fn prop_arbitrary_bytes_never_panic() {
    proptest!(|(bytes in prop::collection::vec(any::<u8>(), 0..16))| {
        let _ = Frame::decode(&bytes);
    });
}

#[test]
fn prop_text_and_binary_agree() {
    proptest!(|(action in arbitrary_action())| {
        let binary = Framing::Binary.encode(action).expect("binary encode");
        let text = Framing::Text.encode(action).expect("text encode");

        prop_assert!(matches!(binary, WireMessage::Binary(_)));
        prop_assert!(matches!(text, WireMessage::Text(_)));
        prop_assert_eq!(binary.decode().expect("binary decode"), text.decode().expect("text decode"));
    });
}
