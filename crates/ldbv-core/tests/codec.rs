use ldbv_core::{KeyFormat, decode_key, encode_key};
use proptest::prelude::*;

proptest! {
    #[test]
    fn hex_keys_round_trip(raw in prop::collection::vec(any::<u8>(), 0..64)) {
        let label = encode_key(&raw, KeyFormat::Hex);
        prop_assert_eq!(decode_key(&label, KeyFormat::Hex), raw);
    }

    #[test]
    fn printable_text_keys_round_trip(text in "[ -~]{0,32}") {
        let label = encode_key(text.as_bytes(), KeyFormat::Text);
        prop_assert_eq!(&label, &text);
        prop_assert_eq!(decode_key(&label, KeyFormat::Text), text.into_bytes());
    }
}

#[test]
fn empty_hex_input_decodes_to_empty_prefix() {
    assert_eq!(decode_key("", KeyFormat::Hex), Vec::<u8>::new());
}
