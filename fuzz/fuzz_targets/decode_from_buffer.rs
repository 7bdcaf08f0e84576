#![no_main]

use imgflip::engine::{decode_from_bytes, encode_to_vec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must re-encode to the exact input.
    if let Ok(img) = decode_from_bytes(data) {
        assert_eq!(encode_to_vec(&img), data);
    }
});
