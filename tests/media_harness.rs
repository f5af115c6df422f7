#![allow(unused)]
//! Media recovery harness.
//!
//! # What this covers
//!
//! - **Key discovery**: for every key byte and every supported format, an
//!   obfuscated image is recovered with the right format and bytes.
//! - **Rejection**: short buffers and non-matching heads yield `None`.
//!
//! # Running
//!
//! ```sh
//! cargo test --test media_harness
//! ```

mod common;
use chatsift_core::media::{detect_key, recover};
use chatsift_core::ImageFormat;
use common::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case::jpeg(&[0xFF, 0xD8, 0xFF, 0xE0], ImageFormat::Jpeg)]
#[case::png(PNG_HEAD, ImageFormat::Png)]
#[case::gif(b"GIF89a", ImageFormat::Gif)]
fn recovers_each_format(#[case] plain: &[u8], #[case] format: ImageFormat) {
    let recovered = recover(&obfuscate(plain, 0x5C)).unwrap();
    assert_eq!(recovered.format, format);
    assert_eq!(recovered.bytes, plain);
}

#[test]
fn mime_and_extension() {
    let r = recover(&obfuscate(PNG_HEAD, 0x01)).unwrap();
    assert_eq!(r.extension(), "png");
    assert_eq!(r.mime_type(), "image/png");
}

#[test]
fn short_buffers_are_rejected() {
    assert!(recover(&[]).is_none());
    assert!(recover(&[0xFF]).is_none());
}

proptest! {
    #[test]
    fn any_key_recovers_png(key in any::<u8>(), tail in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut plain = PNG_HEAD.to_vec();
        plain.extend(tail);
        let recovered = recover(&obfuscate(&plain, key)).unwrap();
        // JPEG is tried first but its signature never fits a PNG head
        prop_assert_eq!(recovered.format, ImageFormat::Png);
        prop_assert_eq!(recovered.bytes, plain);
        prop_assert_eq!(detect_key(&obfuscate(PNG_HEAD, key)), Some((key, ImageFormat::Png)));
    }

    #[test]
    fn recovery_is_an_involution(buf in proptest::collection::vec(any::<u8>(), 2..128)) {
        if let Some((key, format)) = detect_key(&buf) {
            let decoded = recover(&buf).unwrap();
            prop_assert_eq!(decoded.format, format);
            prop_assert_eq!(obfuscate(&decoded.bytes, key), buf);
            prop_assert_eq!(decoded.bytes[..2].to_vec(), format.signature().to_vec());
        }
    }
}
