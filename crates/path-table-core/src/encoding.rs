//! Best-effort text encoding detection and strict decoding.
//!
//! Detection looks for a byte-order mark first, treats empty and pure ASCII
//! input as inconclusive (falling back to [`DEFAULT_ENCODING`]), and hands
//! everything else to `chardetng`. Decoding never replaces malformed
//! sequences: a byte stream that does not fit the chosen encoding is a
//! [`PathTableError::Decode`].

use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::error::{DecodeSnafu, PathTableResult, UnknownEncodingSnafu};

/// Encoding used when detection is inconclusive.
pub const DEFAULT_ENCODING: &Encoding = UTF_8;

/// Guess the text encoding of `bytes`.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        debug!("byte-order mark selects {}", encoding.name());
        return encoding;
    }

    if bytes.is_ascii() {
        return DEFAULT_ENCODING;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guess = detector.guess(None, true);
    debug!("statistical detection guessed {}", guess.name());
    guess
}

/// Resolve a WHATWG encoding label such as `utf-8`, `latin1` or `shift_jis`.
pub fn encoding_for_label(label: &str) -> PathTableResult<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
        UnknownEncodingSnafu {
            label: label.to_string(),
        }
        .build()
    })
}

/// Decode `bytes` as `encoding`, failing on the first malformed sequence.
///
/// A byte-order mark that agrees with `encoding` is stripped.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> PathTableResult<String> {
    let body = match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_len)) if bom_encoding == encoding => &bytes[bom_len..],
        _ => bytes,
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(Cow::into_owned)
        .ok_or_else(|| {
            DecodeSnafu {
                encoding: encoding.name().to_string(),
            }
            .build()
        })
}
