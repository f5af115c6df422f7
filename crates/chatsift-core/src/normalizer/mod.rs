//! Normalizers — turn one textual export format into [`ParsedData`](crate::ParsedData).
//!
//! Each normalizer skips malformed records and keeps going. Only the JSON
//! normalizer can fail as a whole (a syntax error on the document); the
//! import layer turns that into a diagnostic.

pub mod csv;
pub mod json;
pub mod text;

/// Decode raw file bytes as text. Invalid UTF-8 is replaced and a leading
/// byte-order mark is removed.
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_string()
}
