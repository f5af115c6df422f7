//! Type-code canonicalizer — maps provider type discriminators onto
//! [`MessageKind`].
//!
//! Two tables exist. The structured table (JSON and database paths) also
//! knows the sticker, card, location and call codes; the CSV table does not.
//! Unknown codes and unmatched words map to [`MessageKind::Text`].

use crate::types::MessageKind;
use phf::phf_map;
use serde_json::Value;

/// Codes used by the JSON normalizer and the relational extractor.
pub static STRUCTURED_CODES: phf::Map<u32, MessageKind> = phf_map! {
    1u32 => MessageKind::Text,
    3u32 => MessageKind::Image,
    34u32 => MessageKind::Voice,
    // contact card
    42u32 => MessageKind::Text,
    43u32 => MessageKind::Video,
    // sticker
    47u32 => MessageKind::Image,
    // location share
    48u32 => MessageKind::Text,
    49u32 => MessageKind::File,
    // voice / video call record
    50u32 => MessageKind::System,
    10000u32 => MessageKind::System,
    10002u32 => MessageKind::System,
};

/// Codes used by the CSV normalizer.
pub static CSV_CODES: phf::Map<u32, MessageKind> = phf_map! {
    1u32 => MessageKind::Text,
    3u32 => MessageKind::Image,
    34u32 => MessageKind::Voice,
    43u32 => MessageKind::Video,
    49u32 => MessageKind::File,
    10000u32 => MessageKind::System,
    10002u32 => MessageKind::System,
};

/// Free-text discriminator words, matched as substrings in this order.
const KIND_WORDS: &[(&str, MessageKind)] = &[
    ("image", MessageKind::Image),
    ("voice", MessageKind::Voice),
    ("audio", MessageKind::Voice),
    ("video", MessageKind::Video),
    ("file", MessageKind::File),
    ("system", MessageKind::System),
];

/// Which code table a normalizer resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeTable {
    Structured,
    Csv,
}

impl CodeTable {
    fn map(self) -> &'static phf::Map<u32, MessageKind> {
        match self {
            CodeTable::Structured => &STRUCTURED_CODES,
            CodeTable::Csv => &CSV_CODES,
        }
    }
}

impl MessageKind {
    pub fn from_code(code: u32, table: CodeTable) -> Self {
        table.map().get(&code).copied().unwrap_or_default()
    }

    /// Substring match against the known kind words, case-insensitive.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        KIND_WORDS
            .iter()
            .find(|(word, _)| label.contains(word))
            .map(|(_, kind)| *kind)
            .unwrap_or_default()
    }
}

/// Canonicalize a type discriminator that may be a number, a numeric
/// string, or a free-text word.
pub fn canonicalize(value: &Value, table: CodeTable) -> MessageKind {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|c| u32::try_from(c).ok())
            .map(|c| MessageKind::from_code(c, table))
            .unwrap_or_default(),
        Value::String(s) => canonicalize_str(s, table),
        _ => MessageKind::Text,
    }
}

pub fn canonicalize_str(raw: &str, table: CodeTable) -> MessageKind {
    let raw = raw.trim();
    match raw.parse::<u32>() {
        Ok(code) => MessageKind::from_code(code, table),
        Err(_) => MessageKind::from_label(raw),
    }
}
