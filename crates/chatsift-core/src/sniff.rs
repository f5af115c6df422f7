//! Format sniffer — decides which normalizer an input belongs to.
//!
//! The extension is consulted first; inputs with an unknown extension are
//! probed by content. Only the head of the file is needed.

use crate::media;
use std::path::Path;

/// First 16 bytes of every plaintext SQLite database.
pub const SQLITE_MAGIC: &[u8; 16] = b"SQLite format 3\0";

/// Bytes of the file head the sniffer looks at.
pub const PROBE_LEN: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Json,
    Csv,
    Text,
    /// Plaintext SQLite database.
    Database,
    /// A database file that does not start with the SQLite magic.
    EncryptedDatabase,
    /// XOR-obfuscated image attachment.
    Media,
    Unsupported,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Json => write!(f, "json"),
            SourceFormat::Csv => write!(f, "csv"),
            SourceFormat::Text => write!(f, "text"),
            SourceFormat::Database => write!(f, "database"),
            SourceFormat::EncryptedDatabase => write!(f, "encrypted database"),
            SourceFormat::Media => write!(f, "media"),
            SourceFormat::Unsupported => write!(f, "unsupported"),
        }
    }
}

pub fn is_plain_sqlite(head: &[u8]) -> bool {
    head.starts_with(SQLITE_MAGIC)
}

/// Classify an input from its path and the first bytes of its content.
pub fn sniff(path: &Path, head: &[u8]) -> SourceFormat {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("json") => SourceFormat::Json,
        Some("csv") => SourceFormat::Csv,
        Some("txt") => SourceFormat::Text,
        Some("db" | "sqlite") => {
            if is_plain_sqlite(head) {
                SourceFormat::Database
            } else {
                SourceFormat::EncryptedDatabase
            }
        }
        Some("dat") => SourceFormat::Media,
        _ => probe(head),
    }
}

/// Content-only classification.
pub fn probe(head: &[u8]) -> SourceFormat {
    if is_plain_sqlite(head) {
        return SourceFormat::Database;
    }
    if let Some(text) = utf8_prefix(head) {
        let text = text.trim_start_matches('\u{feff}').trim_start();
        if text.starts_with('{') || text.starts_with('[') {
            return SourceFormat::Json;
        }
        if looks_like_csv(text) {
            return SourceFormat::Csv;
        }
        if !text.is_empty() {
            return SourceFormat::Text;
        }
    }
    if media::detect_key(head).is_some() {
        return SourceFormat::Media;
    }
    SourceFormat::Unsupported
}

/// Decode the head as UTF-8, tolerating a multi-byte character cut off at
/// the probe boundary. Control bytes other than whitespace mean binary.
fn utf8_prefix(head: &[u8]) -> Option<&str> {
    let text = match std::str::from_utf8(head) {
        Ok(t) => t,
        Err(e) if e.error_len().is_none() => std::str::from_utf8(&head[..e.valid_up_to()]).ok()?,
        Err(_) => return None,
    };
    let binary = text
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'));
    (!binary).then_some(text)
}

fn looks_like_csv(text: &str) -> bool {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    match (lines.next(), lines.next()) {
        (Some(header), Some(_)) => header.contains(','),
        _ => false,
    }
}
