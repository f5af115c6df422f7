//! Error types for chatsift-core.
//!
//! Individual malformed records never surface here: normalizers skip them.
//! These variants describe failures that make a whole input unusable, and
//! the import layer turns each one into a diagnostic instead of aborting the
//! batch.

use serde::Serialize;
use thiserror::Error;

/// A failure that prevents one input from contributing to an import.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The database does not start with the SQLite magic header, so it still
    /// carries the application's cipher.
    #[error("database is encrypted; run the decryption export first and import the plaintext copy")]
    Encrypted,

    /// The document is not syntactically valid JSON.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither the extension nor the content matched a known format.
    #[error("unsupported input: {0}")]
    Unsupported(String),

    /// No known image signature matched the obfuscated bytes.
    #[error("attachment is not a recoverable image")]
    UnrecoverableMedia,
}

impl ImportError {
    pub fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            ImportError::Encrypted => DiagnosticKind::Encrypted,
            ImportError::Json(_) | ImportError::Database(_) => DiagnosticKind::Malformed,
            ImportError::Io(_) => DiagnosticKind::Io,
            ImportError::Unsupported(_) => DiagnosticKind::Unsupported,
            ImportError::UnrecoverableMedia => DiagnosticKind::UnrecoverableMedia,
        }
    }
}

/// Category of a per-input failure recorded in an import report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    Encrypted,
    Malformed,
    Unsupported,
    UnrecoverableMedia,
    Io,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::Encrypted => write!(f, "encrypted"),
            DiagnosticKind::Malformed => write!(f, "malformed"),
            DiagnosticKind::Unsupported => write!(f, "unsupported"),
            DiagnosticKind::UnrecoverableMedia => write!(f, "unrecoverable media"),
            DiagnosticKind::Io => write!(f, "io"),
        }
    }
}

/// Error returned by the JSON normalizer's document-level parse.
pub type NormalizeError = ImportError;

pub type Result<T, E = ImportError> = std::result::Result<T, E>;
