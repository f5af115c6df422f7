//! Test builders — ergonomic constructors for `Message` values and on-disk
//! export bundles.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chatsift_core::{Message, MessageKind};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// MessageBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Message`] fixtures.
///
/// # Example
///
/// ```rust
/// let msg = MessageBuilder::new("see you at 8")
///     .sender("wxid_amy", "Amy")
///     .at(1_700_000_000_000)
///     .build();
/// ```
pub struct MessageBuilder {
    msg: Message,
}

impl MessageBuilder {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            msg: Message {
                id: format!("test-{content}"),
                sender_id: "wxid_test".to_string(),
                sender_name: "Tester".to_string(),
                content,
                timestamp: 1_700_000_000_000,
                kind: MessageKind::Text,
                is_self: false,
            },
        }
    }

    pub fn sender(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.msg.sender_id = id.into();
        self.msg.sender_name = name.into();
        self
    }

    pub fn at(mut self, timestamp: i64) -> Self {
        self.msg.timestamp = timestamp;
        self
    }

    pub fn kind(mut self, kind: MessageKind) -> Self {
        self.msg.kind = kind;
        self
    }

    pub fn mine(mut self) -> Self {
        self.msg.is_self = true;
        self
    }

    pub fn build(self) -> Message {
        self.msg
    }
}

// ---------------------------------------------------------------------------
// BundleBuilder
// ---------------------------------------------------------------------------

/// Writes export files into a temp directory and hands back their paths in
/// insertion order. The directory lives as long as the builder.
pub struct BundleBuilder {
    dir: tempfile::TempDir,
    paths: Vec<PathBuf>,
}

impl BundleBuilder {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
            paths: Vec::new(),
        }
    }

    pub fn file(mut self, name: &str, bytes: impl AsRef<[u8]>) -> Self {
        let path = self.dir.path().join(name);
        std::fs::write(&path, bytes).expect("write fixture file");
        self.paths.push(path);
        self
    }

    /// Build a plaintext SQLite database from a SQL script.
    pub fn database(mut self, name: &str, script: &str) -> Self {
        let path = self.dir.path().join(name);
        let conn = rusqlite::Connection::open(&path).expect("open fixture db");
        conn.execute_batch(script).expect("run fixture script");
        drop(conn);
        self.paths.push(path);
        self
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}
