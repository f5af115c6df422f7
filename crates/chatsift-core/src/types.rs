//! Core types for chatsift-core.
//!
//! This module defines the canonical model every normalizer converges on:
//! the [`Message`], its [`MessageKind`], the [`Session`] that owns an ordered
//! run of messages, and the [`ParsedData`] produced by one parse operation.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::time::Duration;

/// A single normalised chat message.
///
/// Created once during parsing and never mutated afterwards; ownership moves
/// into the [`Session`] it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Source-supplied id when present, otherwise a generated token.
    /// Informational only; uniqueness is not enforced.
    pub id: String,
    /// Raw talker / contact identifier. Empty means "unknown".
    pub sender_id: String,
    /// Best-effort human label, falling back to the self/other placeholder.
    pub sender_name: String,
    /// Message body. Never empty: records without content are dropped.
    pub content: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Whether the importing user authored the message.
    pub is_self: bool,
}

/// Semantic message kind, canonicalised from provider-specific type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    Voice,
    Video,
    File,
    System,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageKind::Text => write!(f, "text"),
            MessageKind::Image => write!(f, "image"),
            MessageKind::Voice => write!(f, "voice"),
            MessageKind::Video => write!(f, "video"),
            MessageKind::File => write!(f, "file"),
            MessageKind::System => write!(f, "system"),
        }
    }
}

/// A reconstructed conversation thread.
///
/// Messages are always in ascending timestamp order. The only constructor,
/// [`Session::new`], performs a stable sort, so ties keep their source order
/// and the last element is always the most recent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub is_group: bool,
    messages: Vec<Message>,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        is_group: bool,
        mut messages: Vec<Message>,
    ) -> Self {
        messages.sort_by_key(|m| m.timestamp);
        Self {
            id: id.into(),
            name: name.into(),
            is_group,
            messages,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// The most recent message, `None` for an empty session.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn last_message_time(&self) -> Option<i64> {
        self.last_message().map(|m| m.timestamp)
    }
}

impl Serialize for Session {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Session", 7)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("isGroup", &self.is_group)?;
        s.serialize_field("messageCount", &self.message_count())?;
        s.serialize_field("lastMessage", &self.last_message().map(|m| &m.content))?;
        s.serialize_field("lastMessageTime", &self.last_message_time())?;
        s.serialize_field("messages", &self.messages)?;
        s.end()
    }
}

/// Result of one parse operation.
///
/// Results from sequentially processed files are combined with
/// [`ParsedData::merge`]; there is no deduplication across merges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedData {
    pub sessions: Vec<Session>,
    pub total_messages: usize,
    /// Wall-clock duration of the parse. Diagnostic only.
    #[serde(rename = "parseTimeMs", serialize_with = "as_millis")]
    pub parse_time: Duration,
}

impl ParsedData {
    pub fn from_sessions(sessions: Vec<Session>, parse_time: Duration) -> Self {
        let total_messages = sessions.iter().map(Session::message_count).sum();
        Self {
            sessions,
            total_messages,
            parse_time,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Append `other`'s sessions and add its counters to ours.
    pub fn merge(&mut self, other: ParsedData) {
        self.sessions.extend(other.sessions);
        self.total_messages += other.total_messages;
        self.parse_time += other.parse_time;
    }
}

fn as_millis<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(d.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn msg(content: &str, ts: i64) -> Message {
        Message {
            id: content.to_string(),
            sender_id: "wxid_a".to_string(),
            sender_name: "Alice".to_string(),
            content: content.to_string(),
            timestamp: ts,
            kind: MessageKind::Text,
            is_self: false,
        }
    }

    #[test]
    fn session_sorts_stably_by_timestamp() {
        let s = Session::new(
            "s",
            "Alice",
            false,
            vec![msg("c", 30), msg("a", 10), msg("b1", 20), msg("b2", 20)],
        );
        let order: Vec<&str> = s.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(order, vec!["a", "b1", "b2", "c"]);
        assert_eq!(s.message_count(), 4);
        assert_eq!(s.last_message_time(), Some(30));
    }

    #[test]
    fn empty_session_has_no_last_message() {
        let s = Session::new("s", "empty", false, Vec::new());
        assert_eq!(s.message_count(), 0);
        assert!(s.last_message().is_none());
        assert!(s.last_message_time().is_none());
    }

    #[test]
    fn merge_with_empty_only_adds_parse_time() {
        let mut p = ParsedData::from_sessions(
            vec![Session::new("s", "Alice", false, vec![msg("hi", 1)])],
            Duration::from_millis(5),
        );
        let before = p.clone();
        p.merge(ParsedData {
            parse_time: Duration::from_millis(3),
            ..ParsedData::default()
        });
        assert_eq!(p.sessions, before.sessions);
        assert_eq!(p.total_messages, before.total_messages);
        assert_eq!(p.parse_time, Duration::from_millis(8));
    }

    #[test]
    fn merge_concatenates_without_dedup() {
        let one = || {
            ParsedData::from_sessions(
                vec![Session::new("s", "Alice", false, vec![msg("hi", 1)])],
                Duration::ZERO,
            )
        };
        let mut p = one();
        p.merge(one());
        assert_eq!(p.sessions.len(), 2);
        assert_eq!(p.total_messages, 2);
    }

    #[test]
    fn session_serializes_derived_fields() {
        let s = Session::new("s", "Alice", false, vec![msg("a", 1), msg("b", 2)]);
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["messageCount"], 2);
        assert_eq!(v["lastMessage"], "b");
        assert_eq!(v["lastMessageTime"], 2);
        assert_eq!(v["messages"][0]["type"], "text");
        assert_eq!(v["messages"][0]["senderId"], "wxid_a");
    }
}
