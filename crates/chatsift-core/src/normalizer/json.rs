//! JSON normalizer.
//!
//! Exports arrive in four incompatible top-level shapes. [`JsonShape::detect`]
//! discriminates them by structural probes and every branch converges on the
//! same [`ParsedData`].

use crate::alias;
use crate::assemble;
use crate::config::Config;
use crate::error::NormalizeError;
use crate::kind::{self, CodeTable};
use crate::timestamp;
use crate::types::{Message, MessageKind, ParsedData, Session};
use serde_json::{Map, Value};
use std::time::Instant;

/// Top-level layout of a JSON export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JsonShape<'a> {
    /// `[{ "messages": [...] , ...}, ...]`
    SessionArray(&'a [Value]),
    /// `[{ "content": ..., ...}, ...]` with no session boundary.
    MessageArray(&'a [Value]),
    /// `{ "messages": [...], ... }` or `{ "chatList": [...], ... }`
    SessionObject(&'a Map<String, Value>),
    /// `{ "<talker>": [...], ... }`
    KeyedSessions(&'a Map<String, Value>),
    /// A bare string, number, bool or null.
    Scalar,
}

impl<'a> JsonShape<'a> {
    pub fn detect(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => {
                let first_is_session = items
                    .first()
                    .and_then(Value::as_object)
                    .is_some_and(|o| o.contains_key("messages"));
                if first_is_session {
                    JsonShape::SessionArray(items)
                } else {
                    JsonShape::MessageArray(items)
                }
            }
            Value::Object(obj) => {
                if obj.contains_key("messages") || obj.contains_key("chatList") {
                    JsonShape::SessionObject(obj)
                } else {
                    JsonShape::KeyedSessions(obj)
                }
            }
            _ => JsonShape::Scalar,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            JsonShape::SessionArray(_) => "session-array",
            JsonShape::MessageArray(_) => "message-array",
            JsonShape::SessionObject(_) => "session-object",
            JsonShape::KeyedSessions(_) => "keyed-sessions",
            JsonShape::Scalar => "scalar",
        }
    }
}

/// Parse a JSON document. Only a syntax error on the whole document is an
/// error; malformed records inside it are skipped.
pub fn normalize_str(text: &str, config: &Config) -> Result<ParsedData, NormalizeError> {
    let started = Instant::now();
    let value: Value = serde_json::from_str(text.trim_start_matches('\u{feff}'))?;
    let mut data = normalize_value(&value, config);
    data.parse_time = started.elapsed();
    Ok(data)
}

pub fn normalize_value(value: &Value, config: &Config) -> ParsedData {
    let started = Instant::now();
    let shape = JsonShape::detect(value);
    tracing::debug!(shape = shape.name(), "normalizing JSON export");

    let sessions = match shape {
        JsonShape::SessionArray(items) => items
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| parse_session(obj, config))
            .collect(),
        JsonShape::MessageArray(items) => assemble::group_flat(parse_messages(items, config), config),
        JsonShape::SessionObject(obj) => vec![parse_session(obj, config)],
        JsonShape::KeyedSessions(obj) => obj
            .iter()
            .filter_map(|(key, v)| v.as_array().map(|items| (key, items)))
            .map(|(key, items)| {
                let messages = parse_messages(items, config);
                let is_group = config.sessions.is_group(key);
                Session::new(key.as_str(), key.as_str(), is_group, messages)
            })
            .collect(),
        JsonShape::Scalar => Vec::new(),
    };

    ParsedData::from_sessions(sessions, started.elapsed())
}

/// Parse one session object. Kept even when it holds no messages.
pub fn parse_session(obj: &Map<String, Value>, config: &Config) -> Session {
    let messages = alias::first(obj, alias::SESSION_MESSAGES)
        .and_then(Value::as_array)
        .map(|items| parse_messages(items, config))
        .unwrap_or_default();

    let id = alias::first_string(obj, alias::SESSION_ID).unwrap_or_else(assemble::new_id);

    let is_group = alias::first(obj, alias::SESSION_GROUP)
        .map(|v| alias::is_truthy(v, ""))
        .unwrap_or(false)
        || obj.get("chatType").and_then(Value::as_str) == Some("group")
        || config.sessions.is_group(&id);

    let name = alias::first_string(obj, alias::SESSION_NAME)
        .or_else(|| {
            messages
                .iter()
                .find(|m| {
                    !m.is_self
                        && !m.sender_name.is_empty()
                        && m.sender_name != config.labels.other_name
                })
                .map(|m| m.sender_name.clone())
        })
        .unwrap_or_else(|| id.clone());

    Session::new(id, name, is_group, messages)
}

pub fn parse_messages(items: &[Value], config: &Config) -> Vec<Message> {
    items.iter().filter_map(|v| parse_message(v, config)).collect()
}

/// Parse one message record. `None` when the record is not an object or has
/// no non-empty content.
pub fn parse_message(value: &Value, config: &Config) -> Option<Message> {
    let record = value.as_object()?;
    let content = alias::first_string(record, alias::CONTENT)?;
    if content.trim().is_empty() {
        return None;
    }

    let is_self = alias::first(record, alias::SELF_FLAG)
        .is_some_and(|v| alias::is_truthy(v, &config.labels.sent_marker));
    let sender_id = alias::first_string(record, alias::SENDER_ID).unwrap_or_default();
    let sender_name = alias::first_string(record, alias::SENDER_NAME)
        .unwrap_or_else(|| config.labels.placeholder(is_self).to_string());
    let timestamp = alias::first(record, alias::TIMESTAMP)
        .map(timestamp::normalize)
        .unwrap_or_else(timestamp::now_millis);
    let kind = alias::first(record, alias::TYPE)
        .map(|v| kind::canonicalize(v, CodeTable::Structured))
        .unwrap_or(MessageKind::Text);
    let id = alias::first_string(record, alias::MESSAGE_ID).unwrap_or_else(assemble::new_id);

    Some(Message {
        id,
        sender_id,
        sender_name,
        content,
        timestamp,
        kind,
        is_self,
    })
}
