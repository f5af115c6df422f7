//! Field alias tables.
//!
//! Exporters disagree on field names, so every logical field is resolved
//! through an ordered list of candidate keys. The first candidate that is
//! present with a usable value wins. The lists live here as constants so
//! that each normalizer reads from one table instead of scattering literals.

use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// JSON message / session objects
// ---------------------------------------------------------------------------

/// Message body. The provider's capitalized column name comes first.
pub const CONTENT: &[&str] = &["StrContent", "strContent", "content", "message", "msg", "text"];
pub const SENDER_ID: &[&str] = &[
    "StrTalker", "strTalker", "talker", "senderId", "sender_id", "sender", "from", "wxid",
];
pub const SENDER_NAME: &[&str] = &[
    "senderName", "sender_name", "nickname", "nickName", "displayName", "remark",
];
pub const TIMESTAMP: &[&str] = &["CreateTime", "createTime", "timestamp", "time", "create_time", "date"];
pub const TYPE: &[&str] = &["Type", "type", "msgType", "msg_type"];
pub const SELF_FLAG: &[&str] = &["IsSend", "isSend", "isSelf", "is_self", "is_send"];
pub const MESSAGE_ID: &[&str] = &["MsgSvrID", "msgSvrId", "msgId", "localId", "id"];

pub const SESSION_MESSAGES: &[&str] = &["messages", "chatList", "chat"];
pub const SESSION_ID: &[&str] = &["id", "sessionId"];
pub const SESSION_NAME: &[&str] = &["name", "nickname", "title"];
pub const SESSION_GROUP: &[&str] = &["isGroup", "is_group"];

// ---------------------------------------------------------------------------
// CSV headers (compared lower-cased)
// ---------------------------------------------------------------------------

pub mod csv {
    pub const CONTENT: &[&str] = &["strcontent", "content", "message", "msg", "text", "内容"];
    pub const TIMESTAMP: &[&str] = &["createtime", "create_time", "timestamp", "time", "date", "时间"];
    pub const TYPE: &[&str] = &["type", "msgtype", "msg_type", "类型"];
    pub const SENDER_ID: &[&str] = &[
        "strtalker", "talker", "sender_id", "senderid", "sender", "from", "wxid",
    ];
    pub const SENDER_NAME: &[&str] = &["sendername", "sender_name", "nickname", "name", "发送者"];
    pub const SELF_FLAG: &[&str] = &["issend", "is_send", "isself", "is_self", "是否发送"];
}

// ---------------------------------------------------------------------------
// Relational columns (compared lower-cased)
// ---------------------------------------------------------------------------

pub mod db {
    pub const CONTENT: &[&str] = &["strcontent", "content", "message", "msg_content"];
    pub const TIMESTAMP: &[&str] = &["createtime", "create_time", "msgcreatetime", "time", "timestamp"];
    pub const TALKER: &[&str] = &["strtalker", "talker", "sender", "username"];
    pub const TYPE: &[&str] = &["type", "msgtype", "msg_type", "messagetype"];
    pub const SELF_FLAG: &[&str] = &["issend", "is_send", "isself", "is_self"];

    /// `(table, username column, display-name column)`, tried in order.
    pub const CONTACT_TABLES: &[(&str, &str, &str)] = &[
        ("WCContact", "userName", "nickName"),
        ("Contact", "UserName", "NickName"),
        ("Friend", "username", "nickname"),
        ("rcontact", "username", "nickname"),
    ];
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// First alias present in `record` with a usable value.
///
/// `null` and empty / whitespace-only strings are treated as absent so the
/// next alias gets a chance.
pub fn first<'a>(record: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|v| is_usable(v))
}

/// Like [`first`] but renders the value as a string.
pub fn first_string(record: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    first(record, aliases).and_then(value_to_string)
}

/// Index of the first alias found in a lower-cased header / column list.
pub fn position(columns: &[String], aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| columns.iter().position(|c| c == alias))
}

/// Render a scalar as text. Nested values become compact JSON.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Truthiness of a self-flag value: `true`, `1`, `"1"`, `"true"`, `"yes"`,
/// or the localized sent marker.
pub fn is_truthy(value: &Value, sent_marker: &str) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1) || n.as_f64() == Some(1.0),
        Value::String(s) => is_truthy_str(s, sent_marker),
        _ => false,
    }
}

pub fn is_truthy_str(raw: &str, sent_marker: &str) -> bool {
    let raw = raw.trim().to_lowercase();
    matches!(raw.as_str(), "1" | "true" | "yes")
        || (!sent_marker.is_empty() && raw == sent_marker.to_lowercase())
}

fn is_usable(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}
