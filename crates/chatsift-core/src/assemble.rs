//! Session assembler — rebuilds sessions from flat message streams.
//!
//! Used when the source has no session boundary of its own. Messages are
//! grouped by talker id in first-appearance order, each group becomes one
//! [`Session`], and the resulting list is ordered by recency.

use crate::config::Config;
use crate::types::{Message, Session};
use std::collections::HashMap;

/// Group key for messages whose sender id is empty.
pub const UNKNOWN_TALKER: &str = "unknown";

/// Group `messages` by key, keeping first-appearance order of the groups and
/// source order within each group.
pub fn group_by<F>(messages: Vec<Message>, key: F) -> Vec<(String, Vec<Message>)>
where
    F: Fn(&Message) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Message>)> = Vec::new();
    for msg in messages {
        let k = key(&msg);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(msg),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![msg]));
            }
        }
    }
    groups
}

pub fn talker_key(msg: &Message) -> String {
    if msg.sender_id.is_empty() {
        UNKNOWN_TALKER.to_string()
    } else {
        msg.sender_id.clone()
    }
}

/// Rebuild sessions from a flat message list.
pub fn group_flat(messages: Vec<Message>, config: &Config) -> Vec<Session> {
    let mut sessions: Vec<Session> = group_by(messages, talker_key)
        .into_iter()
        .map(|(key, msgs)| {
            let is_group = config.sessions.is_group(&key);
            let mut session = Session::new(new_id(), key.clone(), is_group, msgs);
            session.name = resolve_name(&key, session.messages(), &config.labels.other_name);
            session
        })
        .collect();
    sort_by_recency(&mut sessions);
    sessions
}

/// Display name for a talker group.
///
/// Starts from the group key. The first counterpart message carrying a real
/// name (not the "other" placeholder) sets it, and a name still equal to the
/// key or the unknown placeholder is upgraded by the next real name seen.
pub fn resolve_name(key: &str, messages: &[Message], other_placeholder: &str) -> String {
    let mut name = key.to_string();
    for msg in messages {
        if msg.is_self || msg.sender_name.is_empty() || msg.sender_name == other_placeholder {
            continue;
        }
        if name == key || name == UNKNOWN_TALKER {
            name = msg.sender_name.clone();
        }
    }
    name
}

/// Most recent session first. Stable; empty sessions sort last.
pub fn sort_by_recency(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| b.last_message_time().cmp(&a.last_message_time()));
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
