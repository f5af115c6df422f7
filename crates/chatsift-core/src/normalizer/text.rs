//! Plain-text transcript normalizer.
//!
//! Each line is tried against three shapes, in order:
//!
//! 1. `[timestamp] sender: message`
//! 2. `YYYY-MM-DD HH:MM[:SS] sender: message`
//! 3. `sender: message`
//!
//! The separator may be an ASCII or a full-width colon. A line matching none
//! of them continues the previous message. The whole transcript becomes a
//! single session.

use crate::assemble;
use crate::config::Config;
use crate::timestamp;
use crate::types::{Message, MessageKind, ParsedData, Session};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Instant;

static BRACKETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\]]+)\]\s*([^:：]+?)\s*[:：]\s*(.*)$").expect("bracketed line pattern")
});

static DATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}[-/]\d{1,2}[-/]\d{1,2}\s+\d{1,2}:\d{2}(?::\d{2})?)\s+([^:：]+?)\s*[:：]\s*(.*)$")
        .expect("dated line pattern")
});

static BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:：\[]{1,64}?)\s*[:：]\s*(.*)$").expect("bare line pattern"));

/// One recognised transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    pub timestamp: Option<&'a str>,
    pub sender: &'a str,
    pub body: &'a str,
}

/// Match a line against the three shapes. `None` means continuation.
pub fn parse_line(line: &str) -> Option<Line<'_>> {
    if let Some(caps) = BRACKETED.captures(line).or_else(|| DATED.captures(line)) {
        let (_, [ts, sender, body]) = caps.extract();
        return Some(Line {
            timestamp: Some(ts),
            sender: sender.trim(),
            body,
        });
    }
    BARE.captures(line).map(|caps| {
        let (_, [sender, body]) = caps.extract();
        Line {
            timestamp: None,
            sender: sender.trim(),
            body,
        }
    })
}

pub fn normalize(text: &str, source_name: &str, config: &Config) -> ParsedData {
    let started = Instant::now();
    let start_ms = timestamp::now_millis();
    let mut messages: Vec<Message> = Vec::new();
    let mut orphans = 0usize;

    for raw in text.trim_start_matches('\u{feff}').lines() {
        if raw.trim().is_empty() {
            continue;
        }
        match parse_line(raw) {
            Some(line) => {
                let ts = match line.timestamp {
                    Some(t) => timestamp::normalize_str(t),
                    None => messages.last().map_or(start_ms, |m| m.timestamp),
                };
                let is_self = config.labels.is_self_marker(line.sender);
                messages.push(Message {
                    id: assemble::new_id(),
                    sender_id: line.sender.to_string(),
                    sender_name: line.sender.to_string(),
                    content: line.body.trim_end().to_string(),
                    timestamp: ts,
                    kind: MessageKind::Text,
                    is_self,
                });
            }
            None => match messages.last_mut() {
                Some(prev) => {
                    if !prev.content.is_empty() {
                        prev.content.push('\n');
                    }
                    prev.content.push_str(raw.trim_end());
                }
                None => orphans += 1,
            },
        }
    }
    if orphans > 0 {
        tracing::debug!(orphans, source = source_name, "dropped lines before the first message");
    }

    messages.retain(|m| !m.content.trim().is_empty());
    if messages.is_empty() {
        return ParsedData {
            parse_time: started.elapsed(),
            ..ParsedData::default()
        };
    }

    let session = Session::new(assemble::new_id(), source_name, false, messages);
    ParsedData::from_sessions(vec![session], started.elapsed())
}
