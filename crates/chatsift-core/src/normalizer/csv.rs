//! CSV normalizer.
//!
//! Headers vary between exporters, so each logical column is located through
//! the CSV alias table. Rows are split with a minimal quoted-field state
//! machine; a row whose cell count differs from the header is skipped.

use crate::alias::{self, csv as cols};
use crate::assemble;
use crate::config::Config;
use crate::kind::{self, CodeTable};
use crate::timestamp;
use crate::types::{Message, MessageKind, ParsedData, Session};
use std::time::Instant;

/// Resolved header positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnMap {
    pub content: Option<usize>,
    pub timestamp: Option<usize>,
    pub kind: Option<usize>,
    pub sender_id: Option<usize>,
    pub sender_name: Option<usize>,
    pub self_flag: Option<usize>,
}

impl ColumnMap {
    pub fn from_header(header: &[String]) -> Self {
        let lowered: Vec<String> = header.iter().map(|h| h.to_lowercase()).collect();
        Self {
            content: alias::position(&lowered, cols::CONTENT),
            timestamp: alias::position(&lowered, cols::TIMESTAMP),
            kind: alias::position(&lowered, cols::TYPE),
            sender_id: alias::position(&lowered, cols::SENDER_ID),
            sender_name: alias::position(&lowered, cols::SENDER_NAME),
            self_flag: alias::position(&lowered, cols::SELF_FLAG),
        }
    }
}

/// Normalize a CSV export. `source_name` names the session when every row
/// belongs to one talker.
pub fn normalize(text: &str, source_name: &str, config: &Config) -> ParsedData {
    let started = Instant::now();
    let mut lines = text
        .trim_start_matches('\u{feff}')
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .filter(|l| !l.trim().is_empty());

    let Some(header) = lines.next() else {
        return ParsedData::default();
    };
    let header = split_line(header);
    let columns = ColumnMap::from_header(&header);

    let mut messages = Vec::new();
    let mut skipped = 0usize;
    for line in lines {
        let cells = split_line(line);
        if cells.len() != header.len() {
            skipped += 1;
            continue;
        }
        match parse_row(&cells, &columns, config) {
            Some(msg) => messages.push(msg),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, source = source_name, "skipped malformed CSV rows");
    }

    messages.sort_by_key(|m| m.timestamp);
    let groups = assemble::group_by(messages, |m| m.sender_id.clone());

    let mut sessions: Vec<Session> = if groups.len() == 1 {
        groups
            .into_iter()
            .map(|(talker, msgs)| {
                let is_group = config.sessions.is_group(&talker);
                Session::new(assemble::new_id(), source_name, is_group, msgs)
            })
            .collect()
    } else {
        groups
            .into_iter()
            .map(|(talker, msgs)| {
                let name = group_name(&talker, &msgs, config);
                let is_group = config.sessions.is_group(&talker);
                Session::new(assemble::new_id(), name, is_group, msgs)
            })
            .collect()
    };
    assemble::sort_by_recency(&mut sessions);

    ParsedData::from_sessions(sessions, started.elapsed())
}

/// First message's sender name, or the raw talker id when that message is
/// self-authored, unnamed, or named with a self label.
fn group_name(talker: &str, messages: &[Message], config: &Config) -> String {
    let labels = &config.labels;
    match messages.first() {
        Some(first)
            if !first.is_self
                && !first.sender_name.is_empty()
                && first.sender_name != labels.self_name
                && !labels.is_self_marker(&first.sender_name) =>
        {
            first.sender_name.clone()
        }
        _ => talker.to_string(),
    }
}

fn parse_row(cells: &[String], columns: &ColumnMap, config: &Config) -> Option<Message> {
    let cell = |idx: Option<usize>| idx.and_then(|i| cells.get(i)).filter(|c| !c.is_empty());

    let content = cell(columns.content)?.clone();
    let is_self = cell(columns.self_flag)
        .is_some_and(|c| alias::is_truthy_str(c, &config.labels.sent_marker));
    let sender_id = cell(columns.sender_id).cloned().unwrap_or_default();
    let sender_name = cell(columns.sender_name)
        .cloned()
        .unwrap_or_else(|| config.labels.placeholder(is_self).to_string());
    let timestamp = cell(columns.timestamp)
        .map(|c| timestamp::normalize_str(c))
        .unwrap_or_else(timestamp::now_millis);
    let kind = cell(columns.kind)
        .map(|c| kind::canonicalize_str(c, CodeTable::Csv))
        .unwrap_or(MessageKind::Text);

    Some(Message {
        id: assemble::new_id(),
        sender_id,
        sender_name,
        content,
        timestamp,
        kind,
        is_self,
    })
}

/// Split one CSV line. A `"` toggles the in-quotes state, `""` inside quotes
/// is a literal quote, and commas only separate fields outside quotes.
/// Fields are trimmed.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}
