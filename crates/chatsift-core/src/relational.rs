//! Relational extractor — pulls contacts and messages out of a decrypted
//! chat database whose schema is not known in advance.
//!
//! Candidate contact tables and message-table/column names are data (see
//! [`alias::db`]); the extractor walks them until something usable turns
//! up. A schema with nothing recognisable yields an empty result, not an
//! error. Encryption is never attempted: a file without the SQLite magic is
//! reported as [`ImportError::Encrypted`].

use crate::alias::{self, db as cols};
use crate::assemble;
use crate::config::Config;
use crate::error::{ImportError, Result};
use crate::kind::{self, CodeTable};
use crate::sniff;
use crate::timestamp;
use crate::types::{Message, ParsedData, Session};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};

/// Talker id to display name.
pub type Contacts = HashMap<String, String>;

/// Verify the SQLite header, open read-only, and extract.
pub fn extract_path(path: &Path, config: &Config) -> Result<ParsedData> {
    let mut head = Vec::with_capacity(sniff::SQLITE_MAGIC.len());
    std::fs::File::open(path)?
        .take(sniff::SQLITE_MAGIC.len() as u64)
        .read_to_end(&mut head)?;
    if !sniff::is_plain_sqlite(&head) {
        return Err(ImportError::Encrypted);
    }

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    extract(&conn, config)
}

pub fn extract(conn: &Connection, config: &Config) -> Result<ParsedData> {
    let started = Instant::now();
    let contacts = load_contacts(conn)?;

    let mut messages = Vec::new();
    for table in message_tables(conn)? {
        match extract_table(conn, &table, &contacts, config) {
            Ok(mut rows) => {
                debug!(table = %table, rows = rows.len(), "extracted message table");
                messages.append(&mut rows);
            }
            Err(e) => warn!(table = %table, error = %e, "skipping unreadable message table"),
        }
    }

    let mut sessions: Vec<Session> = assemble::group_by(messages, assemble::talker_key)
        .into_iter()
        .map(|(talker, msgs)| {
            let name = contacts.get(&talker).cloned().unwrap_or_else(|| talker.clone());
            let is_group = config.sessions.is_group(&talker);
            Session::new(talker, name, is_group, msgs)
        })
        .collect();
    assemble::sort_by_recency(&mut sessions);

    Ok(ParsedData::from_sessions(sessions, started.elapsed()))
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

/// The first candidate contact table that exists and yields rows wins.
pub fn load_contacts(conn: &Connection) -> Result<Contacts> {
    for &(table, user_col, name_col) in cols::CONTACT_TABLES {
        let Some(table) = find_table(conn, table)? else {
            continue;
        };
        match read_contacts(conn, &table, user_col, name_col) {
            Ok(contacts) if !contacts.is_empty() => {
                debug!(table = %table, contacts = contacts.len(), "loaded contacts");
                return Ok(contacts);
            }
            Ok(_) => continue,
            Err(e) => warn!(table = %table, error = %e, "skipping contact table"),
        }
    }
    Ok(Contacts::new())
}

fn read_contacts(conn: &Connection, table: &str, user_col: &str, name_col: &str) -> Result<Contacts> {
    let columns = column_names(conn, table)?;
    let find = |wanted: &str| columns.iter().find(|c| c.eq_ignore_ascii_case(wanted));
    let (Some(user), Some(name)) = (find(user_col), find(name_col)) else {
        return Ok(Contacts::new());
    };

    let sql = format!("SELECT {}, {} FROM {}", quote(user), quote(name), quote(table));
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, SqlValue>(0)?, row.get::<_, SqlValue>(1)?)))?;

    let mut contacts = Contacts::new();
    for row in rows {
        let (user, name) = row?;
        if let (Some(user), Some(name)) = (sql_text(user), sql_text(name)) {
            if !user.is_empty() && !name.is_empty() {
                contacts.insert(user, name);
            }
        }
    }
    Ok(contacts)
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Whether a table name looks like it holds messages.
pub fn is_message_table(name: &str) -> bool {
    let upper = name.to_uppercase();
    upper.contains("MSG") || upper.starts_with("CHAT_") || name.to_lowercase().contains("message")
}

pub fn message_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names.into_iter().filter(|n| is_message_table(n)).collect())
}

/// Resolved message columns for one table; real (not lower-cased) names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageColumns {
    pub content: String,
    pub timestamp: Option<String>,
    pub talker: Option<String>,
    pub kind: Option<String>,
    pub self_flag: Option<String>,
}

impl MessageColumns {
    /// `None` when the table has no content column.
    pub fn resolve(columns: &[String]) -> Option<Self> {
        let lowered: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();
        let pick = |aliases: &[&str]| alias::position(&lowered, aliases).map(|i| columns[i].clone());
        Some(Self {
            content: pick(cols::CONTENT)?,
            timestamp: pick(cols::TIMESTAMP),
            talker: pick(cols::TALKER),
            kind: pick(cols::TYPE),
            self_flag: pick(cols::SELF_FLAG),
        })
    }

    fn select_sql(&self, table: &str) -> String {
        let col = |c: &Option<String>| c.as_deref().map(quote).unwrap_or_else(|| "NULL".to_string());
        format!(
            "SELECT {}, {}, {}, {}, {} FROM {} LIMIT ?1",
            quote(&self.content),
            col(&self.timestamp),
            col(&self.talker),
            col(&self.kind),
            col(&self.self_flag),
            quote(table),
        )
    }
}

struct RawRow {
    content: SqlValue,
    timestamp: SqlValue,
    talker: SqlValue,
    kind: SqlValue,
    self_flag: SqlValue,
}

fn extract_table(
    conn: &Connection,
    table: &str,
    contacts: &Contacts,
    config: &Config,
) -> Result<Vec<Message>> {
    let Some(columns) = MessageColumns::resolve(&column_names(conn, table)?) else {
        debug!(table, "no content column, skipping");
        return Ok(Vec::new());
    };

    let mut stmt = conn.prepare(&columns.select_sql(table))?;
    let rows = stmt.query_map(params![config.database.row_limit], |row| {
        Ok(RawRow {
            content: row.get(0)?,
            timestamp: row.get(1)?,
            talker: row.get(2)?,
            kind: row.get(3)?,
            self_flag: row.get(4)?,
        })
    })?;

    // Per-conversation tables carry no talker column; the table stands in.
    let table_talker = columns.talker.is_none().then_some(table);
    let mut messages = Vec::new();
    for row in rows {
        if let Some(msg) = build_message(row?, table_talker, contacts, config) {
            messages.push(msg);
        }
    }
    Ok(messages)
}

/// `table_talker` is set only when the table has no talker column. A NULL
/// talker otherwise stays empty and groups under the unknown talker.
fn build_message(
    row: RawRow,
    table_talker: Option<&str>,
    contacts: &Contacts,
    config: &Config,
) -> Option<Message> {
    let content = sql_text(row.content).filter(|c| !c.trim().is_empty())?;
    let talker = match table_talker {
        Some(table) => table.to_string(),
        None => sql_text(row.talker).unwrap_or_default(),
    };
    let is_self = matches!(row.self_flag, SqlValue::Integer(1));
    let sender_name = if is_self {
        config.labels.self_name.clone()
    } else if talker.is_empty() {
        config.labels.other_name.clone()
    } else {
        contacts.get(&talker).cloned().unwrap_or_else(|| talker.clone())
    };

    Some(Message {
        id: assemble::new_id(),
        sender_id: talker,
        sender_name,
        content,
        timestamp: timestamp::normalize(&sql_json(row.timestamp)),
        kind: kind::canonicalize(&sql_json(row.kind), CodeTable::Structured),
        is_self,
    })
}

// ---------------------------------------------------------------------------
// Schema helpers
// ---------------------------------------------------------------------------

/// Real name of a table, matched case-insensitively.
pub fn find_table(conn: &Connection, name: &str) -> Result<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
            params![name],
            |row| row.get(0),
        )
        .optional()?)
}

pub fn column_names(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote(table)))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn sql_text(value: SqlValue) -> Option<String> {
    match value {
        SqlValue::Null => None,
        SqlValue::Integer(i) => Some(i.to_string()),
        SqlValue::Real(f) => Some(f.to_string()),
        SqlValue::Text(s) => Some(s),
        SqlValue::Blob(b) => Some(String::from_utf8_lossy(&b).into_owned()),
    }
}

fn sql_json(value: SqlValue) -> serde_json::Value {
    match value {
        SqlValue::Integer(i) => serde_json::Value::from(i),
        SqlValue::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        SqlValue::Text(s) => serde_json::Value::String(s),
        SqlValue::Null | SqlValue::Blob(_) => serde_json::Value::Null,
    }
}
