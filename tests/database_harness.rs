#![allow(unused)]
//! Relational extractor integration harness.
//!
//! # What this covers
//!
//! - **Contacts**: the first populated candidate table names sessions.
//! - **Message tables**: discovered by name, columns resolved by alias,
//!   tables without a content column ignored.
//! - **Self flag**: only the integer `1` marks a self-authored message.
//! - **Encrypted input**: a file without the SQLite header is refused with
//!   `ImportError::Encrypted` and never opened.
//!
//! # What this does NOT cover
//!
//! - Decryption of any kind
//!
//! # Running
//!
//! ```sh
//! cargo test --test database_harness
//! ```

mod common;
use chatsift_core::{relational, Config, ImportError, MessageKind};
use common::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn wechat_schema_end_to_end() {
    let bundle = BundleBuilder::new().database("MSG0.db", SQL_WECHAT);
    let data = relational::extract_path(&bundle.paths()[0], &Config::defaults()).unwrap();

    assert_parsed_invariants!(data);
    assert_session_names!(data, ["Family", "Amy"]);

    let family = &data.sessions[0];
    assert!(family.is_group);
    assert_eq!(family.id, "88@chatroom");
    assert_eq!(family.messages()[1].kind, MessageKind::Voice);

    let amy = &data.sessions[1];
    assert_contents!(amy, ["hi amy", "hi!"]);
    assert!(amy.messages()[0].is_self);
    assert_eq!(amy.messages()[0].sender_name, "我");
    assert_eq!(amy.messages()[1].sender_name, "Amy");
}

#[rstest]
#[case::wc_contact("WCContact", "userName", "nickName")]
#[case::friend("Friend", "username", "nickname")]
#[case::rcontact("rcontact", "username", "nickname")]
fn each_contact_table_is_recognised(#[case] table: &str, #[case] user: &str, #[case] nick: &str) {
    let script = format!(
        "CREATE TABLE {table} ({user} TEXT, {nick} TEXT);
         INSERT INTO {table} VALUES ('wxid_q', 'Quinn');
         CREATE TABLE message (talker TEXT, content TEXT, time INTEGER);
         INSERT INTO message VALUES ('wxid_q', 'yo', 1700000000);"
    );
    let bundle = BundleBuilder::new().database("chat.sqlite", &script);
    let data = relational::extract_path(&bundle.paths()[0], &Config::defaults()).unwrap();
    assert_session_names!(data, ["Quinn"]);
}

#[test]
fn several_message_tables_pool_by_talker() {
    let bundle = BundleBuilder::new().database(
        "MSG.db",
        "CREATE TABLE MSG0 (StrTalker TEXT, StrContent TEXT, CreateTime INTEGER);
         CREATE TABLE MSG1 (StrTalker TEXT, StrContent TEXT, CreateTime INTEGER);
         INSERT INTO MSG0 VALUES ('wxid_a', 'old', 1600000000);
         INSERT INTO MSG1 VALUES ('wxid_a', 'new', 1700000000);",
    );
    let data = relational::extract_path(&bundle.paths()[0], &Config::defaults()).unwrap();
    assert_eq!(data.sessions.len(), 1);
    assert_contents!(data.sessions[0], ["old", "new"]);
}

#[test]
fn no_qualifying_tables_is_empty() {
    let bundle = BundleBuilder::new().database("misc.db", "CREATE TABLE kv (k TEXT, v TEXT);");
    let data = relational::extract_path(&bundle.paths()[0], &Config::defaults()).unwrap();
    assert!(data.is_empty());
}

#[test]
fn encrypted_database_is_refused() {
    let bundle = BundleBuilder::new().file("MSG0.db", vec![0x3Cu8; 4096]);
    let err = relational::extract_path(&bundle.paths()[0], &Config::defaults()).unwrap_err();
    assert!(matches!(err, ImportError::Encrypted), "got {err:?}");
}
