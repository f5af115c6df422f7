//! Static export corpora used across harnesses.
//!
//! Every corpus is small and deterministic: all timestamps are explicit so
//! nothing depends on the wall clock.

/// `[{ messages: [...] }, ...]`
pub const JSON_SESSION_ARRAY: &str = r#"[
  {"id": "wxid_amy", "name": "Amy", "messages": [
    {"content": "morning", "senderId": "wxid_amy", "senderName": "Amy", "timestamp": 1700000100000, "type": 1},
    {"content": "hey", "senderId": "me", "isSelf": true, "timestamp": 1700000000000, "type": 1}
  ]},
  {"id": "42@chatroom", "name": "Hiking", "messages": [
    {"content": "trail.jpg", "senderName": "Bo", "timestamp": 1700000200, "type": 3}
  ]}
]"#;

/// A flat message array from two talkers, interleaved.
pub const JSON_MESSAGE_ARRAY: &str = r#"[
  {"StrContent": "a1", "StrTalker": "wxid_a", "nickName": "Ann", "CreateTime": 1700000000},
  {"StrContent": "b1", "StrTalker": "wxid_b", "nickName": "Ben", "CreateTime": 1700000100},
  {"StrContent": "a2", "StrTalker": "wxid_a", "IsSend": 1, "CreateTime": 1700000200}
]"#;

/// `{ chatList: [...] }`
pub const JSON_SESSION_OBJECT: &str = r#"{
  "sessionId": "wxid_c",
  "title": "Cat",
  "chatList": [
    {"text": "meow", "time": "2024-01-15T10:00:00Z", "msgType": "voice"}
  ]
}"#;

/// `{ talker: [...] }`
pub const JSON_KEYED: &str = r#"{
  "wxid_d": [{"content": "dee", "timestamp": 1700000000000}],
  "wxid_e": [{"content": "eee", "timestamp": 1700000300000}]
}"#;

pub const CSV_EXPORT: &str = "\
StrContent,CreateTime,StrTalker,NickName,IsSend,Type
\"hello, amy\",1700000000,wxid_amy,我,1,1
hi back,1700000060,wxid_amy,Amy,0,1
photo,1700000120,wxid_amy,Amy,0,3
";

pub const TEXT_TRANSCRIPT: &str = "\
[2024-01-15 10:00:00] Amy: are we still on for tonight?
[2024-01-15 10:01:00] Me: yes
see you at 8
2024-01-15 10:05 Amy：great
";

/// WeChat-style schema: contact table plus one message table.
pub const SQL_WECHAT: &str = "
CREATE TABLE Contact (UserName TEXT, NickName TEXT);
INSERT INTO Contact VALUES ('wxid_amy', 'Amy'), ('88@chatroom', 'Family');
CREATE TABLE MSG (localId INTEGER PRIMARY KEY, StrTalker TEXT, StrContent TEXT,
                  CreateTime INTEGER, Type INTEGER, IsSend INTEGER);
INSERT INTO MSG (StrTalker, StrContent, CreateTime, Type, IsSend) VALUES
  ('wxid_amy', 'hi amy', 1700000000, 1, 1),
  ('wxid_amy', 'hi!', 1700000030, 1, 0),
  ('88@chatroom', 'dinner?', 1700000100, 1, 0),
  ('88@chatroom', 'voice note', 1700000160, 34, 0);
";

/// XOR-obfuscate `plain` with `key`.
pub fn obfuscate(plain: &[u8], key: u8) -> Vec<u8> {
    plain.iter().map(|b| b ^ key).collect()
}

/// First bytes of a real PNG.
pub const PNG_HEAD: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
