//! Configuration types for chatsift.
//!
//! [`Config::load`] reads `~/.config/chatsift/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::from_path`] layers
//! an explicit file over the defaults, and [`Config::defaults`] returns the
//! defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[labels]
self_name    = "我"
other_name   = "对方"
sent_marker  = "发送"
self_markers = ["我", "me", "self", "myself"]

[sessions]
group_marker = "@chatroom"

[database]
row_limit = 100000
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level import configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub labels: LabelsConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// `[labels]` section: localized placeholders and self-detection markers.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelsConfig {
    /// Sender name used for self-authored messages with no richer name.
    #[serde(default = "default_self_name")]
    pub self_name: String,
    /// Sender name used for counterpart messages with no richer name.
    #[serde(default = "default_other_name")]
    pub other_name: String,
    /// Localized "sent" value accepted as a truthy self-flag.
    #[serde(default = "default_sent_marker")]
    pub sent_marker: String,
    /// Transcript sender labels meaning "me", compared case-insensitively.
    #[serde(default = "default_self_markers")]
    pub self_markers: Vec<String>,
}

fn default_self_name() -> String { "我".to_string() }
fn default_other_name() -> String { "对方".to_string() }
fn default_sent_marker() -> String { "发送".to_string() }
fn default_self_markers() -> Vec<String> {
    ["我", "me", "self", "myself"].iter().map(|s| s.to_string()).collect()
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            self_name: default_self_name(),
            other_name: default_other_name(),
            sent_marker: default_sent_marker(),
            self_markers: default_self_markers(),
        }
    }
}

impl LabelsConfig {
    /// Placeholder sender name for a message with no name of its own.
    pub fn placeholder(&self, is_self: bool) -> &str {
        if is_self {
            &self.self_name
        } else {
            &self.other_name
        }
    }

    pub fn is_self_marker(&self, label: &str) -> bool {
        let label = label.trim().to_lowercase();
        self.self_markers.iter().any(|m| m.to_lowercase() == label)
    }
}

/// `[sessions]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionsConfig {
    /// Substring of a talker id that marks a group chat.
    #[serde(default = "default_group_marker")]
    pub group_marker: String,
}

fn default_group_marker() -> String { "@chatroom".to_string() }

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            group_marker: default_group_marker(),
        }
    }
}

impl SessionsConfig {
    pub fn is_group(&self, talker: &str) -> bool {
        !self.group_marker.is_empty() && talker.contains(&self.group_marker)
    }
}

/// `[database]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Maximum rows read from any one message table.
    #[serde(default = "default_row_limit")]
    pub row_limit: u32,
}

fn default_row_limit() -> u32 { 100_000 }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            row_limit: default_row_limit(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/chatsift/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::from_path(&path)
    }

    /// Layer an explicit TOML file over the built-in defaults. The file must
    /// exist.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(true))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("chatsift")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
