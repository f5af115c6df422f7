//! chatsift-core — canonical chat model and the pure normalization stages.
//!
//! Every input format converges on the same [`ParsedData`]: a list of
//! [`Session`]s each holding time-ordered [`Message`]s.
//!
//! # Architecture
//!
//! ```text
//!             ┌─► json ──┐
//! sniff ──────┼─► csv  ──┼──► assemble ──► ParsedData::merge
//!             ├─► text ──┤
//!             └─► relational
//! media (XOR recovery) runs beside the pipeline, not through it.
//! ```
//!
//! Nothing here touches the filesystem except [`config::Config::load`] and
//! [`relational::extract_path`]; file bundles are handled by
//! `chatsift-sources`.

pub mod alias;
pub mod assemble;
pub mod config;
pub mod error;
pub mod kind;
pub mod media;
pub mod normalizer;
pub mod relational;
pub mod sniff;
pub mod timestamp;
pub mod types;

pub use config::Config;
pub use error::{DiagnosticKind, ImportError};
pub use kind::CodeTable;
pub use media::{ImageFormat, RecoveredMedia};
pub use sniff::SourceFormat;
pub use types::{Message, MessageKind, ParsedData, Session};
