//! chatsift — normalize messaging-app chat exports into sessions and
//! messages.
//!
//! The binary is a thin driver; everything it does is available here so
//! integration harnesses and benches can call the layers directly.
//!
//! # Architecture
//!
//! ```text
//! files ──► chatsift_sources::Importer ──► sniff ──► chatsift_core normalizers
//!                    │                                        │
//!                    └──────── ImportReport ◄── merge ◄───────┘
//! ```

pub use chatsift_core as core;
pub use chatsift_sources as sources;

pub use chatsift_core::{Config, Message, MessageKind, ParsedData, Session};
pub use chatsift_sources::{Diagnostic, DiagnosticKind, ImportReport, Importer, MediaLibrary};
