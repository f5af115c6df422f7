//! chatsift-sources — the input side of chatsift.
//!
//! Reads a bundle of export files, sniffs each one, routes it to the matching
//! `chatsift-core` normalizer and folds the results into one
//! [`ImportReport`]. Files are handled strictly one after another; a file
//! that fails contributes a [`Diagnostic`] instead of data and never aborts
//! the batch.

pub mod importer;
pub mod library;

pub use chatsift_core::DiagnosticKind;
pub use importer::{Diagnostic, ImportReport, Importer};
pub use library::MediaLibrary;
