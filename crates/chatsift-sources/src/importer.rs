//! Batch importer: read, sniff, route, merge.
//!
//! Each input is parsed to completion before the next one is read, and its
//! result is merged into the report only after it finishes. Reading is the
//! only suspension point.

use crate::library::MediaLibrary;
use chatsift_core::normalizer::{self, csv, json, text};
use chatsift_core::sniff::{self, SourceFormat};
use chatsift_core::{media, relational};
use chatsift_core::{Config, DiagnosticKind, ImportError, ParsedData, RecoveredMedia};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

/// One input that contributed nothing because it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// File name (or the caller-supplied name for in-memory input).
    pub source: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn from_error(source: impl Into<String>, err: &ImportError) -> Self {
        Self {
            source: source.into(),
            kind: err.diagnostic_kind(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.source, self.kind, self.message)
    }
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub data: ParsedData,
    pub media: MediaLibrary,
    pub diagnostics: Vec<Diagnostic>,
}

impl ImportReport {
    /// No input failed.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn record(&mut self, source: &str, outcome: Result<Parsed, ImportError>) {
        match outcome {
            Ok(Parsed::Data(data)) => {
                debug!(
                    source,
                    sessions = data.sessions.len(),
                    messages = data.total_messages,
                    "merged input"
                );
                self.data.merge(data);
            }
            Ok(Parsed::Media(name, recovered)) => {
                debug!(source, format = %recovered.format, "recovered attachment");
                if let Some(previous) = self.media.insert(name.clone(), recovered) {
                    warn!(
                        source,
                        attachment = %name,
                        replaced = %previous.format,
                        "attachment name already imported, keeping the later file"
                    );
                }
            }
            Err(err) => {
                warn!(source, error = %err, "input skipped");
                self.diagnostics.push(Diagnostic::from_error(source, &err));
            }
        }
    }
}

/// What a single input turned into.
enum Parsed {
    Data(ParsedData),
    Media(String, RecoveredMedia),
}

pub struct Importer {
    config: Config,
}

impl Importer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Import every path in order. Never fails as a whole; per-file failures
    /// end up in [`ImportReport::diagnostics`].
    pub async fn import_paths(&self, paths: &[PathBuf]) -> ImportReport {
        let mut report = ImportReport::default();
        for path in paths {
            let source = display_name(path);
            let outcome = self.import_path(path, &source).await;
            report.record(&source, outcome);
        }
        info!(
            files = paths.len(),
            sessions = report.data.sessions.len(),
            messages = report.data.total_messages,
            media = report.media.len(),
            diagnostics = report.diagnostics.len(),
            "import finished"
        );
        report
    }

    /// Run one in-memory input through the same routing. `name` supplies the
    /// extension hint and names single-session results. Databases need a
    /// path and are reported as unsupported here.
    pub fn import_bytes(&self, name: &str, bytes: &[u8]) -> ImportReport {
        let mut report = ImportReport::default();
        let path = Path::new(name);
        let format = sniff::sniff(path, head_of(bytes));
        let outcome = match format {
            SourceFormat::Database => Err(ImportError::Unsupported(format!(
                "{name}: databases can only be imported from a file path"
            ))),
            _ => self.parse_bytes(format, path, name, bytes),
        };
        report.record(name, outcome);
        report
    }

    async fn import_path(&self, path: &Path, source: &str) -> Result<Parsed, ImportError> {
        let mut head = Vec::with_capacity(sniff::PROBE_LEN);
        tokio::fs::File::open(path)
            .await?
            .take(sniff::PROBE_LEN as u64)
            .read_to_end(&mut head)
            .await?;

        let format = sniff::sniff(path, &head);
        debug!(source, %format, "sniffed input");

        if format == SourceFormat::Database {
            return relational::extract_path(path, &self.config).map(Parsed::Data);
        }
        let bytes = tokio::fs::read(path).await?;
        self.parse_bytes(format, path, source, &bytes)
    }

    fn parse_bytes(
        &self,
        format: SourceFormat,
        path: &Path,
        source: &str,
        bytes: &[u8],
    ) -> Result<Parsed, ImportError> {
        match format {
            SourceFormat::Json => {
                let decoded = normalizer::decode_text(bytes);
                json::normalize_str(&decoded, &self.config).map(Parsed::Data)
            }
            SourceFormat::Csv => {
                let decoded = normalizer::decode_text(bytes);
                Ok(Parsed::Data(csv::normalize(&decoded, source, &self.config)))
            }
            SourceFormat::Text => {
                let decoded = normalizer::decode_text(bytes);
                Ok(Parsed::Data(text::normalize(&decoded, source, &self.config)))
            }
            SourceFormat::Media => {
                let recovered = media::recover(bytes).ok_or(ImportError::UnrecoverableMedia)?;
                Ok(Parsed::Media(attachment_name(path), recovered))
            }
            SourceFormat::EncryptedDatabase => Err(ImportError::Encrypted),
            SourceFormat::Database | SourceFormat::Unsupported => Err(ImportError::Unsupported(
                format!("{source}: no known export format matched"),
            )),
        }
    }
}

fn head_of(bytes: &[u8]) -> &[u8] {
    &bytes[..bytes.len().min(sniff::PROBE_LEN)]
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// File stem, so `abc123.dat` is stored as `abc123`.
fn attachment_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| display_name(path))
}
