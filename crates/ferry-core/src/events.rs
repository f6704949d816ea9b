//! Progress reporting for fetch and upload operations.
//!
//! Operations never print. They emit [`TransferEvent`]s into a caller-chosen
//! [`ProgressSink`]: console lines for the CLI, structured log records, a
//! recording `Vec` in tests, or nothing at all.

use std::io::{self, Write};
use std::path::PathBuf;

use crate::upload::FolderSummary;

/// One step of a transfer, owned so sinks can keep or forward it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEvent {
    FetchStarted { dataset: String, url: String },
    FetchFinished { path: PathBuf, bytes: u64 },
    UploadStarted { path: PathBuf, key: String },
    FolderStarted { folder: PathBuf, extensions: Vec<String> },
    /// `relative` is the base name for single uploads and the `/`-separated
    /// path under the folder root for folder uploads.
    FileUploaded { relative: String, uri: String, bytes: u64 },
    FileSkipped { relative: String },
    FolderFinished { summary: FolderSummary, uri: String },
}

impl TransferEvent {
    /// Stable snake_case name, used as the `event` field in structured logs.
    pub fn name(&self) -> &'static str {
        match self {
            TransferEvent::FetchStarted { .. } => "fetch_started",
            TransferEvent::FetchFinished { .. } => "fetch_finished",
            TransferEvent::UploadStarted { .. } => "upload_started",
            TransferEvent::FolderStarted { .. } => "folder_started",
            TransferEvent::FileUploaded { .. } => "file_uploaded",
            TransferEvent::FileSkipped { .. } => "file_skipped",
            TransferEvent::FolderFinished { .. } => "folder_finished",
        }
    }
}

/// Receiver of transfer events.
pub trait ProgressSink {
    fn emit(&mut self, event: &TransferEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&mut self, _event: &TransferEvent) {}
}

impl ProgressSink for Vec<TransferEvent> {
    fn emit(&mut self, event: &TransferEvent) {
        self.push(event.clone());
    }
}

impl<F> ProgressSink for F
where
    F: FnMut(&TransferEvent),
{
    fn emit(&mut self, event: &TransferEvent) {
        self(event)
    }
}

/// Emits one `tracing` record per event, with the event name and its fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&mut self, event: &TransferEvent) {
        let name = event.name();
        match event {
            TransferEvent::FetchStarted { dataset, url } => {
                tracing::info!(event = name, dataset = %dataset, url = %url);
            }
            TransferEvent::FetchFinished { path, bytes } => {
                tracing::info!(event = name, path = %path.display(), bytes);
            }
            TransferEvent::UploadStarted { path, key } => {
                tracing::info!(event = name, path = %path.display(), key = %key);
            }
            TransferEvent::FolderStarted { folder, extensions } => {
                tracing::info!(
                    event = name,
                    path = %folder.display(),
                    extensions = %extensions.join(",")
                );
            }
            TransferEvent::FileUploaded {
                relative,
                uri,
                bytes,
            } => {
                tracing::info!(event = name, path = %relative, uri = %uri, bytes);
            }
            TransferEvent::FileSkipped { relative } => {
                tracing::debug!(event = name, path = %relative);
            }
            TransferEvent::FolderFinished { summary, uri } => {
                tracing::info!(
                    event = name,
                    uploaded = summary.uploaded,
                    skipped = summary.skipped,
                    bytes = summary.total_bytes,
                    uri = %uri
                );
            }
        }
    }
}

/// Human-readable progress lines, stdout by default.
///
/// Starts are marked `[..]`, completions `[OK]`. Inside a folder upload each
/// file gets a short `  + path` line instead of the full single-upload report.
pub struct ConsoleSink<W: Write> {
    out: W,
    in_folder: bool,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            in_folder: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_event(&mut self, event: &TransferEvent) -> io::Result<()> {
        match event {
            TransferEvent::FetchStarted { dataset, .. } => {
                writeln!(self.out, "[..] - Downloading Parquet export {dataset}...")
            }
            TransferEvent::FetchFinished { path, bytes } => {
                writeln!(self.out, "[OK] - Downloaded: {}", path.display())?;
                writeln!(self.out, "[OK] - Size: {:.2} MB", megabytes(*bytes))
            }
            TransferEvent::UploadStarted { path, .. } => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                writeln!(self.out, "[..] - Uploading {name}...")
            }
            TransferEvent::FolderStarted { folder, extensions } => {
                let name = folder
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| folder.display().to_string());
                self.in_folder = true;
                writeln!(self.out, "[..] - Uploading folder {name}...")?;
                if !extensions.is_empty() {
                    writeln!(
                        self.out,
                        "[..] - Extension filter: {}",
                        extensions.join(", ")
                    )?;
                }
                Ok(())
            }
            TransferEvent::FileUploaded {
                relative,
                uri,
                bytes,
            } => {
                if self.in_folder {
                    writeln!(self.out, "  + {relative}")
                } else {
                    writeln!(self.out, "[OK] - Uploaded: {uri}")?;
                    writeln!(self.out, "[OK] - Size: {:.2} MB", megabytes(*bytes))
                }
            }
            TransferEvent::FileSkipped { .. } => Ok(()),
            TransferEvent::FolderFinished { summary, uri } => {
                self.in_folder = false;
                writeln!(self.out, "[OK] - {} files uploaded", summary.uploaded)?;
                if summary.skipped > 0 {
                    writeln!(
                        self.out,
                        "[OK] - {} files skipped (extension not allowed)",
                        summary.skipped
                    )?;
                }
                writeln!(
                    self.out,
                    "[OK] - Total size: {:.2} MB",
                    megabytes(summary.total_bytes)
                )?;
                writeln!(self.out, "[OK] - Destination: {uri}")
            }
        }
    }
}

impl<W: Write> ProgressSink for ConsoleSink<W> {
    fn emit(&mut self, event: &TransferEvent) {
        if let Err(e) = self.write_event(event) {
            tracing::warn!("progress output failed: {}", e);
        }
    }
}

/// Bytes to MiB, for display.
pub fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / 1_048_576.0
}
