//! Error taxonomy for fetch and upload operations.
//!
//! Nothing here is retried or swallowed: every variant aborts the current
//! call and is handed back to the caller unchanged.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    /// Local file or folder argument does not exist. Raised before any network activity.
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Single-file upload was given something that is not a regular file.
    #[error("not a file: {}", path.display())]
    NotAFile { path: PathBuf },

    /// Folder upload was given something that is not a directory.
    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// Dataset name is not a plain slug and cannot be spliced into a URL and a path.
    #[error("invalid dataset name: {0:?}")]
    InvalidDataset(String),

    /// Dataset export answered with a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    Http { url: String, status: u32 },

    /// curl failed before a response was received (connect, timeout, TLS, ...).
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Object store rejected or failed an upload.
    #[error("upload to {bucket}/{key} failed: {message}")]
    Storage {
        bucket: String,
        key: String,
        status: Option<u32>,
        message: String,
    },

    /// Filesystem failure; `op` names what was being attempted.
    #[error("{op} {}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TransferError {
    pub(crate) fn io(op: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| TransferError::Io { op, path, source }
    }

    /// True for the errors raised by argument checks, before any remote call.
    pub fn is_local_precondition(&self) -> bool {
        matches!(
            self,
            TransferError::NotFound { .. }
                | TransferError::NotAFile { .. }
                | TransferError::NotADirectory { .. }
                | TransferError::InvalidDataset(_)
        )
    }
}
