//! Single-file and folder uploads to a [`BlobStore`].
//!
//! Keys are built as `<folder>/[<subfolder>/]<name-or-relative-path>`, always
//! with `/` separators. Local arguments are checked before the store is
//! touched; after that every store failure aborts the call as-is, leaving
//! files uploaded so far in place.

mod filter;
mod walk;

pub use filter::ExtensionFilter;
pub use walk::{relative_key, walk_files};

use crate::error::TransferError;
use crate::events::{ProgressSink, TransferEvent};
use crate::store::{object_uri, BlobStore};
use std::fs;
use std::io;
use std::path::Path;

/// Where uploads land: a bucket plus a one- or two-level folder prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub bucket: String,
    pub folder: String,
    pub subfolder: Option<String>,
}

impl Destination {
    /// Destination in `bucket` under the default `bronze` folder.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            folder: "bronze".to_string(),
            subfolder: None,
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn with_subfolder(mut self, subfolder: impl Into<String>) -> Self {
        self.subfolder = Some(subfolder.into());
        self
    }

    /// Folder and subfolder joined with `/`; empty segments are dropped.
    pub fn prefix(&self) -> String {
        [Some(self.folder.as_str()), self.subfolder.as_deref()]
            .into_iter()
            .flatten()
            .map(|s| s.trim_matches('/'))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Object key for `relative` (a base name or `/`-separated relative path).
    pub fn object_key(&self, relative: &str) -> String {
        let prefix = self.prefix();
        let relative = relative.trim_start_matches('/');
        if prefix.is_empty() {
            relative.to_string()
        } else {
            format!("{prefix}/{relative}")
        }
    }

    /// URI of the destination folder, with a trailing `/`. It names the key
    /// prefix files land under, not the local folder that was uploaded.
    pub fn folder_uri(&self, scheme: &str) -> String {
        let prefix = self.prefix();
        if prefix.is_empty() {
            format!("{scheme}://{}/", self.bucket)
        } else {
            format!("{scheme}://{}/{prefix}/", self.bucket)
        }
    }
}

/// Outcome of a folder upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    /// Files uploaded.
    pub uploaded: usize,
    /// Files rejected by the extension filter.
    pub skipped: usize,
    /// Sum of the sizes of uploaded files.
    pub total_bytes: u64,
}

fn stat_existing(path: &Path) -> Result<fs::Metadata, TransferError> {
    fs::metadata(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            TransferError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            TransferError::Io {
                op: "stat",
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Uploads one local file to `<folder>/[<subfolder>/]<file name>` and returns
/// its `scheme://bucket/key` URI.
pub fn upload_file(
    store: &dyn BlobStore,
    path: &Path,
    dest: &Destination,
    sink: &mut dyn ProgressSink,
) -> Result<String, TransferError> {
    let meta = stat_existing(path)?;
    if !meta.is_file() {
        return Err(TransferError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    let name = match path.file_name() {
        Some(n) => n.to_string_lossy().into_owned(),
        None => {
            return Err(TransferError::NotAFile {
                path: path.to_path_buf(),
            })
        }
    };

    let key = dest.object_key(&name);
    sink.emit(&TransferEvent::UploadStarted {
        path: path.to_path_buf(),
        key: key.clone(),
    });
    store.put_file(&dest.bucket, &key, path)?;

    let uri = object_uri(store.scheme(), &dest.bucket, &key);
    sink.emit(&TransferEvent::FileUploaded {
        relative: name,
        uri: uri.clone(),
        bytes: meta.len(),
    });
    Ok(uri)
}

/// Uploads every regular file under `folder`, keeping the relative layout.
///
/// `extensions` is an allow-list of suffixes (`"csv"` or `".CSV"` alike);
/// `None` or an empty list uploads everything. Returns counts and bytes;
/// `summary.uploaded` is the number of files sent.
pub fn upload_folder(
    store: &dyn BlobStore,
    folder: &Path,
    dest: &Destination,
    extensions: Option<&[String]>,
    sink: &mut dyn ProgressSink,
) -> Result<FolderSummary, TransferError> {
    let meta = stat_existing(folder)?;
    if !meta.is_dir() {
        return Err(TransferError::NotADirectory {
            path: folder.to_path_buf(),
        });
    }
    let filter = ExtensionFilter::from_option(extensions);

    sink.emit(&TransferEvent::FolderStarted {
        folder: folder.to_path_buf(),
        extensions: filter
            .as_ref()
            .map(|f| f.extensions().to_vec())
            .unwrap_or_default(),
    });

    let mut summary = FolderSummary::default();
    for file in walk_files(folder)? {
        let Some(relative) = relative_key(folder, &file) else {
            continue;
        };
        if let Some(filter) = &filter {
            if !filter.matches(&file) {
                summary.skipped += 1;
                sink.emit(&TransferEvent::FileSkipped { relative });
                continue;
            }
        }

        let bytes = fs::metadata(&file)
            .map_err(TransferError::io("stat", &file))?
            .len();
        let key = dest.object_key(&relative);
        store.put_file(&dest.bucket, &key, &file)?;

        summary.uploaded += 1;
        summary.total_bytes += bytes;
        sink.emit(&TransferEvent::FileUploaded {
            relative,
            uri: object_uri(store.scheme(), &dest.bucket, &key),
            bytes,
        });
    }

    tracing::debug!(
        folder = %folder.display(),
        uploaded = summary.uploaded,
        skipped = summary.skipped,
        bytes = summary.total_bytes,
        "folder upload complete"
    );
    sink.emit(&TransferEvent::FolderFinished {
        summary,
        uri: dest.folder_uri(store.scheme()),
    });
    Ok(summary)
}
