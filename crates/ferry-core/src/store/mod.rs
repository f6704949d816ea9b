//! Object store abstraction.
//!
//! Operations receive an already-constructed store handle; building it
//! (endpoint, credentials) is the caller's business.

mod gcs;

pub use gcs::GcsStore;

use crate::error::TransferError;
use std::path::Path;

/// Blocking object store that can receive a whole local file under a key.
pub trait BlobStore {
    /// URI scheme of objects in this store (`gs` for Google Cloud Storage).
    fn scheme(&self) -> &str;

    /// Uploads the content of `local_path` to `bucket`/`key`, replacing any
    /// existing object.
    fn put_file(&self, bucket: &str, key: &str, local_path: &Path) -> Result<(), TransferError>;
}

/// Canonical `scheme://bucket/key` URI.
pub fn object_uri(scheme: &str, bucket: &str, key: &str) -> String {
    format!("{scheme}://{bucket}/{key}")
}
