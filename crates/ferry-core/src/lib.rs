//! Data-transfer helpers for an ETL pipeline: fetch a Parquet export from an
//! open-data portal, and push local files or folder trees to object storage.

pub mod config;
pub mod error;
pub mod events;
pub mod fetch;
pub mod logging;
pub mod store;
pub mod upload;

pub use error::TransferError;
pub use events::{ConsoleSink, NullSink, ProgressSink, TracingSink, TransferEvent};
pub use fetch::{fetch_dataset, FetchOptions};
pub use store::{BlobStore, GcsStore};
pub use upload::{upload_file, upload_folder, Destination, ExtensionFilter, FolderSummary};
