//! Dataset fetcher: download one Parquet export from the open-data portal.
//!
//! The portal serves every dataset at
//! `{api_base}/api/explore/v2.1/catalog/datasets/{name}/exports/parquet`.
//! The body is written to `<data_dir>/<name>/<name>.parquet`.

mod http;

use crate::config::{FetchConfig, ParquetCompression, DEFAULT_API_BASE};
use crate::error::TransferError;
use crate::events::{ProgressSink, TransferEvent};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Suffix of the file written while the body is being stored.
pub const PART_SUFFIX: &str = ".part";

/// How to reach the portal and what to ask it for.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub api_base: String,
    pub compression: ParquetCompression,
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            compression: ParquetCompression::Snappy,
            timeout: Duration::from_secs(300),
        }
    }
}

impl From<&FetchConfig> for FetchOptions {
    fn from(cfg: &FetchConfig) -> Self {
        Self {
            api_base: cfg.api_base.clone(),
            compression: cfg.compression,
            timeout: cfg.timeout(),
        }
    }
}

/// Dataset names are spliced into a URL path and a filesystem path, so only
/// plain slugs are accepted.
pub fn validate_dataset_name(name: &str) -> Result<(), TransferError> {
    let slug = !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if slug {
        Ok(())
    } else {
        Err(TransferError::InvalidDataset(name.to_string()))
    }
}

/// Export URL for `dataset`.
pub fn export_url(api_base: &str, dataset: &str, compression: ParquetCompression) -> String {
    format!(
        "{}/api/explore/v2.1/catalog/datasets/{}/exports/parquet?parquet_compression={}",
        api_base.trim_end_matches('/'),
        dataset,
        compression.as_str()
    )
}

/// Local destination for `dataset`: `<data_dir>/<dataset>/<dataset>.parquet`.
pub fn parquet_path(data_dir: &Path, dataset: &str) -> PathBuf {
    data_dir.join(dataset).join(format!("{dataset}.parquet"))
}

fn part_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(PART_SUFFIX);
    PathBuf::from(o)
}

/// Downloads `dataset` into `data_dir` and returns the written Parquet path.
///
/// The dataset directory is created (with parents) first. The body lands in
/// a `.part` sibling and is renamed into place only after a 2xx response was
/// fully written, so the final path never holds an error page.
pub fn fetch_dataset(
    dataset: &str,
    data_dir: &Path,
    opts: &FetchOptions,
    sink: &mut dyn ProgressSink,
) -> Result<PathBuf, TransferError> {
    validate_dataset_name(dataset)?;

    let dataset_dir = data_dir.join(dataset);
    fs::create_dir_all(&dataset_dir)
        .map_err(TransferError::io("create directory", &dataset_dir))?;
    let target = parquet_path(data_dir, dataset);

    let url = export_url(&opts.api_base, dataset, opts.compression);
    sink.emit(&TransferEvent::FetchStarted {
        dataset: dataset.to_string(),
        url: url.clone(),
    });
    tracing::debug!(dataset, url = %url, timeout_secs = opts.timeout.as_secs(), "fetching export");

    let body = http::get_bytes(&url, opts.timeout)?;

    let part = part_path(&target);
    fs::write(&part, &body).map_err(TransferError::io("write", &part))?;
    fs::rename(&part, &target).map_err(TransferError::io("rename into place", &target))?;

    let bytes = fs::metadata(&target)
        .map_err(TransferError::io("stat", &target))?
        .len();
    sink.emit(&TransferEvent::FetchFinished {
        path: target.clone(),
        bytes,
    });
    Ok(target)
}
