//! `ferry fetch <dataset>` – download a Parquet export.

use anyhow::{bail, Context, Result};
use ferry_core::config::{FerryConfig, ParquetCompression};
use ferry_core::events::ProgressSink;
use ferry_core::fetch::{fetch_dataset, FetchOptions};
use std::path::PathBuf;
use std::time::Duration;

pub fn run_fetch(
    cfg: &FerryConfig,
    dataset: &str,
    data_dir: Option<PathBuf>,
    timeout_secs: Option<u64>,
    compression: Option<ParquetCompression>,
    sink: &mut dyn ProgressSink,
) -> Result<PathBuf> {
    let mut opts = FetchOptions::from(&cfg.fetch);
    if let Some(secs) = timeout_secs {
        opts.timeout = Duration::from_secs(secs);
    }
    if let Some(c) = compression {
        opts.compression = c;
    }
    // curl reads a zero timeout as "no limit".
    if opts.timeout.is_zero() {
        bail!("timeout must be at least 1 second");
    }
    let data_dir = data_dir.unwrap_or_else(|| cfg.fetch.data_dir.clone());

    let path = fetch_dataset(dataset, &data_dir, &opts, sink)
        .with_context(|| format!("fetch dataset {dataset}"))?;
    tracing::info!(dataset, path = %path.display(), "dataset fetched");
    Ok(path)
}
