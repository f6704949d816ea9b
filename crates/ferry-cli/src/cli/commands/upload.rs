//! `ferry upload <path>` – upload one file.

use anyhow::{Context, Result};
use ferry_core::config::FerryConfig;
use ferry_core::events::ProgressSink;
use ferry_core::upload::upload_file;
use std::path::Path;

use super::destination::{gcs_store, resolve_destination};
use crate::cli::DestinationArgs;

pub fn run_upload(
    cfg: &FerryConfig,
    path: &Path,
    args: &DestinationArgs,
    sink: &mut dyn ProgressSink,
) -> Result<String> {
    let dest = resolve_destination(&cfg.storage, args)?;
    let store = gcs_store(&cfg.storage)?;
    let uri = upload_file(&store, path, &dest, sink)
        .with_context(|| format!("upload {}", path.display()))?;
    tracing::info!(path = %path.display(), uri = %uri, "file uploaded");
    Ok(uri)
}
