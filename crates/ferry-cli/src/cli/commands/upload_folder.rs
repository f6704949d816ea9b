//! `ferry upload-folder <path>` – upload a folder tree.

use anyhow::{Context, Result};
use ferry_core::config::FerryConfig;
use ferry_core::events::ProgressSink;
use ferry_core::upload::{upload_folder, FolderSummary};
use std::path::Path;

use super::destination::{gcs_store, resolve_destination};
use crate::cli::DestinationArgs;

pub fn run_upload_folder(
    cfg: &FerryConfig,
    path: &Path,
    args: &DestinationArgs,
    extensions: &[String],
    sink: &mut dyn ProgressSink,
) -> Result<FolderSummary> {
    let dest = resolve_destination(&cfg.storage, args)?;
    let store = gcs_store(&cfg.storage)?;
    let summary = upload_folder(&store, path, &dest, Some(extensions), sink)
        .with_context(|| format!("upload folder {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        uploaded = summary.uploaded,
        skipped = summary.skipped,
        "folder uploaded"
    );
    Ok(summary)
}
