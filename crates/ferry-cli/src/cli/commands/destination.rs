//! Resolve upload destination and store from flags plus config.

use anyhow::{bail, Result};
use ferry_core::config::StorageConfig;
use ferry_core::store::GcsStore;
use ferry_core::upload::Destination;

use crate::cli::DestinationArgs;

/// Flags win over config; the bucket must come from one of them.
pub fn resolve_destination(cfg: &StorageConfig, args: &DestinationArgs) -> Result<Destination> {
    let bucket = match args.bucket.as_ref().or(cfg.bucket.as_ref()) {
        Some(b) if !b.trim().is_empty() => b.trim().to_string(),
        _ => bail!("no bucket given: pass --bucket or set storage.bucket in the config file"),
    };
    let folder = args.folder.clone().unwrap_or_else(|| cfg.folder.clone());
    let mut dest = Destination::new(bucket).with_folder(folder);
    if let Some(sub) = args.subfolder.as_ref().or(cfg.subfolder.as_ref()) {
        dest = dest.with_subfolder(sub.clone());
    }
    Ok(dest)
}

/// Builds a GCS store from the token in the env var named by `storage.token_env`.
pub fn gcs_store(cfg: &StorageConfig) -> Result<GcsStore> {
    token_from(cfg, |name| std::env::var(name).ok())
        .map(|token| GcsStore::new(cfg.endpoint.clone(), token))
}

fn token_from(cfg: &StorageConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    match lookup(&cfg.token_env) {
        Some(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
        _ => bail!(
            "no access token: set {} (e.g. from `gcloud auth print-access-token`)",
            cfg.token_env
        ),
    }
}
