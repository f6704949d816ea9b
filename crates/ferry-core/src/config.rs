use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default open-data portal serving the transit datasets.
pub const DEFAULT_API_BASE: &str = "https://data.iledefrance-mobilites.fr";

/// Default GCS JSON API endpoint.
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";

/// Compression codec requested for the Parquet export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParquetCompression {
    #[default]
    Snappy,
    Gzip,
    Zstd,
    Brotli,
}

impl ParquetCompression {
    pub fn as_str(self) -> &'static str {
        match self {
            ParquetCompression::Snappy => "snappy",
            ParquetCompression::Gzip => "gzip",
            ParquetCompression::Zstd => "zstd",
            ParquetCompression::Brotli => "brotli",
        }
    }
}

impl std::str::FromStr for ParquetCompression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "snappy" => Ok(ParquetCompression::Snappy),
            "gzip" => Ok(ParquetCompression::Gzip),
            "zstd" => Ok(ParquetCompression::Zstd),
            "brotli" => Ok(ParquetCompression::Brotli),
            other => Err(format!(
                "unknown parquet compression {other:?} (expected snappy, gzip, zstd or brotli)"
            )),
        }
    }
}

/// Dataset export settings (`[fetch]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Base URL of the open-data portal.
    pub api_base: String,
    /// Parquet compression codec requested from the portal.
    pub compression: ParquetCompression,
    /// Timeout for the whole export request, in seconds.
    pub timeout_secs: u64,
    /// Local directory that receives `<dataset>/<dataset>.parquet`.
    pub data_dir: PathBuf,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            compression: ParquetCompression::Snappy,
            timeout_secs: 300,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Object store settings (`[storage]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// GCS JSON API endpoint.
    pub endpoint: String,
    /// Default bucket; the CLI requires either this or `--bucket`.
    pub bucket: Option<String>,
    /// Top-level folder inside the bucket.
    pub folder: String,
    /// Optional second-level folder.
    pub subfolder: Option<String>,
    /// Name of the environment variable holding an OAuth2 access token.
    pub token_env: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_STORAGE_ENDPOINT.to_string(),
            bucket: None,
            folder: "bronze".to_string(),
            subfolder: None,
            token_env: "GCS_ACCESS_TOKEN".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/ferry/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FerryConfig {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ferry")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FerryConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FerryConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FerryConfig = toml::from_str(&data)?;
    Ok(cfg)
}
