//! CLI for ferry.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use ferry_core::config::{self, ParquetCompression};
use ferry_core::events::{ConsoleSink, ProgressSink, TracingSink};
use std::path::PathBuf;

use commands::{run_fetch, run_upload, run_upload_folder};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ferry")]
#[command(
    about = "ferry: fetch open-data Parquet exports and upload files to Cloud Storage",
    long_about = None
)]
pub struct Cli {
    /// Write progress to the log file instead of stdout; print only the result.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Where uploads go; unset values come from the `[storage]` config section.
#[derive(Debug, Clone, Default, Args)]
pub struct DestinationArgs {
    /// Target bucket.
    #[arg(long)]
    pub bucket: Option<String>,

    /// Top-level folder inside the bucket (default "bronze").
    #[arg(long)]
    pub folder: Option<String>,

    /// Optional second-level folder.
    #[arg(long)]
    pub subfolder: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a dataset's Parquet export into <data-dir>/<dataset>/<dataset>.parquet.
    Fetch {
        /// Dataset identifier on the portal (e.g. emplacement-des-gares-idf).
        dataset: String,

        /// Destination directory.
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// Request timeout in seconds.
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Parquet compression codec: snappy, gzip, zstd or brotli.
        #[arg(long)]
        compression: Option<ParquetCompression>,
    },

    /// Upload one file to <folder>/[<subfolder>/]<file name>.
    Upload {
        /// Local file.
        path: PathBuf,

        #[command(flatten)]
        dest: DestinationArgs,
    },

    /// Upload a folder tree, keeping relative paths.
    UploadFolder {
        /// Local folder.
        path: PathBuf,

        #[command(flatten)]
        dest: DestinationArgs,

        /// Only upload files with this extension (repeatable, case-insensitive).
        #[arg(long = "ext", value_name = "EXT")]
        extensions: Vec<String>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let mut console;
        let mut logged = TracingSink;
        let sink: &mut dyn ProgressSink = if cli.quiet {
            &mut logged
        } else {
            console = ConsoleSink::stdout();
            &mut console
        };

        match cli.command {
            CliCommand::Fetch {
                dataset,
                data_dir,
                timeout,
                compression,
            } => {
                let path = run_fetch(&cfg, &dataset, data_dir, timeout, compression, sink)?;
                if cli.quiet {
                    println!("{}", path.display());
                }
            }
            CliCommand::Upload { path, dest } => {
                let uri = run_upload(&cfg, &path, &dest, sink)?;
                if cli.quiet {
                    println!("{uri}");
                }
            }
            CliCommand::UploadFolder {
                path,
                dest,
                extensions,
            } => {
                let summary = run_upload_folder(&cfg, &path, &dest, &extensions, sink)?;
                if cli.quiet {
                    println!("{}", summary.uploaded);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
