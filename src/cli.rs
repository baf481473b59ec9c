// src/cli.rs
//! CLI definitions for feedfetch
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use feedfetch::Settings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "feedfetch")]
#[command(author = "feedfetch Contributors")]
#[command(version)]
#[command(about = "Mirror opkg packages and their dependencies from package feeds", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every command
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Feed list file (default: distfeeds.conf)
    #[arg(long, global = true)]
    pub feeds: Option<PathBuf>,

    /// Request list file (default: packages.txt)
    #[arg(long, global = true)]
    pub packages: Option<PathBuf>,

    /// Root of the local mirror tree (default: downloads)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Path segment after which feed URLs mirror the upstream layout
    #[arg(long, global = true)]
    pub release_marker: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Build run settings: defaults, then the settings file, then flags
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(feeds) = &self.feeds {
            settings.feeds_file = feeds.clone();
        }
        if let Some(packages) = &self.packages {
            settings.packages_file = packages.clone();
        }
        if let Some(output) = &self.output {
            settings = settings.with_download_dir(output);
        }
        if let Some(marker) = &self.release_marker {
            settings.release_marker = marker.clone();
        }

        Ok(settings)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve every requested package and download the archives (default)
    Fetch {
        /// Show a progress bar per download
        #[arg(long)]
        progress: bool,

        /// Existence probe timeout in seconds
        #[arg(long)]
        probe_timeout: Option<u64>,

        /// Index and archive transfer timeout in seconds
        #[arg(long)]
        transfer_timeout: Option<u64>,
    },

    /// Show the dependency closure of a package without downloading
    Deps {
        /// Package or virtual name
        package: String,
    },

    /// Show the index entry of a package
    Show {
        /// Package or virtual name
        package: String,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
