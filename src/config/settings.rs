// src/config/settings.rs

//! Run settings
//!
//! Defaults reproduce the behaviour of a plain run in the working directory.
//! An optional TOML file can override any field; command-line flags are
//! applied on top by the caller.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Path segment after which a feed URL mirrors the upstream layout
pub const DEFAULT_RELEASE_MARKER: &str = "releases/24.10.5/";

/// C library variants and kernel entries that are always considered present
pub const DEFAULT_SKIP_PACKAGES: &[&str] = &[
    "libc",
    "libgcc",
    "libgcc1",
    "libpthread",
    "librt",
    "libm",
    "libdl",
    "libutil",
    "libresolv",
    "ld-linux",
    "ld.so",
    "libcrypt",
    "libnsl",
    "musl",
    "uClibc",
    "kernel",
    "kernel (=6.6.119~6a9e125268c43e0bae8cecb014c8ab03-r1)",
];

/// Name prefixes for kernel-version-pinned dependencies
pub const DEFAULT_SKIP_PREFIXES: &[&str] = &["kernel (="];

/// Settings for a fetch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Feed list file
    pub feeds_file: PathBuf,
    /// Request list file
    pub packages_file: PathBuf,
    /// Root of the local mirror tree
    pub download_dir: PathBuf,
    /// Marker used to derive the relative repository path from a feed URL
    pub release_marker: String,
    /// Timeout for existence probes, in seconds
    pub probe_timeout_secs: u64,
    /// Timeout for index fetches and archive transfers, in seconds
    pub transfer_timeout_secs: u64,
    /// Attempts for a transfer that fails at the transport level
    pub download_retries: u32,
    /// Package names that are never resolved
    pub skip_packages: Vec<String>,
    /// Package name prefixes that are never resolved
    pub skip_prefixes: Vec<String>,
    /// Show a progress bar while transferring archives
    pub show_progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feeds_file: PathBuf::from("distfeeds.conf"),
            packages_file: PathBuf::from("packages.txt"),
            download_dir: PathBuf::from("downloads"),
            release_marker: DEFAULT_RELEASE_MARKER.to_string(),
            probe_timeout_secs: 2,
            transfer_timeout_secs: 30,
            download_retries: 3,
            skip_packages: DEFAULT_SKIP_PACKAGES.iter().map(|s| s.to_string()).collect(),
            skip_prefixes: DEFAULT_SKIP_PREFIXES.iter().map(|s| s.to_string()).collect(),
            show_progress: false,
        }
    }
}

impl Settings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from TOML text; missing fields keep their defaults
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)
            .map_err(|e| Error::ConfigError(format!("Invalid settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read settings {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    /// Set the download directory
    pub fn with_download_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.download_dir = path.into();
        self
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn transfer_timeout(&self) -> Duration {
        Duration::from_secs(self.transfer_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.probe_timeout_secs == 0 || self.transfer_timeout_secs == 0 {
            return Err(Error::ConfigError(
                "timeouts must be at least one second".to_string(),
            ));
        }
        if self.download_retries == 0 {
            return Err(Error::ConfigError(
                "download_retries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
