// src/repository/client.rs

//! HTTP client for feed operations
//!
//! Provides a wrapper around reqwest with a short-timeout existence probe,
//! in-memory index fetches and streaming archive downloads with retry.

use crate::config::Settings;
use crate::error::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::traits::FeedTransport;

/// Default timeout for index fetches and transfers (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for HEAD probes (2 seconds)
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Maximum attempts for downloads failing at the transport level
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds
const RETRY_DELAY_MS: u64 = 1000;

/// Buffer size for streaming downloads (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// Stream HTTP response to file with optional progress tracking
///
/// Always streams data in chunks, never buffering the entire response in memory.
fn stream_response_to_file(
    mut response: reqwest::blocking::Response,
    file: &mut File,
    progress_bar: Option<&ProgressBar>,
) -> Result<u64> {
    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];

    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| Error::DownloadError(format!("Failed to read response: {e}")))?;

        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])
            .map_err(|e| Error::IoError(format!("Failed to write data: {e}")))?;

        downloaded += bytes_read as u64;

        if let Some(pb) = progress_bar {
            pb.set_position(downloaded);
        }
    }

    file.flush()
        .map_err(|e| Error::IoError(format!("Failed to flush data: {e}")))?;

    Ok(downloaded)
}

/// Create a styled progress bar for an archive transfer
fn create_progress_bar(size: u64, name: &str) -> ProgressBar {
    let pb = if size > 0 {
        ProgressBar::new(size)
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}")
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );
    pb.set_message(name.to_string());
    pb
}

/// Sibling path used while a transfer is in flight
fn partial_path(dest_path: &Path) -> PathBuf {
    let name = dest_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest_path.with_file_name(format!("{name}.part"))
}

/// HTTP client wrapper with retry support
pub struct RepositoryClient {
    client: Client,
    probe_timeout: Duration,
    max_retries: u32,
    show_progress: bool,
}

impl RepositoryClient {
    /// Create a client with default timeouts
    pub fn new() -> Result<Self> {
        Self::with_timeouts(HTTP_TIMEOUT, PROBE_TIMEOUT)
    }

    /// Create a client with explicit transfer and probe timeouts
    pub fn with_timeouts(transfer_timeout: Duration, probe_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(transfer_timeout)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            probe_timeout,
            max_retries: MAX_RETRIES,
            show_progress: false,
        })
    }

    /// Create a client configured from run settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(
            Self::with_timeouts(settings.transfer_timeout(), settings.probe_timeout())?
                .with_retries(settings.download_retries)
                .with_progress(settings.show_progress),
        )
    }

    /// Set the number of attempts for transfers
    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Show a progress bar during transfers
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Download a file to the specified path with retry support
    ///
    /// The body is written to a `.part` sibling and renamed into place only
    /// after the whole response has been received. Non-success statuses are
    /// not retried.
    pub fn download_file(&self, url: &str, dest_path: &Path) -> Result<u64> {
        debug!("Downloading {} to {}", url, dest_path.display());

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.client.get(url).send() {
                Ok(response) => {
                    if !response.status().is_success() {
                        return Err(Error::DownloadError(format!(
                            "HTTP {} from {}",
                            response.status(),
                            url
                        )));
                    }

                    if let Some(parent) = dest_path.parent() {
                        fs::create_dir_all(parent).map_err(|e| {
                            Error::IoError(format!(
                                "Failed to create directory {}: {e}",
                                parent.display()
                            ))
                        })?;
                    }

                    return self.write_response(response, dest_path);
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(Error::DownloadError(format!(
                            "Failed to download {url} after {attempt} attempts: {e}"
                        )));
                    }
                    warn!("Download attempt {} failed: {}, retrying...", attempt, e);
                    std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS * attempt as u64));
                }
            }
        }
    }

    fn write_response(
        &self,
        response: reqwest::blocking::Response,
        dest_path: &Path,
    ) -> Result<u64> {
        let temp_path = partial_path(dest_path);
        let display_name = dest_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let progress_bar = self
            .show_progress
            .then(|| create_progress_bar(response.content_length().unwrap_or(0), &display_name));

        let written = File::create(&temp_path)
            .map_err(|e| {
                Error::IoError(format!("Failed to create file {}: {e}", temp_path.display()))
            })
            .and_then(|mut file| stream_response_to_file(response, &mut file, progress_bar.as_ref()))
            .and_then(|bytes| {
                fs::rename(&temp_path, dest_path).map_err(|e| {
                    Error::IoError(format!(
                        "Failed to move {} to {}: {e}",
                        temp_path.display(),
                        dest_path.display()
                    ))
                })?;
                Ok(bytes)
            });

        match written {
            Ok(bytes) => {
                if let Some(pb) = &progress_bar {
                    pb.finish_with_message(format!("{display_name} [done]"));
                }
                info!("Downloaded {} bytes to {}", bytes, dest_path.display());
                Ok(bytes)
            }
            Err(e) => {
                if let Some(pb) = &progress_bar {
                    pb.abandon_with_message(format!("{display_name} [FAILED]"));
                }
                let _ = fs::remove_file(&temp_path);
                Err(e)
            }
        }
    }
}

impl FeedTransport for RepositoryClient {
    fn exists(&self, url: &str) -> bool {
        match self.client.head(url).timeout(self.probe_timeout).send() {
            Ok(response) => {
                debug!("HEAD {} -> {}", url, response.status());
                response.status().is_success()
            }
            Err(e) => {
                debug!("HEAD {} failed: {}", url, e);
                false
            }
        }
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::DownloadError(format!("Failed to fetch {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| Error::DownloadError(format!("Failed to read response: {e}")))?;

        Ok(bytes.to_vec())
    }

    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        self.download_file(url, dest)
    }
}
