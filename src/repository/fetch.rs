// src/repository/fetch.rs

//! Fetch/replace decisions for archives in the local mirror
//!
//! opkg archive names follow `<package>_<version>_<arch>.ipk`. A file in the
//! destination directory that shares the `<package>_` prefix and extension
//! but not the full name is an older (or otherwise different) build of the
//! same package and is removed before the new one is fetched.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::traits::FeedTransport;

/// What [`ensure_fetched`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// The destination already held a non-empty file; no network call made
    AlreadyPresent,
    /// The archive was transferred
    Downloaded { bytes: u64 },
}

/// Find a same-package file that the destination supersedes
///
/// Returns the stale file only when exactly one candidate exists in the
/// destination directory and its name differs from the destination's.
pub fn find_superseded(dest: &Path) -> Option<PathBuf> {
    let file_name = dest.file_name()?.to_str()?;
    let dir = dest.parent()?;
    let prefix = format!("{}_", file_name.split('_').next().unwrap_or(file_name));
    let extension = dest.extension();

    let entries = fs::read_dir(dir).ok()?;
    let candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension() == extension
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
        })
        .collect();

    match candidates.as_slice() {
        [only] if only.file_name() != dest.file_name() => Some(only.clone()),
        _ => None,
    }
}

/// Remove a superseded same-package file, if any
///
/// Deletion failure is logged and otherwise ignored. Returns the path that
/// was removed.
pub fn remove_superseded(dest: &Path) -> Option<PathBuf> {
    let stale = find_superseded(dest)?;
    info!(
        "Newer version detected. Removing old file: {}",
        stale.file_name().unwrap_or_default().to_string_lossy()
    );
    match fs::remove_file(&stale) {
        Ok(()) => Some(stale),
        Err(e) => {
            warn!("Could not remove old file {}: {}", stale.display(), e);
            None
        }
    }
}

/// Make sure `dest` holds the archive published at `url`
///
/// Supersedes a differently-versioned file of the same package, reuses an
/// existing non-empty destination without touching the network, and
/// otherwise downloads. Errors are ordinary results for the caller to log.
pub fn ensure_fetched<T: FeedTransport + ?Sized>(
    transport: &T,
    dest: &Path,
    url: &str,
) -> Result<FetchStatus> {
    remove_superseded(dest);

    let display_name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if is_present(dest) {
        info!("Already exists (current version): {}", display_name);
        return Ok(FetchStatus::AlreadyPresent);
    }

    info!("Downloading new version: {}", display_name);
    let bytes = transport.download(url, dest)?;
    debug!("Fetched {} ({} bytes)", url, bytes);
    Ok(FetchStatus::Downloaded { bytes })
}

fn is_present(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}
