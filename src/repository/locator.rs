// src/repository/locator.rs

//! Repository location and local mirror layout
//!
//! An archive's `Filename:` is relative to whichever feed publishes it, and
//! several feeds are usually configured. The locator probes each feed in
//! configured order and the layout maps the matching feed URL onto a local
//! directory that mirrors the upstream hierarchy.

use crate::config::{DEFAULT_RELEASE_MARKER, Repository, UNKNOWN_REPO};
use std::path::PathBuf;
use tracing::debug;

use super::traits::FeedTransport;

/// A feed that serves a given archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<'a> {
    /// Absolute URL of the archive
    pub url: String,
    /// The feed that answered the probe
    pub repository: &'a Repository,
}

/// Find the first repository that serves `filename`
///
/// Probes `repository.url/filename` for each repository in order. Returns
/// `None` when no repository reports the file.
pub fn locate<'a, T: FeedTransport + ?Sized>(
    transport: &T,
    filename: &str,
    repositories: &'a [Repository],
) -> Option<Located<'a>> {
    repositories.iter().find_map(|repository| {
        let url = repository.file_url(filename);
        if transport.exists(&url) {
            debug!("Found {} in {}", filename, repository.name);
            Some(Located { url, repository })
        } else {
            None
        }
    })
}

/// Maps located archives to paths in the local mirror tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorLayout {
    root: PathBuf,
    release_marker: String,
}

impl MirrorLayout {
    pub fn new(root: impl Into<PathBuf>, release_marker: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            release_marker: release_marker.into(),
        }
    }

    /// Part of a feed URL that mirrors the upstream directory hierarchy
    ///
    /// Everything after the last occurrence of the release marker, or
    /// `unknown_repo` when the marker does not occur.
    pub fn relative_repo_path(&self, repo_url: &str) -> String {
        if self.release_marker.is_empty() {
            return UNKNOWN_REPO.to_string();
        }
        match repo_url.rsplit_once(self.release_marker.as_str()) {
            Some((_, rest)) => rest.trim_matches('/').to_string(),
            None => UNKNOWN_REPO.to_string(),
        }
    }

    /// Local path for an archive
    ///
    /// `root/[group/]relative_repo_path/basename(filename)`
    pub fn destination(&self, repo_url: &str, group: Option<&str>, filename: &str) -> PathBuf {
        let mut path = self.root.clone();
        if let Some(group) = group {
            // A leading separator would replace the root
            path.push(group.trim_start_matches(['/', '\\']));
        }
        let relative = self.relative_repo_path(repo_url);
        if !relative.is_empty() {
            path.push(relative);
        }
        path.push(basename(filename));
        path
    }
}

impl Default for MirrorLayout {
    fn default() -> Self {
        Self::new("downloads", DEFAULT_RELEASE_MARKER)
    }
}

/// Last path component of an index `Filename:` value
pub fn basename(filename: &str) -> &str {
    filename.rsplit('/').next().unwrap_or(filename)
}
