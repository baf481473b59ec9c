// src/config/feeds.rs

//! Feed list (`distfeeds.conf`) parsing
//!
//! Recognized lines look like `src/gz openwrt_base https://.../base`.
//! A line that does not match that shape but still contains an http(s)
//! URL is accepted under the placeholder name `unknown_repo`.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Name given to feeds whose line has no recognizable name token
pub const UNKNOWN_REPO: &str = "unknown_repo";

static FEED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(src(?:/gz)?)\s+(\S+)\s+(https?://\S+)").expect("valid feed line regex")
});

static ANY_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://").expect("valid url regex"));

/// How a feed publishes its package index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedKind {
    /// `src` - uncompressed `Packages`
    Plain,
    /// `src/gz` - gzip-compressed `Packages.gz`
    #[default]
    Gzip,
}

impl FeedKind {
    fn from_token(token: &str) -> Self {
        match token {
            "src" => Self::Plain,
            _ => Self::Gzip,
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "src"),
            Self::Gzip => write!(f, "src/gz"),
        }
    }
}

/// One remote package feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub url: String,
    pub kind: FeedKind,
}

impl Repository {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            kind: FeedKind::default(),
        }
    }

    /// Set the index kind
    pub fn with_kind(mut self, kind: FeedKind) -> Self {
        self.kind = kind;
        self
    }

    /// Build the URL of a file relative to this feed
    pub fn file_url(&self, relative: &str) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), relative)
    }
}

/// Parse feed list text into repositories, in file order
pub fn parse_feeds(text: &str) -> Vec<Repository> {
    let mut repos = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(caps) = FEED_LINE.captures(line) {
            repos.push(
                Repository::new(&caps[2], &caps[3]).with_kind(FeedKind::from_token(&caps[1])),
            );
        } else if ANY_URL.is_match(line) {
            debug!("Accepting non-standard feed line: {}", line);
            repos.push(Repository::new(UNKNOWN_REPO, line));
        }
    }

    repos
}

/// Load the feed list from disk
///
/// A missing file or a file without any usable feed is a startup error.
pub fn load_feeds(path: &Path) -> Result<Vec<Repository>> {
    if !path.exists() {
        return Err(Error::NotFoundError(format!(
            "Feed list {} not found; create it with src/gz lines",
            path.display()
        )));
    }

    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::ConfigError(format!("Failed to read {}: {e}", path.display()))
    })?;

    let repos = parse_feeds(&text);
    if repos.is_empty() {
        return Err(Error::NoRepositories(path.display().to_string()));
    }

    info!("{} repositories loaded from {}", repos.len(), path.display());
    for repo in &repos {
        info!("  - {}: {}", repo.name, repo.url);
    }

    Ok(repos)
}
