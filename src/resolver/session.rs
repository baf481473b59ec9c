// src/resolver/session.rs

//! Resolution session state
//!
//! One session spans a whole run, across every requested package and group.

use std::collections::HashSet;
use std::fmt;

/// Names that are always treated as satisfied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipPolicy {
    names: HashSet<String>,
    prefixes: Vec<String>,
}

impl SkipPolicy {
    pub fn new<N, P>(names: N, prefixes: P) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// A policy that skips nothing
    pub fn none() -> Self {
        Self::default()
    }

    pub fn should_skip(&self, name: &str) -> bool {
        self.names.contains(name) || self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}

/// Why a scheduled package produced no archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The index entry has no `Filename:`
    MissingFilename,
    /// No repository reported the archive
    NotFound { filename: String },
    /// The transfer itself failed
    Transfer(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFilename => write!(f, "no Filename entry"),
            Self::NotFound { filename } => write!(f, "could not locate {filename}"),
            Self::Transfer(msg) => write!(f, "download failed: {msg}"),
        }
    }
}

/// A recorded per-package failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFailure {
    pub package: String,
    pub reason: FailureReason,
}

/// Mutable state of one resolution run
#[derive(Debug, Default)]
pub struct ResolutionSession {
    to_download: HashSet<String>,
    downloaded: HashSet<String>,
    present: HashSet<String>,
    failures: Vec<PackageFailure>,
}

impl ResolutionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the name was already scheduled or downloaded
    pub fn is_seen(&self, name: &str) -> bool {
        self.is_scheduled(name) || self.is_downloaded(name)
    }

    pub fn is_scheduled(&self, name: &str) -> bool {
        self.to_download.contains(name)
    }

    pub fn is_downloaded(&self, name: &str) -> bool {
        self.downloaded.contains(name)
    }

    /// Schedule a name; returns false if it was already scheduled
    pub fn schedule(&mut self, name: &str) -> bool {
        self.to_download.insert(name.to_string())
    }

    pub fn mark_downloaded(&mut self, name: &str) {
        self.downloaded.insert(name.to_string());
    }

    /// Note that a downloaded name was already current on disk
    pub fn mark_present(&mut self, name: &str) {
        self.present.insert(name.to_string());
    }

    pub fn record_failure(&mut self, package: &str, reason: FailureReason) {
        self.failures.push(PackageFailure {
            package: package.to_string(),
            reason,
        });
    }

    pub fn scheduled_count(&self) -> usize {
        self.to_download.len()
    }

    pub fn downloaded_count(&self) -> usize {
        self.downloaded.len()
    }

    /// Downloaded names that needed no transfer
    pub fn present_count(&self) -> usize {
        self.present.len()
    }

    /// Downloaded package names, sorted
    pub fn downloaded(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.downloaded.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Failures in the order they happened
    pub fn failures(&self) -> &[PackageFailure] {
        &self.failures
    }
}
