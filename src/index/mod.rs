// src/index/mod.rs

//! In-memory package index
//!
//! The index is built once per run from the merged `Packages` text of every
//! configured feed and is read-only afterwards. It holds:
//! - one [`PackageRecord`] per package name (last definition wins)
//! - the provides table mapping virtual names to the concrete packages that
//!   declare them, in build order

mod parser;
mod provides;

pub use parser::parse_index;

use std::collections::HashMap;

/// Metadata declared for a single package in a feed index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRecord {
    /// Dependency tokens, already split on `,` and `|`.
    /// Version qualifiers such as `(>= 1.2)` stay part of the token.
    pub depends: Vec<String>,
    /// Path of the archive relative to the feed URL; empty if absent
    pub filename: String,
    /// Virtual names this package satisfies
    pub provides: Vec<String>,
    /// Declared version, for display only
    pub version: Option<String>,
}

impl PackageRecord {
    /// Whether the record carries a usable archive path
    pub fn has_filename(&self) -> bool {
        !self.filename.is_empty()
    }
}

/// Unified package index across all feeds
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    packages: HashMap<String, PackageRecord>,
    provides: HashMap<String, Vec<String>>,
}

impl PackageIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a package by its exact name
    pub fn get(&self, name: &str) -> Option<&PackageRecord> {
        self.packages.get(name)
    }

    /// Whether a package with this exact name exists
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Concrete packages providing a virtual name, in build order
    pub fn providers(&self, virtual_name: &str) -> &[String] {
        self.provides
            .get(virtual_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of packages in the index
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the index holds no packages
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Number of distinct virtual names
    pub fn provides_len(&self) -> usize {
        self.provides.len()
    }

    /// Start a new record, discarding any earlier definition of the same name
    pub(crate) fn begin_record(&mut self, name: &str) {
        self.packages
            .insert(name.to_string(), PackageRecord::default());
    }

    pub(crate) fn record_mut(&mut self, name: &str) -> Option<&mut PackageRecord> {
        self.packages.get_mut(name)
    }

    pub(crate) fn add_provider(&mut self, virtual_name: &str, package: &str) {
        self.provides
            .entry(virtual_name.to_string())
            .or_default()
            .push(package.to_string());
    }
}
