// src/repository/testing.rs

//! In-memory transport for unit tests

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::traits::FeedTransport;

/// Serves files from a map and records every call
#[derive(Debug, Default)]
pub struct MemoryTransport {
    files: HashMap<String, Vec<u8>>,
    broken: Vec<String>,
    probes: RefCell<Vec<String>>,
    fetches: RefCell<Vec<String>>,
    downloads: RefCell<Vec<String>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, url: &str, body: &[u8]) -> Self {
        self.files.insert(url.to_string(), body.to_vec());
        self
    }

    /// Report the URL as present but fail every transfer of it
    pub fn with_broken(mut self, url: &str) -> Self {
        self.files.insert(url.to_string(), Vec::new());
        self.broken.push(url.to_string());
        self
    }

    pub fn probes(&self) -> Vec<String> {
        self.probes.borrow().clone()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.borrow().clone()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.borrow().clone()
    }

    /// Count of network operations of any kind
    pub fn calls(&self) -> usize {
        self.probes.borrow().len() + self.fetches.borrow().len() + self.downloads.borrow().len()
    }
}

impl FeedTransport for MemoryTransport {
    fn exists(&self, url: &str) -> bool {
        self.probes.borrow_mut().push(url.to_string());
        self.files.contains_key(url)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.fetches.borrow_mut().push(url.to_string());
        self.files
            .get(url)
            .cloned()
            .ok_or_else(|| Error::DownloadError(format!("HTTP 404 Not Found from {url}")))
    }

    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        self.downloads.borrow_mut().push(url.to_string());
        if self.broken.iter().any(|b| b == url) {
            return Err(Error::DownloadError(format!("connection reset by {url}")));
        }
        let body = self
            .files
            .get(url)
            .ok_or_else(|| Error::DownloadError(format!("HTTP 404 Not Found from {url}")))?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, body)?;
        Ok(body.len() as u64)
    }
}
