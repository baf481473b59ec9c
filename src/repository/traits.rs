// src/repository/traits.rs

//! Transport seam between resolution logic and the network

use crate::error::Result;
use std::path::Path;

/// Network operations the resolver needs from a feed transport
///
/// [`super::RepositoryClient`] is the HTTP implementation. Every method
/// blocks until the operation completes or times out.
pub trait FeedTransport {
    /// Lightweight existence check for a remote file.
    ///
    /// Transport errors and timeouts are reported as "not present".
    fn exists(&self, url: &str) -> bool;

    /// Fetch a remote resource into memory
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;

    /// Transfer a remote file to `dest`, creating parent directories.
    ///
    /// On error nothing is left at `dest`. Returns the number of bytes
    /// written.
    fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}
