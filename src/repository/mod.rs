// src/repository/mod.rs

//! Feed access and the local mirror
//!
//! This module provides functionality for:
//! - Fetching and merging feed indexes
//! - Locating which feed serves an archive
//! - Mapping archives onto the local mirror layout
//! - Downloading archives and superseding stale versions

mod client;
mod fetch;
mod locator;
mod sync;
mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use client::RepositoryClient;
pub use fetch::{FetchStatus, ensure_fetched, find_superseded, remove_superseded};
pub use locator::{Located, MirrorLayout, basename, locate};
pub use sync::{build_index, fetch_index_text, index_candidates};
pub use traits::FeedTransport;
