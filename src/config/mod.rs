// src/config/mod.rs

//! Run inputs: feed list, request list and settings

mod feeds;
mod requests;
mod settings;

pub use feeds::{FeedKind, Repository, UNKNOWN_REPO, load_feeds, parse_feeds};
pub use requests::{PackageRequest, load_requests, parse_requests};
pub use settings::{DEFAULT_RELEASE_MARKER, DEFAULT_SKIP_PACKAGES, DEFAULT_SKIP_PREFIXES, Settings};
