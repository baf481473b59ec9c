// src/lib.rs

//! feedfetch
//!
//! Resolves opkg packages from `src/gz` feeds, follows their dependencies
//! and mirrors every archive into a local tree laid out like the upstream
//! release directory.
//!
//! # Architecture
//!
//! - `config`: feed list, request list and settings parsing
//! - `index`: `Packages` text parsing and virtual-name resolution
//! - `repository`: HTTP transport, repository location, fetch/replace
//! - `resolver`: the dependency walk and its session state

pub mod compression;
pub mod config;
mod error;
pub mod index;
pub mod repository;
pub mod resolver;

pub use config::{FeedKind, PackageRequest, Repository, Settings};
pub use error::{Error, Result};
pub use index::{PackageIndex, PackageRecord, parse_index};
pub use repository::{FeedTransport, MirrorLayout, RepositoryClient, build_index};
pub use resolver::{PackageOutcome, ResolutionSession, Resolver, SkipPolicy};
