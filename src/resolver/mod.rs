// src/resolver/mod.rs

//! Dependency resolution over feed indexes
//!
//! The [`Resolver`] drives alias resolution, repository location and
//! fetching for every package reachable from a request. All mutable state
//! lives in a [`ResolutionSession`] owned by the resolver, so independent
//! runs in one process do not interfere.

mod engine;
mod session;

pub use engine::{DependencyClosure, PackageOutcome, Resolver, dependency_closure};
pub use session::{FailureReason, PackageFailure, ResolutionSession, SkipPolicy};
