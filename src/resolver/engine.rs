// src/resolver/engine.rs

//! Dependency resolver implementation
//!
//! Walks the implicit dependency graph from a requested package, locating
//! and fetching each archive exactly once per session. The walk uses an
//! explicit stack so deep chains do not grow the call stack; dependencies
//! are pushed in reverse so they are visited in declaration order, the same
//! pre-order a recursive walk would produce.

use crate::config::{Repository, Settings};
use crate::index::PackageIndex;
use crate::repository::{FeedTransport, FetchStatus, MirrorLayout, ensure_fetched, locate};
use tracing::{debug, info, warn};

use super::session::{FailureReason, ResolutionSession, SkipPolicy};

/// Result of visiting one name during a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    /// Matched the skip policy
    Skipped,
    /// Already scheduled or downloaded in this session
    AlreadySeen,
    /// No package or provider in the index
    Unresolved,
    /// Index entry has no archive path
    MissingFilename,
    /// No repository serves the archive
    NotFound,
    /// The archive was transferred in this run
    Fetched,
    /// The current archive was already on disk
    AlreadyPresent,
    /// Located, but the transfer failed
    FetchFailed,
}

impl PackageOutcome {
    /// Advisory success flag for a requested package
    ///
    /// Only a missing filename or an archive no feed serves count as failure;
    /// a failed transfer is recorded in the session but still reports success.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::MissingFilename | Self::NotFound)
    }
}

/// Resolves requested packages against an index and mirrors their archives
pub struct Resolver<'a, T: FeedTransport + ?Sized> {
    index: &'a PackageIndex,
    repositories: &'a [Repository],
    transport: &'a T,
    layout: MirrorLayout,
    skip: SkipPolicy,
    session: ResolutionSession,
}

impl<'a, T: FeedTransport + ?Sized> Resolver<'a, T> {
    pub fn new(
        index: &'a PackageIndex,
        repositories: &'a [Repository],
        transport: &'a T,
        layout: MirrorLayout,
    ) -> Self {
        Self {
            index,
            repositories,
            transport,
            layout,
            skip: SkipPolicy::none(),
            session: ResolutionSession::new(),
        }
    }

    /// Create a resolver with layout and skip policy taken from settings
    pub fn from_settings(
        index: &'a PackageIndex,
        repositories: &'a [Repository],
        transport: &'a T,
        settings: &Settings,
    ) -> Self {
        Self::new(
            index,
            repositories,
            transport,
            MirrorLayout::new(&settings.download_dir, &settings.release_marker),
        )
        .with_skip_policy(SkipPolicy::new(
            &settings.skip_packages,
            &settings.skip_prefixes,
        ))
    }

    /// Set the skip policy
    pub fn with_skip_policy(mut self, skip: SkipPolicy) -> Self {
        self.skip = skip;
        self
    }

    pub fn session(&self) -> &ResolutionSession {
        &self.session
    }

    pub fn into_session(self) -> ResolutionSession {
        self.session
    }

    /// Resolve a requested package and everything it depends on
    ///
    /// Archives land under `group` when one is given. The return value is
    /// the advisory outcome of the requested package itself; failures of
    /// dependencies are recorded in the session and never abort the walk.
    pub fn resolve(&mut self, name: &str, group: Option<&str>) -> bool {
        let mut stack = vec![name.to_string()];
        let mut requested = None;

        while let Some(current) = stack.pop() {
            let outcome = self.visit(&current, group, &mut stack);
            if requested.is_none() {
                requested = Some(outcome);
            }
        }

        requested.is_none_or(|outcome| outcome.is_success())
    }

    fn visit(&mut self, name: &str, group: Option<&str>, stack: &mut Vec<String>) -> PackageOutcome {
        if self.skip.should_skip(name) {
            debug!("  Skipping {} (always satisfied)", name);
            return PackageOutcome::Skipped;
        }

        if self.session.is_seen(name) {
            return PackageOutcome::AlreadySeen;
        }

        let index = self.index;
        let Some(resolved) = index.resolve_alias(name) else {
            info!("  Skipping unresolved dependency: {}", name);
            return PackageOutcome::Unresolved;
        };

        if resolved != name {
            info!("  {} provided by -> {}", name, resolved);
            if self.session.is_seen(resolved) {
                return PackageOutcome::AlreadySeen;
            }
        }

        self.session.schedule(resolved);

        let Some(record) = index.get(resolved) else {
            return PackageOutcome::Unresolved;
        };

        if !record.has_filename() {
            warn!("  No Filename entry for: {}", resolved);
            self.session
                .record_failure(resolved, FailureReason::MissingFilename);
            return PackageOutcome::MissingFilename;
        }

        let Some(located) = locate(self.transport, &record.filename, self.repositories) else {
            warn!("  Could not locate download URL for: {}", record.filename);
            self.session.record_failure(
                resolved,
                FailureReason::NotFound {
                    filename: record.filename.clone(),
                },
            );
            return PackageOutcome::NotFound;
        };

        let dest = self
            .layout
            .destination(&located.repository.url, group, &record.filename);

        let outcome = match ensure_fetched(self.transport, &dest, &located.url) {
            Ok(status) => {
                debug!("  {} -> {:?}", resolved, status);
                self.session.mark_downloaded(resolved);
                match status {
                    FetchStatus::AlreadyPresent => {
                        self.session.mark_present(resolved);
                        PackageOutcome::AlreadyPresent
                    }
                    FetchStatus::Downloaded { .. } => PackageOutcome::Fetched,
                }
            }
            Err(e) => {
                warn!("  Failed to download {}: {}", located.url, e);
                self.session
                    .record_failure(resolved, FailureReason::Transfer(e.to_string()));
                PackageOutcome::FetchFailed
            }
        };

        stack.extend(record.depends.iter().rev().cloned());
        outcome
    }
}

/// Every package reachable from a requested name, without touching the network
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyClosure {
    /// Concrete packages in visit order, the requested package first
    pub packages: Vec<String>,
    /// Names with no package or provider
    pub unresolved: Vec<String>,
    /// `(virtual name, provider)` substitutions made on the way
    pub aliases: Vec<(String, String)>,
}

/// Walk the dependency graph of `name` using only the index
///
/// Applies the same skip policy, alias resolution and cycle guard as
/// [`Resolver::resolve`].
pub fn dependency_closure(index: &PackageIndex, skip: &SkipPolicy, name: &str) -> DependencyClosure {
    let mut closure = DependencyClosure::default();
    let mut seen = ResolutionSession::new();
    let mut stack = vec![name.to_string()];

    while let Some(current) = stack.pop() {
        if skip.should_skip(&current) || seen.is_seen(&current) {
            continue;
        }

        let Some(resolved) = index.resolve_alias(&current) else {
            if !closure.unresolved.contains(&current) {
                closure.unresolved.push(current);
            }
            continue;
        };

        if resolved != current {
            closure
                .aliases
                .push((current.clone(), resolved.to_string()));
        }
        if !seen.schedule(resolved) {
            continue;
        }

        closure.packages.push(resolved.to_string());
        if let Some(record) = index.get(resolved) {
            stack.extend(record.depends.iter().rev().cloned());
        }
    }

    closure
}
