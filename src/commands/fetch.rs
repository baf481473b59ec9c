// src/commands/fetch.rs
//! Resolve and mirror every requested package

use anyhow::{Context, Result};
use feedfetch::config::load_requests;
use feedfetch::resolver::PackageFailure;
use feedfetch::{PackageRequest, ResolutionSession, Resolver, Settings};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{load_index, open_feeds};

/// What a fetch run produced
#[derive(Debug)]
pub struct FetchReport {
    pub downloaded: usize,
    pub failures: Vec<PackageFailure>,
    pub failed_requests: Vec<String>,
    pub output_dir: PathBuf,
}

/// Run the full fetch: feeds, requests, index, resolution, summary
pub fn cmd_fetch(settings: &Settings) -> Result<FetchReport> {
    // Both inputs are checked before any network traffic
    let (repos, client) = open_feeds(settings)?;
    let requests = load_requests(&settings.packages_file)?;
    let index = load_index(&client, &repos)?;

    std::fs::create_dir_all(&settings.download_dir).with_context(|| {
        format!(
            "Failed to create download directory {}",
            settings.download_dir.display()
        )
    })?;

    println!("\nResolving and downloading with full repository structure inside groups:\n");
    let mut resolver = Resolver::from_settings(&index, &repos, &client, settings);
    let failed_requests = resolve_requests(&mut resolver, &requests);
    let session = resolver.into_session();

    let report = FetchReport {
        downloaded: session.downloaded_count(),
        failures: session.failures().to_vec(),
        failed_requests,
        output_dir: absolute_dir(&settings.download_dir),
    };
    print_summary(&report, &session);
    Ok(report)
}

fn resolve_requests<T>(resolver: &mut Resolver<'_, T>, requests: &[PackageRequest]) -> Vec<String>
where
    T: feedfetch::FeedTransport + ?Sized,
{
    let mut failed = Vec::new();
    let mut current_group: Option<&str> = None;

    for request in requests {
        let group = request.group.as_deref();
        if group.is_some() && group != current_group {
            println!("\nStarting group: {}", request.group_label());
        }
        current_group = group;

        println!("• {} (in {})", request.name, request.group_label());
        if !resolver.resolve(&request.name, group) {
            failed.push(request.name.clone());
        }
    }

    failed
}

fn print_summary(report: &FetchReport, session: &ResolutionSession) {
    info!(
        "Resolved {} packages, downloaded {} ({} already up to date)",
        session.scheduled_count(),
        session.downloaded_count(),
        session.present_count()
    );

    if !report.failures.is_empty() {
        println!("\n{} packages could not be fetched:", report.failures.len());
        for failure in &report.failures {
            println!("  - {}: {}", failure.package, failure.reason);
        }
    }

    if !report.failed_requests.is_empty() {
        println!("\nRequested packages that failed: {}", report.failed_requests.join(", "));
    }

    println!("\nFinished. Downloaded {} packages.", report.downloaded);
    println!("Files -> {}", report.output_dir.display());
}

fn absolute_dir(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
