// src/commands/mod.rs
//! Command handlers for the feedfetch CLI

mod fetch;
mod query;

pub use fetch::cmd_fetch;
pub use query::{cmd_deps, cmd_show};

use anyhow::Result;
use feedfetch::config::load_feeds;
use feedfetch::{PackageIndex, Repository, RepositoryClient, Settings, build_index};

/// Load the feed list and create the HTTP client for it
fn open_feeds(settings: &Settings) -> Result<(Vec<Repository>, RepositoryClient)> {
    let repos = load_feeds(&settings.feeds_file)?;
    let client = RepositoryClient::from_settings(settings)?;
    Ok((repos, client))
}

/// Build the package index from every feed
fn load_index(client: &RepositoryClient, repos: &[Repository]) -> Result<PackageIndex> {
    println!("\nLoading package indexes from {} repositories...\n", repos.len());
    Ok(build_index(client, repos)?)
}
