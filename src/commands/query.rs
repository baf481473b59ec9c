// src/commands/query.rs
//! Index queries that never download archives

use anyhow::Result;
use feedfetch::resolver::dependency_closure;
use feedfetch::{Settings, SkipPolicy};

use super::{load_index, open_feeds};

/// Print the dependency closure of a package
pub fn cmd_deps(settings: &Settings, package: &str) -> Result<()> {
    let skip = SkipPolicy::new(&settings.skip_packages, &settings.skip_prefixes);
    if skip.should_skip(package) {
        println!("{} is always treated as satisfied", package);
        return Ok(());
    }

    let (repos, client) = open_feeds(settings)?;
    let index = load_index(&client, &repos)?;
    let closure = dependency_closure(&index, &skip, package);

    if closure.packages.is_empty() {
        println!("{} is not available in any feed", package);
        return Ok(());
    }

    println!("Dependency closure of {} ({} packages):", package, closure.packages.len());
    for name in &closure.packages {
        let version = index
            .get(name)
            .and_then(|record| record.version.as_deref())
            .unwrap_or("?");
        println!("  {} {}", name, version);
    }

    if !closure.aliases.is_empty() {
        println!("\nVirtual names:");
        for (virtual_name, provider) in &closure.aliases {
            println!("  {} -> {}", virtual_name, provider);
        }
    }

    if !closure.unresolved.is_empty() {
        println!("\nUnresolved:");
        for name in &closure.unresolved {
            println!("  {}", name);
        }
    }

    Ok(())
}

/// Print the index entry of a package
pub fn cmd_show(settings: &Settings, package: &str) -> Result<()> {
    let (repos, client) = open_feeds(settings)?;
    let index = load_index(&client, &repos)?;

    let Some(resolved) = index.resolve_alias(package) else {
        println!("{} is not available in any feed", package);
        return Ok(());
    };
    let Some(record) = index.get(resolved) else {
        return Ok(());
    };

    if resolved != package {
        println!("{} is provided by {}", package, resolved);
    }
    println!("Package: {}", resolved);
    println!("  Version: {}", record.version.as_deref().unwrap_or("unknown"));
    println!(
        "  Filename: {}",
        if record.has_filename() { record.filename.as_str() } else { "(none)" }
    );
    if !record.depends.is_empty() {
        println!("  Depends: {}", record.depends.join(", "));
    }
    if !record.provides.is_empty() {
        println!("  Provides: {}", record.provides.join(", "));
    }

    let others: Vec<&String> = index
        .providers(package)
        .iter()
        .filter(|name| name.as_str() != resolved)
        .collect();
    if !others.is_empty() {
        println!("  Other providers of {}:", package);
        for name in others {
            println!("    {}", name);
        }
    }

    Ok(())
}
