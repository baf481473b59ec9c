// src/repository/sync.rs

//! Feed index synchronization
//!
//! Fetches each feed's `Packages` index and builds the unified
//! [`PackageIndex`] from the concatenated text.

use crate::compression::decode_index;
use crate::config::{FeedKind, Repository};
use crate::error::{Error, Result};
use crate::index::{PackageIndex, parse_index};
use tracing::{debug, info, warn};

use super::traits::FeedTransport;

/// Index file names to try for a feed, most preferred first
pub fn index_candidates(kind: FeedKind) -> &'static [&'static str] {
    match kind {
        FeedKind::Gzip => &["Packages.gz", "Packages"],
        FeedKind::Plain => &["Packages"],
    }
}

/// Fetch and decode the package index text of one feed
pub fn fetch_index_text<T: FeedTransport + ?Sized>(
    transport: &T,
    repository: &Repository,
) -> Result<String> {
    let mut last_error = None;

    for name in index_candidates(repository.kind) {
        let url = repository.file_url(name);
        match transport.fetch_bytes(&url) {
            Ok(body) => match decode_index(&body) {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!("Index {} could not be decoded: {}", url, e);
                    last_error = Some(Error::ParseError(format!("{url}: {e}")));
                }
            },
            Err(e) => {
                debug!("Index {} unavailable: {}", url, e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        Error::NotFoundError(format!("No index for repository {}", repository.name))
    }))
}

/// Build the unified index from every repository, in configured order
///
/// Feeds that cannot be fetched are skipped with a warning. If no feed
/// yields any text the whole run fails.
pub fn build_index<T: FeedTransport + ?Sized>(
    transport: &T,
    repositories: &[Repository],
) -> Result<PackageIndex> {
    let mut merged = String::new();

    for repository in repositories {
        info!("Fetching index from repo: {}", repository.name);
        match fetch_index_text(transport, repository) {
            Ok(text) if !text.is_empty() => {
                merged.push_str(&text);
                merged.push_str("\n\n");
            }
            Ok(_) => warn!("Repository {} published an empty index", repository.name),
            Err(e) => warn!("Skipping repository {}: {}", repository.name, e),
        }
    }

    if merged.is_empty() {
        return Err(Error::NoIndexData(repositories.len()));
    }

    let index = parse_index(&merged);
    info!(
        "Index ready: {} packages, {} virtual names",
        index.len(),
        index.provides_len()
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::MemoryTransport;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_gzip_feed_prefers_compressed_index() {
        let repo = Repository::new("base", "https://example.com/base");
        let transport = MemoryTransport::new()
            .with_file("https://example.com/base/Packages.gz", &gzip(b"Package: zlib\n"))
            .with_file("https://example.com/base/Packages", b"Package: other\n");

        let text = fetch_index_text(&transport, &repo).unwrap();

        assert_eq!(text, "Package: zlib\n");
        assert_eq!(transport.fetches().len(), 1);
    }

    #[test]
    fn test_gzip_feed_falls_back_to_plain_index() {
        let repo = Repository::new("base", "https://example.com/base");
        let transport = MemoryTransport::new()
            .with_file("https://example.com/base/Packages", b"Package: zlib\n");

        let text = fetch_index_text(&transport, &repo).unwrap();
        assert_eq!(text, "Package: zlib\n");
    }

    #[test]
    fn test_corrupt_compressed_index_falls_back_to_plain() {
        let repo = Repository::new("base", "https://example.com/base");
        let transport = MemoryTransport::new()
            .with_file("https://example.com/base/Packages.gz", &[0x1f, 0x8b, 0x00, 0x01, 0x02])
            .with_file("https://example.com/base/Packages", b"Package: zlib\n");

        let text = fetch_index_text(&transport, &repo).unwrap();

        assert_eq!(text, "Package: zlib\n");
        assert_eq!(transport.fetches().len(), 2);
    }

    #[test]
    fn test_corrupt_index_without_fallback_is_parse_error() {
        let repo = Repository::new("local", "http://10.0.0.1/feed").with_kind(FeedKind::Plain);
        let transport = MemoryTransport::new()
            .with_file("http://10.0.0.1/feed/Packages", &[0x1f, 0x8b, 0x00, 0x01, 0x02]);

        let result = fetch_index_text(&transport, &repo);
        assert!(matches!(result, Err(Error::ParseError(_))));
    }

    #[test]
    fn test_build_index_keeps_feed_with_non_utf8_text() {
        let repos = vec![Repository::new("base", "https://example.com/base")];
        let transport = MemoryTransport::new().with_file(
            "https://example.com/base/Packages",
            b"Package: zlib\nFilename: zlib_1.3.ipk\nDescription: caf\xe9\n",
        );

        let index = build_index(&transport, &repos).unwrap();
        assert_eq!(index.get("zlib").unwrap().filename, "zlib_1.3.ipk");
    }

    #[test]
    fn test_plain_feed_fetches_only_plain_index() {
        let repo = Repository::new("local", "http://10.0.0.1/feed").with_kind(FeedKind::Plain);
        let transport = MemoryTransport::new();

        assert!(fetch_index_text(&transport, &repo).is_err());
        assert_eq!(transport.fetches(), vec!["http://10.0.0.1/feed/Packages".to_string()]);
    }

    #[test]
    fn test_build_index_merges_in_order() {
        let repos = vec![
            Repository::new("a", "https://example.com/a"),
            Repository::new("b", "https://example.com/b"),
        ];
        let transport = MemoryTransport::new()
            .with_file(
                "https://example.com/a/Packages",
                b"Package: busybox\nFilename: a/busybox_1.35.ipk",
            )
            .with_file(
                "https://example.com/b/Packages",
                b"Package: busybox\nFilename: b/busybox_1.36.ipk\n",
            );

        let index = build_index(&transport, &repos).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("busybox").unwrap().filename, "b/busybox_1.36.ipk");
    }

    #[test]
    fn test_build_index_skips_unreachable_repository() {
        let repos = vec![
            Repository::new("down", "https://down.example.com"),
            Repository::new("up", "https://up.example.com"),
        ];
        let transport = MemoryTransport::new()
            .with_file("https://up.example.com/Packages", b"Package: zlib\n");

        let index = build_index(&transport, &repos).unwrap();
        assert!(index.contains("zlib"));
    }

    #[test]
    fn test_build_index_fails_without_any_data() {
        let repos = vec![Repository::new("down", "https://down.example.com")];
        let transport = MemoryTransport::new();

        let result = build_index(&transport, &repos);
        assert!(matches!(result, Err(Error::NoIndexData(1))));
    }
}
