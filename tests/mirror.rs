// tests/mirror.rs

//! End-to-end mirroring against a mock feed server: index sync, alias
//! resolution, repository location, layout and supersede behaviour.

mod common;

use common::{BASE_INDEX, BASE_PATH, LUCI_INDEX, LUCI_PATH, serve_archive, serve_index};
use feedfetch::config::{parse_feeds, parse_requests};
use feedfetch::{Error, Repository, RepositoryClient, Resolver, Settings, build_index};
use httpmock::Method::HEAD;
use httpmock::prelude::*;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

fn client() -> RepositoryClient {
    RepositoryClient::with_timeouts(Duration::from_secs(5), Duration::from_secs(2))
        .unwrap()
        .with_retries(1)
}

fn feeds(server: &MockServer) -> Vec<Repository> {
    let text = format!(
        "src/gz openwrt_base {}\nsrc/gz openwrt_luci {}\n",
        server.url(BASE_PATH),
        server.url(LUCI_PATH)
    );
    parse_feeds(&text)
}

fn serve_all(server: &MockServer) {
    serve_index(server, BASE_PATH, BASE_INDEX);
    serve_index(server, LUCI_PATH, LUCI_INDEX);
    serve_archive(server, BASE_PATH, "uhttpd_2024.10.04-r1_mips_24kc.ipk");
    serve_archive(server, BASE_PATH, "libubox20240329_2024.03.29-r1_mips_24kc.ipk");
    serve_archive(server, BASE_PATH, "libustream-mbedtls_2024.07.28-r1_mips_24kc.ipk");
    serve_archive(server, LUCI_PATH, "luci-app-firewall_25.1_all.ipk");
}

#[test]
fn test_mirror_request_list_with_groups() {
    let server = MockServer::start();
    serve_all(&server);
    let out = tempdir().unwrap();
    let settings = Settings::default().with_download_dir(out.path());

    let repos = feeds(&server);
    let client = client();
    let index = build_index(&client, &repos).unwrap();
    assert_eq!(index.len(), 4);

    let requests = parse_requests("# web\n/web\nluci-app-firewall\n/extra\nuhttpd\n");
    let mut resolver = Resolver::from_settings(&index, &repos, &client, &settings);
    for request in &requests {
        assert!(resolver.resolve(&request.name, request.group.as_deref()));
    }

    let web = out.path().join("web");
    assert!(web
        .join("packages/mips_24kc/luci/luci-app-firewall_25.1_all.ipk")
        .exists());
    assert!(web
        .join("packages/mips_24kc/base/uhttpd_2024.10.04-r1_mips_24kc.ipk")
        .exists());
    assert_eq!(
        fs::read(web.join(
            "packages/mips_24kc/base/libustream-mbedtls_2024.07.28-r1_mips_24kc.ipk"
        ))
        .unwrap(),
        b"libustream-mbedtls_2024.07.28-r1_mips_24kc.ipk"
    );

    // uhttpd was already pulled in by the first group
    assert!(!out.path().join("extra").exists());

    let session = resolver.session();
    assert_eq!(session.downloaded_count(), 4);
    assert!(session.failures().is_empty());
}

#[test]
fn test_existing_archive_not_downloaded_again() {
    let server = MockServer::start();
    serve_index(&server, BASE_PATH, "Package: zlib\nFilename: zlib_1.3.1-r1_mips_24kc.ipk\n");
    let head = server.mock(|when, then| {
        when.method(HEAD).path(format!("{BASE_PATH}/zlib_1.3.1-r1_mips_24kc.ipk"));
        then.status(200);
    });
    let get = server.mock(|when, then| {
        when.method(GET).path(format!("{BASE_PATH}/zlib_1.3.1-r1_mips_24kc.ipk"));
        then.status(200).body("fresh");
    });

    let out = tempdir().unwrap();
    let target = out.path().join("packages/mips_24kc/base");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("zlib_1.3.1-r1_mips_24kc.ipk"), b"cached").unwrap();

    let repos = vec![Repository::new("base", server.url(BASE_PATH))];
    let client = client();
    let index = build_index(&client, &repos).unwrap();
    let settings = Settings::default().with_download_dir(out.path());
    let mut resolver = Resolver::from_settings(&index, &repos, &client, &settings);

    assert!(resolver.resolve("zlib", None));

    head.assert_hits(1);
    get.assert_hits(0);
    assert_eq!(
        fs::read(target.join("zlib_1.3.1-r1_mips_24kc.ipk")).unwrap(),
        b"cached"
    );
}

#[test]
fn test_newer_version_replaces_old_archive() {
    let server = MockServer::start();
    serve_index(&server, BASE_PATH, "Package: zlib\nFilename: zlib_1.3.1-r2_mips_24kc.ipk\n");
    serve_archive(&server, BASE_PATH, "zlib_1.3.1-r2_mips_24kc.ipk");

    let out = tempdir().unwrap();
    let target = out.path().join("packages/mips_24kc/base");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("zlib_1.3.1-r1_mips_24kc.ipk"), b"old").unwrap();

    let repos = vec![Repository::new("base", server.url(BASE_PATH))];
    let client = client();
    let index = build_index(&client, &repos).unwrap();
    let settings = Settings::default().with_download_dir(out.path());
    let mut resolver = Resolver::from_settings(&index, &repos, &client, &settings);

    resolver.resolve("zlib", None);

    assert!(!target.join("zlib_1.3.1-r1_mips_24kc.ipk").exists());
    assert!(target.join("zlib_1.3.1-r2_mips_24kc.ipk").exists());
}

#[test]
fn test_unlocatable_archive_is_not_fatal() {
    let server = MockServer::start();
    serve_index(
        &server,
        BASE_PATH,
        "Package: ghost\nFilename: ghost_1.0_mips_24kc.ipk\n\nPackage: zlib\nFilename: zlib_1.3_mips_24kc.ipk\n",
    );
    serve_archive(&server, BASE_PATH, "zlib_1.3_mips_24kc.ipk");

    let out = tempdir().unwrap();
    let repos = vec![Repository::new("base", server.url(BASE_PATH))];
    let client = client();
    let index = build_index(&client, &repos).unwrap();
    let settings = Settings::default().with_download_dir(out.path());
    let mut resolver = Resolver::from_settings(&index, &repos, &client, &settings);

    assert!(!resolver.resolve("ghost", None));
    assert!(resolver.resolve("zlib", None));

    let session = resolver.session();
    assert_eq!(session.downloaded(), vec!["zlib"]);
    assert_eq!(session.failures().len(), 1);
    assert_eq!(session.failures()[0].package, "ghost");
}

#[test]
fn test_feed_without_marker_lands_in_unknown_repo() {
    let server = MockServer::start();
    serve_index(&server, "/feed", "Package: zlib\nFilename: zlib_1.3_mips_24kc.ipk\n");
    serve_archive(&server, "/feed", "zlib_1.3_mips_24kc.ipk");

    let out = tempdir().unwrap();
    let repos = vec![Repository::new("local", server.url("/feed"))];
    let client = client();
    let index = build_index(&client, &repos).unwrap();
    let settings = Settings::default().with_download_dir(out.path());
    let mut resolver = Resolver::from_settings(&index, &repos, &client, &settings);

    assert!(resolver.resolve("zlib", Some("local")));
    assert!(out
        .path()
        .join("local/unknown_repo/zlib_1.3_mips_24kc.ipk")
        .exists());
}

#[test]
fn test_no_index_data_is_fatal() {
    let server = MockServer::start();
    let repos = feeds(&server);

    let result = build_index(&client(), &repos);
    assert!(matches!(result, Err(Error::NoIndexData(2))));
}
