// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::GzEncoder;
use httpmock::Method::HEAD;
use httpmock::prelude::*;
use std::io::Write;

/// Feed path on the mock server, under the default release marker
pub const BASE_PATH: &str = "/releases/24.10.5/packages/mips_24kc/base";

/// Second feed, used to check repository ordering
pub const LUCI_PATH: &str = "/releases/24.10.5/packages/mips_24kc/luci";

/// Index for the base feed.
///
/// `uhttpd` pulls in `libubox` and the virtual `ustream-ssl`, which only
/// `libustream-mbedtls` provides; `libc` is in the default skip set.
pub const BASE_INDEX: &str = "\
Package: uhttpd
Version: 2024.10.04-1
Depends: libc, libubox20240329, ustream-ssl
Filename: uhttpd_2024.10.04-r1_mips_24kc.ipk

Package: libubox20240329
Version: 2024.03.29-1
Depends: libc
Filename: libubox20240329_2024.03.29-r1_mips_24kc.ipk

Package: libustream-mbedtls
Version: 2024.07.28-1
Depends: libc, libubox20240329
Provides: ustream-ssl
Filename: libustream-mbedtls_2024.07.28-r1_mips_24kc.ipk
";

/// Index for the luci feed; its archive is only published there
pub const LUCI_INDEX: &str = "\
Package: luci-app-firewall
Version: 25.1
Depends: uhttpd
Filename: luci-app-firewall_25.1_all.ipk
";

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Serve a feed index as `Packages.gz`
pub fn serve_index(server: &MockServer, feed_path: &str, index: &str) {
    let body = gzip(index.as_bytes());
    server.mock(|when, then| {
        when.method(GET).path(format!("{feed_path}/Packages.gz"));
        then.status(200).body(body);
    });
}

/// Serve an archive for both HEAD probes and GET transfers
pub fn serve_archive(server: &MockServer, feed_path: &str, file: &str) {
    let path = format!("{feed_path}/{file}");
    server.mock(|when, then| {
        when.method(HEAD).path(path.clone());
        then.status(200);
    });
    server.mock(|when, then| {
        when.method(GET).path(path.clone());
        then.status(200).body(file.as_bytes());
    });
}
