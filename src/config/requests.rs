// src/config/requests.rs

//! Top-level request list (`packages.txt`)
//!
//! One package name per line. Lines starting with `#` are comments. A line
//! starting with `/` names the group (output subdirectory) for every package
//! that follows, until the next group line.

use crate::error::{Error, Result};
use std::path::Path;

/// A requested top-level package and the group it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    pub name: String,
    pub group: Option<String>,
}

impl PackageRequest {
    pub fn new(name: impl Into<String>, group: Option<&str>) -> Self {
        Self {
            name: name.into(),
            group: group.map(str::to_string),
        }
    }

    /// Group label for display; ungrouped requests belong to `main`
    pub fn group_label(&self) -> &str {
        self.group.as_deref().unwrap_or("main")
    }
}

/// Parse request list text, preserving order
pub fn parse_requests(text: &str) -> Vec<PackageRequest> {
    let mut requests = Vec::new();
    let mut group: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(label) = line.strip_prefix('/') {
            let label = group_path(label);
            group = (!label.is_empty()).then_some(label);
            continue;
        }

        requests.push(PackageRequest {
            name: line.to_string(),
            group: group.clone(),
        });
    }

    requests
}

/// Normalize a group label into a relative path below the download root
///
/// Empty, `.` and `..` segments are dropped so a label can never be absolute
/// or climb out of the root.
fn group_path(label: &str) -> String {
    label
        .split(['/', '\\'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .collect::<Vec<_>>()
        .join("/")
}

/// Load the request list from disk; a missing file is a startup error
pub fn load_requests(path: &Path) -> Result<Vec<PackageRequest>> {
    if !path.exists() {
        return Err(Error::NotFoundError(format!(
            "Request list {} not found; create it with one package name per line",
            path.display()
        )));
    }

    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::ConfigError(format!("Failed to read {}: {e}", path.display()))
    })?;

    Ok(parse_requests(&text))
}
