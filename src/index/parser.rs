// src/index/parser.rs

//! Parser for opkg `Packages` index text
//!
//! The input is the concatenation of every feed's index, one stanza per
//! package. Only the `Package`, `Depends`, `Filename`, `Provides` and
//! `Version` fields are read; everything else is ignored.

use super::PackageIndex;
use tracing::debug;

/// Parse merged index text into a [`PackageIndex`]
///
/// A `Package:` line starts (or restarts) a record; following field lines
/// apply to it until the next `Package:` line. Field lines seen before any
/// `Package:` line are ignored.
pub fn parse_index(text: &str) -> PackageIndex {
    let mut index = PackageIndex::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        if key == "Package" {
            index.begin_record(value);
            current = Some(value.to_string());
            continue;
        }

        let Some(name) = current.as_deref() else {
            continue;
        };

        match key {
            "Depends" => {
                if let Some(record) = index.record_mut(name) {
                    record.depends = split_depends(value);
                }
            }
            "Filename" => {
                if let Some(record) = index.record_mut(name) {
                    record.filename = value.to_string();
                }
            }
            "Version" => {
                if let Some(record) = index.record_mut(name) {
                    record.version = Some(value.to_string());
                }
            }
            "Provides" => {
                let provides = split_list(value);
                for virtual_name in &provides {
                    index.add_provider(virtual_name, name);
                }
                if let Some(record) = index.record_mut(name) {
                    record.provides = provides;
                }
            }
            _ => {}
        }
    }

    debug!(
        "Parsed index: {} packages, {} virtual names",
        index.len(),
        index.provides_len()
    );
    index
}

/// Split a `Depends:` value on commas and pipes alike.
///
/// Alternatives (`a | b`) become separate unconditional entries.
fn split_depends(value: &str) -> Vec<String> {
    value
        .split([',', '|'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
