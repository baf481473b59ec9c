// src/index/provides.rs

//! Virtual package resolution

use super::PackageIndex;

impl PackageIndex {
    /// Map a requested name to a concrete package name
    ///
    /// Exact package names are returned unchanged. Otherwise the first
    /// package that declared the name in `Provides:` is chosen. Returns
    /// `None` when nothing in the index satisfies the name.
    pub fn resolve_alias<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.contains(name) {
            return Some(name);
        }
        self.providers(name).first().map(String::as_str)
    }
}
