//! Fallback resolution against the packaged archive.
//!
//! A filesystem candidate that does not exist is mapped to an archive key by
//! stripping the application files directory. The listing directory is the
//! candidate's parent when the candidate ends in `.js`, or the candidate
//! itself otherwise. Its entries are matched by these rules, first satisfied
//! rule wins:
//!
//! 1. an entry named like the candidate's basename
//! 2. `index.js`
//! 3. `package.json` with a usable `main`, which names the entry
//!
//! Names are compared by value and listings are sorted, so the outcome only
//! depends on the archive's content.

use std::path::Path;

use tracing::{debug, warn};

use crate::descriptor::PackageDescriptor;
use crate::resolve::ResolvedModule;
use crate::specifier::has_source_extension;
use crate::system::ModuleSystem;
use crate::{INDEX_FILE, PACKAGE_DESCRIPTOR};

impl ModuleSystem {
    /// Resolve a filesystem candidate in the archive.
    ///
    /// Returns either [`ResolvedModule::ArchivePath`] or
    /// [`ResolvedModule::NotFound`].
    pub fn resolve_in_archive(&self, candidate: &Path) -> ResolvedModule {
        let Some(key) = self.archive_key(candidate) else {
            debug!(path = %candidate.display(), "candidate is outside the application files");
            return ResolvedModule::NotFound;
        };
        let Some(basename) = key.rsplit('/').next().filter(|name| !name.is_empty()) else {
            return ResolvedModule::NotFound;
        };

        let listing_dir = if has_source_extension(candidate) {
            parent_key(&key)
        } else {
            key.as_str()
        };

        let mut entries = match self.archive().list_dir(Path::new(listing_dir)) {
            Ok(entries) => entries,
            Err(error) => {
                debug!(dir = listing_dir, %error, "archive listing failed");
                return ResolvedModule::NotFound;
            }
        };
        entries.sort_unstable();
        entries.dedup();
        let has_entry = |name: &str| entries.iter().any(|entry| entry == name);

        if has_entry(basename) {
            return ResolvedModule::ArchivePath(join_key(listing_dir, basename));
        }
        if has_entry(INDEX_FILE) {
            return ResolvedModule::ArchivePath(join_key(listing_dir, INDEX_FILE));
        }
        if has_entry(PACKAGE_DESCRIPTOR) {
            if let Some(main) = self.archive_main(listing_dir) {
                if let Some(entry) = normalize_key(&join_key(listing_dir, &main)) {
                    return ResolvedModule::ArchivePath(entry);
                }
                warn!(dir = listing_dir, main = %main, "package main escapes the archive");
            }
        }
        ResolvedModule::NotFound
    }

    /// Archive key of a filesystem path: the path relative to the
    /// application files directory, `/`-separated.
    pub fn archive_key(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(self.application_files_path()).ok()?;
        let parts = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;
        Some(parts.join("/"))
    }

    /// `main` of the descriptor in archive directory `dir`, if it parses.
    fn archive_main(&self, dir: &str) -> Option<String> {
        let key = join_key(dir, PACKAGE_DESCRIPTOR);
        let text = match self.archive().read_to_string(Path::new(&key)) {
            Ok(text) => text,
            Err(error) => {
                warn!(key = %key, %error, "cannot read archive package descriptor");
                return None;
            }
        };
        match PackageDescriptor::parse(&text) {
            Ok(descriptor) => descriptor.main,
            Err(error) => {
                warn!(key = %key, %error, "malformed archive package descriptor");
                None
            }
        }
    }
}

fn parent_key(key: &str) -> &str {
    key.rsplit_once('/').map_or("", |(parent, _)| parent)
}

fn join_key(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Resolve `.` and `..` in an archive key. `None` if it climbs above the
/// root or names the root itself.
fn normalize_key(key: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for part in key.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            _ => parts.push(part),
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests;
