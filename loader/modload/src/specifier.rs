//! Specifier classification and lexical path handling.
//!
//! ## Specifier Kinds
//!
//! - Absolute: `/data/app/files/app/util` - used as-is
//! - Relative: `./util`, `../shared/log` - resolved from the base directory
//! - Bare: `http`, `ui/button` - resolved from the bare-package root
//!
//! The prefix tests run in that order, so `/./x` is absolute and `.hidden`
//! is bare.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::SOURCE_EXTENSION;

/// How a specifier is anchored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpecifierKind {
    Absolute,
    Relative,
    Bare,
}

impl SpecifierKind {
    /// Classify a raw specifier.
    pub fn classify(specifier: &str) -> Self {
        if specifier.starts_with('/') {
            SpecifierKind::Absolute
        } else if specifier.starts_with("./")
            || specifier.starts_with("../")
            || specifier == "."
            || specifier == ".."
        {
            SpecifierKind::Relative
        } else {
            SpecifierKind::Bare
        }
    }
}

/// Normalize a path by resolving `.` and `..` components.
///
/// Purely lexical: the filesystem is never consulted, and `..` at the root
/// stays at the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir => {}
            _ => result.push(component),
        }
    }
    result
}

/// Whether the last path component ends in the source extension.
pub fn has_source_extension(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(SOURCE_EXTENSION))
}

/// Append the source extension unless it is already present.
///
/// Existing extensions are kept: `lib.min` becomes `lib.min.js`.
pub fn with_source_extension(path: PathBuf) -> PathBuf {
    if has_source_extension(&path) {
        return path;
    }
    let mut raw: OsString = path.into_os_string();
    raw.push(SOURCE_EXTENSION);
    PathBuf::from(raw)
}
