//! Storage backends.
//!
//! Resolution only needs four capabilities from a backend: is there a file,
//! is there a directory, read a file, list a directory. [`Storage`] captures
//! exactly that so the resolver treats the writable application tree and the
//! read-only packaged archive the same way.
//!
//! - [`FsStorage`]: the real filesystem, keyed by absolute paths.
//! - [`DirArchive`]: a read-only archive extracted to a directory, keyed by
//!   paths relative to that directory.
//! - [`MemoryArchive`]: an in-memory archive, keyed by `/`-separated strings.
//!
//! Listings are always returned sorted so archive matching is deterministic.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Capability interface shared by both backends.
pub trait Storage: Send + Sync {
    /// Whether `path` names a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Whether `path` names a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Read a file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Names of the direct children of a directory, sorted.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>>;

    /// Resolve symlinks, where the backend has them.
    fn canonicalize(&self, _path: &Path) -> Option<PathBuf> {
        None
    }
}

/// The host filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStorage;

impl Storage for FsStorage {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        list_std_dir(path)
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        path.canonicalize().ok()
    }
}

fn list_std_dir(path: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort_unstable();
    Ok(names)
}

/// Split an archive key into its normal components.
///
/// Keys are relative and may not climb out of the archive, so absolute
/// paths and `..` are refused.
fn key_components(key: &Path) -> io::Result<Vec<&str>> {
    let mut parts = Vec::new();
    for component in key.components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(part) => parts.push(part),
                None => return Err(invalid_key(key)),
            },
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(invalid_key(key));
            }
        }
    }
    Ok(parts)
}

fn invalid_key(key: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("invalid archive key '{}'", key.display()),
    )
}

/// Read-only archive rooted at an extracted directory.
#[derive(Debug, Clone)]
pub struct DirArchive {
    root: PathBuf,
}

impl DirArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirArchive { root: root.into() }
    }

    fn locate(&self, key: &Path) -> io::Result<PathBuf> {
        let mut path = self.root.clone();
        path.extend(key_components(key)?);
        Ok(path)
    }
}

impl Storage for DirArchive {
    fn is_file(&self, path: &Path) -> bool {
        self.locate(path).is_ok_and(|p| p.is_file())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.locate(path).is_ok_and(|p| p.is_dir())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(self.locate(path)?)
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        list_std_dir(&self.locate(path)?)
    }
}

/// In-memory archive.
///
/// Directories are implied by the `/`-separated keys of the files below
/// them. The empty key is the archive root.
#[derive(Debug, Default, Clone)]
pub struct MemoryArchive {
    files: BTreeMap<String, String>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing any previous content under the same key.
    pub fn insert(&mut self, key: impl Into<String>, content: impl Into<String>) {
        self.files.insert(key.into(), content.into());
    }

    #[must_use]
    pub fn with_file(mut self, key: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(key, content);
        self
    }

    fn key(path: &Path) -> io::Result<String> {
        Ok(key_components(path)?.join("/"))
    }

    /// Keys strictly below directory `dir`, with the `dir/` prefix removed.
    fn children<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.files.keys().filter_map(move |key| {
            if dir.is_empty() {
                Some(key.as_str())
            } else {
                key.strip_prefix(dir)?.strip_prefix('/')
            }
        })
    }
}

impl FromIterator<(String, String)> for MemoryArchive {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        MemoryArchive {
            files: iter.into_iter().collect(),
        }
    }
}

impl Storage for MemoryArchive {
    fn is_file(&self, path: &Path) -> bool {
        Self::key(path).is_ok_and(|key| self.files.contains_key(&key))
    }

    fn is_dir(&self, path: &Path) -> bool {
        Self::key(path).is_ok_and(|key| self.children(&key).next().is_some())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let key = Self::key(path)?;
        self.files.get(&key).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no archive entry '{key}'"),
            )
        })
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let key = Self::key(path)?;
        let names: BTreeSet<&str> = self
            .children(&key)
            .filter_map(|rest| rest.split('/').next())
            .filter(|name| !name.is_empty())
            .collect();
        if names.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no archive directory '{key}'"),
            ));
        }
        Ok(names.into_iter().map(str::to_string).collect())
    }
}
