//! Specifier resolution against the filesystem backend.
//!
//! ## Resolution Order
//!
//! 1. Base directory: parent of the calling module when it is an existing
//!    file, otherwise `<files>/app/`.
//! 2. Candidate: absolute and relative specifiers against the base directory,
//!    bare specifiers against `<files>/tns_modules/`, plus `.js` when missing.
//! 3. Directory resolution when only the extensionless directory exists:
//!    `package.json` `main`, else `index.js`.
//! 4. Filesystem hit: sandbox check. Miss: archive fallback.
//!
//! ## Wire Form
//!
//! Hosts exchange results as strings: an absolute path, `ASSET:<key>`, the
//! empty string for not found, or `EXTERNAL_FILE_ERROR` for a sandbox
//! rejection. [`ResolvedModule`]'s `Display` produces that form and
//! [`ResolvedModule::from_wire`] reads it back.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::descriptor::{DescriptorError, PackageDescriptor};
use crate::specifier::{normalize_path, with_source_extension, SpecifierKind};
use crate::system::ModuleSystem;
use crate::{INDEX_FILE, PACKAGE_DESCRIPTOR};

/// Wire prefix marking an archive key.
pub const ASSET_PREFIX: &str = "ASSET:";

/// Wire value for a module that exists outside the sandbox.
pub const EXTERNAL_FILE_ERROR: &str = "EXTERNAL_FILE_ERROR";

/// Wire value for a module that was not found.
pub const NOT_FOUND: &str = "";

/// Outcome of resolving a specifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedModule {
    /// An existing file inside the sandbox root.
    FilesystemPath(PathBuf),
    /// A key in the packaged archive, relative to the files directory.
    ArchivePath(String),
    /// The file exists but lies outside the sandbox root.
    ExternalRejected,
    /// Neither backend has the module.
    NotFound,
}

impl ResolvedModule {
    /// Decode the wire form produced by `Display`.
    pub fn from_wire(value: &str) -> Self {
        if value == NOT_FOUND {
            ResolvedModule::NotFound
        } else if value == EXTERNAL_FILE_ERROR {
            ResolvedModule::ExternalRejected
        } else if let Some(key) = value.strip_prefix(ASSET_PREFIX) {
            ResolvedModule::ArchivePath(key.to_string())
        } else {
            ResolvedModule::FilesystemPath(PathBuf::from(value))
        }
    }

    /// Whether the outcome names content that can be loaded.
    pub fn is_loadable(&self) -> bool {
        matches!(
            self,
            ResolvedModule::FilesystemPath(_) | ResolvedModule::ArchivePath(_)
        )
    }

    /// Short human-readable description of the outcome.
    pub fn describe(&self) -> &'static str {
        match self {
            ResolvedModule::FilesystemPath(_) => "filesystem module",
            ResolvedModule::ArchivePath(_) => "archive module",
            ResolvedModule::ExternalRejected => "module outside the application root",
            ResolvedModule::NotFound => "module not found",
        }
    }
}

impl fmt::Display for ResolvedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedModule::FilesystemPath(path) => write!(f, "{}", path.display()),
            ResolvedModule::ArchivePath(key) => write!(f, "{ASSET_PREFIX}{key}"),
            ResolvedModule::ExternalRejected => f.write_str(EXTERNAL_FILE_ERROR),
            ResolvedModule::NotFound => f.write_str(NOT_FOUND),
        }
    }
}

/// A specifier mapped to a path, before any existence checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The normalized target without an appended extension.
    pub directory: PathBuf,
    /// The file to try first.
    pub file: PathBuf,
}

impl ModuleSystem {
    /// Resolve `module_name` as required from `calling_module`.
    ///
    /// `calling_module` may be empty, or name a file that does not exist (for
    /// example an archive module); both fall back to the application root.
    pub fn resolve(&self, module_name: &str, calling_module: &str) -> ResolvedModule {
        if module_name.is_empty() {
            return ResolvedModule::NotFound;
        }

        let base = self.base_directory(calling_module);
        let candidate = self.candidate(module_name, &base);
        let file = self.resolve_directory(candidate);

        let resolved = if self.filesystem().is_file(&file) {
            self.check_sandbox(file)
        } else {
            self.resolve_in_archive(&file)
        };
        debug!(
            module = module_name,
            from = calling_module,
            resolved = %resolved,
            "resolved module"
        );
        resolved
    }

    /// Directory that relative specifiers are resolved from.
    pub fn base_directory(&self, calling_module: &str) -> PathBuf {
        if !calling_module.is_empty() {
            let calling = Path::new(calling_module);
            if self.filesystem().is_file(calling) {
                if let Some(parent) = calling.parent().filter(|p| !p.as_os_str().is_empty()) {
                    return parent.to_path_buf();
                }
            }
        }
        self.config().app_module_root()
    }

    /// Map a specifier to its candidate paths.
    pub fn candidate(&self, module_name: &str, base: &Path) -> Candidate {
        let target = match SpecifierKind::classify(module_name) {
            SpecifierKind::Absolute | SpecifierKind::Relative => base.join(module_name),
            SpecifierKind::Bare => self.config().bare_module_root().join(module_name),
        };
        let directory = normalize_path(&target);
        let file = with_source_extension(directory.clone());
        Candidate { directory, file }
    }

    /// Pick the file for a candidate, entering the directory when only the
    /// directory exists.
    fn resolve_directory(&self, candidate: Candidate) -> PathBuf {
        let fs = self.filesystem();
        if fs.is_file(&candidate.file) || !fs.is_dir(&candidate.directory) {
            return candidate.file;
        }
        self.directory_entry(&candidate.directory)
    }

    /// Entry file of a package directory: the descriptor's `main` if usable,
    /// otherwise `index.js`.
    pub fn directory_entry(&self, directory: &Path) -> PathBuf {
        let descriptor_path = directory.join(PACKAGE_DESCRIPTOR);
        if self.filesystem().is_file(&descriptor_path) {
            match self.read_descriptor(&descriptor_path) {
                Ok(PackageDescriptor { main: Some(main) }) => {
                    return normalize_path(&directory.join(main));
                }
                Ok(PackageDescriptor { main: None }) => {
                    debug!(path = %descriptor_path.display(), "package descriptor has no main");
                }
                Err(error) => {
                    warn!(
                        path = %descriptor_path.display(),
                        %error,
                        "malformed package descriptor"
                    );
                }
            }
        }
        directory.join(INDEX_FILE)
    }

    fn read_descriptor(&self, path: &Path) -> Result<PackageDescriptor, DescriptorError> {
        let text = self
            .filesystem()
            .read_to_string(path)
            .map_err(|source| DescriptorError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        PackageDescriptor::parse(&text)
    }

    /// Accept `file` only if the sandbox root is one of its ancestors.
    fn check_sandbox(&self, file: PathBuf) -> ResolvedModule {
        if self.is_inside_root(&file) {
            ResolvedModule::FilesystemPath(file)
        } else {
            warn!(
                path = %file.display(),
                root = %self.config().root_package_dir.display(),
                "rejected module outside the application root"
            );
            ResolvedModule::ExternalRejected
        }
    }

    /// Whether `file` lies below the sandbox root.
    ///
    /// The lexical check always applies. When both sides can be
    /// canonicalized, the canonical file must also be below the canonical
    /// root, which catches symlinks pointing out of the sandbox. The root is
    /// canonicalized on every check since it may be created after startup.
    pub fn is_inside_root(&self, file: &Path) -> bool {
        let root = &self.config().root_package_dir;
        if !has_ancestor(file, root) {
            return false;
        }
        let fs = self.filesystem();
        match (fs.canonicalize(file), fs.canonicalize(root)) {
            (Some(canonical_file), Some(canonical_root)) => {
                has_ancestor(&canonical_file, &canonical_root)
            }
            _ => true,
        }
    }
}

fn has_ancestor(path: &Path, ancestor: &Path) -> bool {
    path.ancestors().skip(1).any(|dir| dir == ancestor)
}
