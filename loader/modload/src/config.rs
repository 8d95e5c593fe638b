//! Loader configuration.
//!
//! A [`LoaderConfig`] is built once at startup and never mutated. It names
//! the sandbox boundary, the application files directory, and the two fixed
//! relative roots used for default and bare lookups.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::specifier::normalize_path;

/// Relative root of application modules inside the files directory.
pub const DEFAULT_APP_ROOT: &str = "app";

/// Relative root of bare packages inside the files directory.
pub const DEFAULT_MODULES_ROOT: &str = "tns_modules";

/// Error building a [`LoaderConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid JSON for [`LoaderConfig`].
    #[error("invalid loader config")]
    Parse(#[from] serde_json::Error),
    /// A directory setting must be an absolute path.
    #[error("'{field}' must be an absolute path, got '{}'", .path.display())]
    RelativeDirectory { field: &'static str, path: PathBuf },
}

/// Immutable loader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// Sandbox boundary. Filesystem modules must live below it.
    pub root_package_dir: PathBuf,
    /// Base of both fixed roots, and of archive keys.
    pub files_dir: PathBuf,
    /// Default module root when there is no usable calling module.
    #[serde(default = "default_app_root")]
    pub app_root: String,
    /// Root for bare specifiers.
    #[serde(default = "default_modules_root")]
    pub modules_root: String,
}

fn default_app_root() -> String {
    DEFAULT_APP_ROOT.to_string()
}

fn default_modules_root() -> String {
    DEFAULT_MODULES_ROOT.to_string()
}

impl LoaderConfig {
    /// Create a config with the default relative roots.
    pub fn new(root_package_dir: impl Into<PathBuf>, files_dir: impl Into<PathBuf>) -> Self {
        LoaderConfig {
            root_package_dir: normalize_path(&root_package_dir.into()),
            files_dir: normalize_path(&files_dir.into()),
            app_root: default_app_root(),
            modules_root: default_modules_root(),
        }
    }

    #[must_use]
    pub fn with_app_root(mut self, app_root: impl Into<String>) -> Self {
        self.app_root = app_root.into();
        self
    }

    #[must_use]
    pub fn with_modules_root(mut self, modules_root: impl Into<String>) -> Self {
        self.modules_root = modules_root.into();
        self
    }

    /// Parse a JSON config and validate its directories.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: LoaderConfig = serde_json::from_str(text)?;
        config.validated()
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Check that both directories are absolute and normalize them.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        for (field, path) in [
            ("root_package_dir", &self.root_package_dir),
            ("files_dir", &self.files_dir),
        ] {
            if !path.is_absolute() {
                return Err(ConfigError::RelativeDirectory {
                    field,
                    path: path.clone(),
                });
            }
        }
        self.root_package_dir = normalize_path(&self.root_package_dir);
        self.files_dir = normalize_path(&self.files_dir);
        Ok(self)
    }

    /// `<files_dir>/<app_root>`: base directory for context-free lookups.
    pub fn app_module_root(&self) -> PathBuf {
        self.files_dir.join(&self.app_root)
    }

    /// `<files_dir>/<modules_root>`: base directory for bare specifiers.
    pub fn bare_module_root(&self) -> PathBuf {
        self.files_dir.join(&self.modules_root)
    }
}
