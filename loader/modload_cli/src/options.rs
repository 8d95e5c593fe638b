//! Command-line option parsing.

use std::path::PathBuf;

use modload::{DirArchive, LoaderConfig, MemoryArchive, Storage};

/// Options shared by every command.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliOptions {
    /// `--config=<file.json>`
    pub config: Option<PathBuf>,
    /// `--root=<dir>`: sandbox root, overrides the config file.
    pub root: Option<PathBuf>,
    /// `--files=<dir>`: application files directory, overrides the config file.
    pub files: Option<PathBuf>,
    /// `--archive=<dir>`: extracted packaged archive.
    pub archive: Option<PathBuf>,
    /// `--from=<path>`: calling module for `resolve`.
    pub from: Option<String>,
    /// Remaining non-option arguments, in order.
    pub positional: Vec<String>,
}

impl CliOptions {
    /// Parse everything after the command name.
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut options = CliOptions::default();
        for arg in args {
            if let Some(value) = arg.strip_prefix("--config=") {
                options.config = Some(PathBuf::from(value));
            } else if let Some(value) = arg.strip_prefix("--root=") {
                options.root = Some(PathBuf::from(value));
            } else if let Some(value) = arg.strip_prefix("--files=") {
                options.files = Some(PathBuf::from(value));
            } else if let Some(value) = arg.strip_prefix("--archive=") {
                options.archive = Some(PathBuf::from(value));
            } else if let Some(value) = arg.strip_prefix("--from=") {
                options.from = Some(value.to_string());
            } else if arg.starts_with("--") {
                return Err(format!("unknown option '{arg}'"));
            } else {
                options.positional.push(arg.clone());
            }
        }
        Ok(options)
    }

    /// Build the loader config from `--config`, then apply `--root`/`--files`.
    ///
    /// Without a config file both directories are required. `--files`
    /// defaults to `<root>/files`.
    pub fn loader_config(&self) -> Result<LoaderConfig, String> {
        let mut config = match &self.config {
            Some(path) => Some(LoaderConfig::from_file(path).map_err(|e| error_chain(&e))?),
            None => None,
        };

        if let Some(root) = &self.root {
            config = Some(match config {
                Some(mut config) => {
                    config.root_package_dir.clone_from(root);
                    config
                }
                None => {
                    let files = self.files.clone().unwrap_or_else(|| root.join("files"));
                    LoaderConfig::new(root, files)
                }
            });
        }
        if let (Some(files), Some(config)) = (&self.files, config.as_mut()) {
            config.files_dir.clone_from(files);
        }

        let config = config.ok_or_else(|| "missing --root=<dir> or --config=<file>".to_string())?;
        config.validated().map_err(|e| error_chain(&e))
    }

    /// The archive backend: the `--archive` directory, or an empty archive.
    pub fn archive(&self) -> Box<dyn Storage> {
        match &self.archive {
            Some(dir) => Box::new(DirArchive::new(dir)),
            None => Box::new(MemoryArchive::new()),
        }
    }
}

/// Render an error and its sources as `outer: inner: ...`.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
