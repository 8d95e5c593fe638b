//! The module system context.

use std::fmt;
use std::path::Path;

use crate::config::LoaderConfig;
use crate::storage::{FsStorage, Storage};

/// Immutable context for resolving and loading modules.
///
/// Holds the configuration and both storage backends. The filesystem backend
/// is always consulted first; the archive only when the filesystem misses.
/// Nothing is mutated after construction, so one instance can serve any
/// number of threads.
pub struct ModuleSystem {
    config: LoaderConfig,
    filesystem: Box<dyn Storage>,
    archive: Box<dyn Storage>,
}

impl ModuleSystem {
    pub fn new(
        config: LoaderConfig,
        filesystem: Box<dyn Storage>,
        archive: Box<dyn Storage>,
    ) -> Self {
        ModuleSystem {
            config,
            filesystem,
            archive,
        }
    }

    /// Module system over the host filesystem and the given archive.
    pub fn with_archive(config: LoaderConfig, archive: impl Storage + 'static) -> Self {
        Self::new(config, Box::new(FsStorage), Box::new(archive))
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// The application files directory; archive keys are relative to it.
    pub fn application_files_path(&self) -> &Path {
        &self.config.files_dir
    }

    pub(crate) fn filesystem(&self) -> &dyn Storage {
        self.filesystem.as_ref()
    }

    pub(crate) fn archive(&self) -> &dyn Storage {
        self.archive.as_ref()
    }
}

impl fmt::Debug for ModuleSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleSystem")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
