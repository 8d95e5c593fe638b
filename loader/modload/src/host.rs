//! Process-wide entry points for the host engine.
//!
//! The engine's `require` callback has no place to carry a context, so one
//! [`ModuleSystem`] is installed at startup behind a single-assignment
//! barrier. After [`init`] everything here is read-only and callable from
//! any thread.

use std::path::Path;
use std::sync::OnceLock;

use tracing::{debug, info};

use crate::config::LoaderConfig;
use crate::load::LoadError;
use crate::resolve::ResolvedModule;
use crate::storage::{FsStorage, Storage};
use crate::system::ModuleSystem;

static MODULE_SYSTEM: OnceLock<ModuleSystem> = OnceLock::new();

/// Install the global module system over the host filesystem and `archive`.
///
/// Returns `false`, leaving the existing configuration untouched, if the
/// module system was already initialized.
pub fn init(config: LoaderConfig, archive: Box<dyn Storage>) -> bool {
    let mut installed = false;
    MODULE_SYSTEM.get_or_init(|| {
        installed = true;
        ModuleSystem::new(config, Box::new(FsStorage), archive)
    });
    if installed {
        if let Some(system) = MODULE_SYSTEM.get() {
            info!(
                root = %system.config().root_package_dir.display(),
                files = %system.config().files_dir.display(),
                "module system initialized"
            );
        }
    } else {
        debug!("module system already initialized");
    }
    installed
}

/// The installed module system, if [`init`] has run.
pub fn module_system() -> Option<&'static ModuleSystem> {
    MODULE_SYSTEM.get()
}

fn current() -> Result<&'static ModuleSystem, LoadError> {
    module_system().ok_or(LoadError::NotInitialized)
}

/// Resolve a specifier to its wire form.
pub fn resolve(module_name: &str, calling_module: &str) -> Result<String, LoadError> {
    Ok(current()?.resolve(module_name, calling_module).to_string())
}

/// Load the module named by a wire-form path.
pub fn get_content(module_path: &str) -> Result<String, LoadError> {
    current()?.get_content(&ResolvedModule::from_wire(module_path))
}

/// Resolve and load the bootstrap module.
pub fn get_app_entry_content(app_file_name: &str) -> Result<String, LoadError> {
    current()?.get_app_entry_content(app_file_name)
}

/// The application files directory of the installed module system.
pub fn application_files_path() -> Option<&'static Path> {
    module_system().map(ModuleSystem::application_files_path)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
