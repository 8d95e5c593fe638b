//! Module loading and the execution-scope wrapper.
//!
//! The host engine evaluates every module inside a function expression that
//! gives it a private `module`/`exports` pair, `__dirname`/`__filename`, and a
//! `require` bound to the module's own path:
//!
//! ```text
//! (function(){
//!  var module = {}; module.exports = arguments[0]; ... function require(moduleName){ ... }
//!  <module source>
//!  return module.exports;
//! })
//! ```
//!
//! IMPORTANT: the host maps error positions back to the module source by
//! subtracting [`MODULE_LINES_OFFSET`]. Any change to the number of lines in
//! front of the source must update that constant and the host together.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::resolve::ResolvedModule;
use crate::system::ModuleSystem;

/// Number of wrapper lines preceding the module source.
pub const MODULE_LINES_OFFSET: usize = 2;

/// Failure to produce wrapped module content.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The resolution outcome does not name any content.
    #[error("cannot load {}", .0.describe())]
    NotLoadable(ResolvedModule),
    /// The application entry module did not resolve to loadable content.
    #[error("cannot load entry module '{name}': {}", .resolved.describe())]
    EntryNotLoadable {
        name: String,
        resolved: ResolvedModule,
    },
    /// The backend failed to read the module.
    #[error("failed to read module '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// A global entry point ran before `host::init`.
    #[error("module system is not initialized")]
    NotInitialized,
}

/// Wrap module source in the execution-scope template.
///
/// `dirname` and `filename` are emitted as escaped string literals, so no
/// path can add lines in front of the source.
pub fn wrap_module(dirname: &str, filename: &str, source: &str) -> String {
    let dirname = js_string_literal(dirname);
    let filename = js_string_literal(filename);
    format!(
        "(function(){{\n \
         var module = {{}}; module.exports = arguments[0];\
         var exports = module.exports; var __dirname = {dirname}; var __filename = {filename};\
         function require(moduleName){{ return global.require(moduleName, __filename); }}\
         module.filename = __filename; this.__extends = global.__extends; \n \
         {source} \n \
         return module.exports; \n\
         }})"
    )
}

/// Quote `value` as a script string literal.
///
/// JSON escaping covers quotes, backslashes and control characters. U+2028
/// and U+2029 are line terminators to older engines and are escaped too.
fn js_string_literal(value: &str) -> String {
    Value::String(value.to_string())
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

impl ModuleSystem {
    /// Read a resolved module from its backend and wrap it.
    pub fn get_content(&self, resolved: &ResolvedModule) -> Result<String, LoadError> {
        debug!(module = %resolved, "loading module");

        let (source, dirname) = match resolved {
            ResolvedModule::FilesystemPath(path) => {
                let source = self
                    .filesystem()
                    .read_to_string(path)
                    .map_err(|source| read_error(path, source))?;
                let dirname = path
                    .parent()
                    .map(|parent| parent.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (source, dirname)
            }
            ResolvedModule::ArchivePath(key) => {
                let source = self
                    .archive()
                    .read_to_string(Path::new(key))
                    .map_err(|source| read_error(Path::new(key), source))?;
                (source, String::new())
            }
            ResolvedModule::ExternalRejected | ResolvedModule::NotFound => {
                return Err(LoadError::NotLoadable(resolved.clone()));
            }
        };

        Ok(wrap_module(&dirname, &resolved.to_string(), &source))
    }

    /// Resolve and load the application's bootstrap module.
    pub fn get_app_entry_content(&self, app_file_name: &str) -> Result<String, LoadError> {
        let resolved = self.resolve(app_file_name, "");
        if !resolved.is_loadable() {
            return Err(LoadError::EntryNotLoadable {
                name: app_file_name.to_string(),
                resolved,
            });
        }
        self.get_content(&resolved)
    }
}

fn read_error(path: &Path, source: std::io::Error) -> LoadError {
    LoadError::Read {
        path: path.to_string_lossy().into_owned(),
        source,
    }
}
