//! Module resolution and loading for an embedded script runtime.
//!
//! Turns a `require` specifier plus the path of the calling module into a
//! location in one of two storage backends, then wraps that module's source
//! in the execution-scope template the host engine evaluates.
//!
//! # Architecture
//!
//! ```text
//! resolve(specifier, calling_module)
//!   ├── base directory (calling module's parent, or <files>/app/)
//!   ├── classify: absolute → relative → bare
//!   ├── candidate path (+ ".js" when missing)
//!   ├── directory resolution (package.json "main" → index.js)
//!   ├── filesystem hit  → sandbox check → FilesystemPath | ExternalRejected
//!   └── filesystem miss → archive fallback → ArchivePath | NotFound
//!         ↓
//! get_content(resolved) → wrapped source for the host engine
//! ```
//!
//! [`ModuleSystem`] is the explicit, immutable context every operation runs
//! against. The [`host`] module keeps one process-wide instance behind a
//! single-assignment barrier for hosts that call in through free functions.

pub mod archive;
pub mod config;
pub mod descriptor;
pub mod host;
pub mod load;
pub mod resolve;
pub mod specifier;
pub mod storage;
pub mod system;

pub use config::{ConfigError, LoaderConfig};
pub use descriptor::{DescriptorError, PackageDescriptor};
pub use load::{wrap_module, LoadError, MODULE_LINES_OFFSET};
pub use resolve::ResolvedModule;
pub use specifier::SpecifierKind;
pub use storage::{DirArchive, FsStorage, MemoryArchive, Storage};
pub use system::ModuleSystem;

/// Extension appended to specifiers that do not already carry it.
pub const SOURCE_EXTENSION: &str = ".js";

/// Entry file used when a directory has no usable package descriptor.
pub const INDEX_FILE: &str = "index.js";

/// Package descriptor consulted during directory resolution.
pub const PACKAGE_DESCRIPTOR: &str = "package.json";
