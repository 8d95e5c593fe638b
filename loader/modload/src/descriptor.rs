//! Package descriptors (`package.json`).
//!
//! Only the `main` field matters to resolution. Descriptors are parsed on
//! demand and dropped immediately; nothing here is cached.

use std::path::PathBuf;

use serde_json::Value;

/// A package descriptor that could not be used.
///
/// Always recoverable: callers fall back to the default index file.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("cannot read package descriptor '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("package descriptor is not valid JSON")]
    Syntax(#[from] serde_json::Error),
    #[error("package descriptor is not a JSON object")]
    NotAnObject,
}

/// The parts of `package.json` that resolution reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// Entry file relative to the package directory.
    ///
    /// `None` when the field is missing, empty, or not a string.
    pub main: Option<String>,
}

impl PackageDescriptor {
    pub fn parse(text: &str) -> Result<Self, DescriptorError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(fields) = value else {
            return Err(DescriptorError::NotAnObject);
        };
        let main = fields
            .get("main")
            .and_then(Value::as_str)
            .filter(|main| !main.is_empty())
            .map(str::to_string);
        Ok(PackageDescriptor { main })
    }
}
