//! CLI commands.
//!
//! Every command installs the global module system from the parsed options
//! and then calls the same entry points a host engine uses.

use modload::host;
use modload::resolve::{EXTERNAL_FILE_ERROR, NOT_FOUND};

use crate::options::{error_chain, CliOptions};

fn install(options: &CliOptions) -> Result<(), String> {
    let config = options.loader_config()?;
    host::init(config, options.archive());
    Ok(())
}

fn single_argument<'a>(options: &'a CliOptions, usage: &str) -> Result<&'a str, String> {
    match options.positional.as_slice() {
        [value] => Ok(value.as_str()),
        [] => Err(format!("missing argument\nUsage: {usage}")),
        _ => Err(format!("too many arguments\nUsage: {usage}")),
    }
}

/// `modload resolve <specifier> [--from=<path>]`
///
/// Prints the wire form of the resolved module.
pub fn resolve(options: &CliOptions) -> Result<String, String> {
    let specifier = single_argument(options, "modload resolve <specifier> [--from=<path>]")?;
    install(options)?;

    let calling = options.from.as_deref().unwrap_or("");
    let resolved = host::resolve(specifier, calling).map_err(|e| error_chain(&e))?;
    resolution_output(specifier, resolved)
}

/// Map the not-found and rejection sentinels to distinct errors.
fn resolution_output(specifier: &str, resolved: String) -> Result<String, String> {
    match resolved.as_str() {
        NOT_FOUND => Err(format!("cannot find module '{specifier}'")),
        EXTERNAL_FILE_ERROR => Err(format!(
            "module '{specifier}' resolves outside the application root"
        )),
        _ => Ok(resolved),
    }
}

/// `modload load <path>`
///
/// Accepts a filesystem path or an `ASSET:` key and prints the wrapped source.
pub fn load(options: &CliOptions) -> Result<String, String> {
    let module_path = single_argument(options, "modload load <path|ASSET:key>")?;
    install(options)?;
    host::get_content(module_path).map_err(|e| error_chain(&e))
}

/// `modload entry <file>`
pub fn entry(options: &CliOptions) -> Result<String, String> {
    let file = single_argument(options, "modload entry <file>")?;
    install(options)?;
    host::get_app_entry_content(file).map_err(|e| error_chain(&e))
}
