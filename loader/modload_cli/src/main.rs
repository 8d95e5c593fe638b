//! modload CLI
//!
//! Resolve and load modules the way the embedded runtime does, from a shell.

mod commands;
mod options;

use std::sync::Once;

use options::CliOptions;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Only active when `RUST_LOG` is set, e.g. `RUST_LOG=modload=debug`.
/// Set `MODLOAD_LOG_TREE=1` for indented, hierarchical output.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        if std::env::var_os("MODLOAD_LOG_TREE").is_some() {
            tracing_subscriber::registry()
                .with(tracing_tree::HierarchicalLayer::new(2))
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = args[1].as_str();
    let run: fn(&CliOptions) -> Result<String, String> = match command {
        "resolve" => commands::resolve,
        "load" => commands::load,
        "entry" => commands::entry,
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        "version" | "--version" | "-V" => {
            println!("modload {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    let options = match CliOptions::parse(&args[2..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
    };

    tracing::debug!(command, ?options, "running command");
    match run(&options) {
        Ok(output) => println!("{output}"),
        Err(message) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("modload - module resolver for the embedded runtime");
    println!();
    println!("Usage: modload <command> [options]");
    println!();
    println!("Commands:");
    println!("  resolve <specifier>   Resolve a specifier and print its location");
    println!("  load <path>           Print the wrapped source of a resolved module");
    println!("  entry <file>          Resolve and wrap the application entry module");
    println!("  help                  Show this help message");
    println!("  version               Show version information");
    println!();
    println!("Options:");
    println!("  --root=<dir>          Application root (sandbox boundary)");
    println!("  --files=<dir>         Application files directory (default: <root>/files)");
    println!("  --config=<file.json>  Read settings from a JSON config file");
    println!("  --archive=<dir>       Extracted packaged archive to fall back to");
    println!("  --from=<path>         Calling module for `resolve`");
    println!();
    println!("Examples:");
    println!("  modload resolve ./views/home --root=/data/app --from=/data/app/files/app/main.js");
    println!("  modload resolve http --config=loader.json --archive=./assets");
    println!("  modload load ASSET:tns_modules/ui/index.js --root=/data/app --archive=./assets");
    println!("  modload entry ./bootstrap.js --root=/data/app");
    println!();
    println!("Logging:");
    println!("  RUST_LOG=modload=debug     Enable debug logging");
    println!("  MODLOAD_LOG_TREE=1         Hierarchical log output");
}
