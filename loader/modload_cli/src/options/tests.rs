use super::*;
use pretty_assertions::assert_eq;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_parse_options_and_positionals() {
    let options = CliOptions::parse(&args(&[
        "--root=/data/app",
        "./util",
        "--from=/data/app/files/app/main.js",
        "--archive=/data/assets",
    ]))
    .unwrap();

    assert_eq!(options.root, Some(PathBuf::from("/data/app")));
    assert_eq!(options.archive, Some(PathBuf::from("/data/assets")));
    assert_eq!(options.from.as_deref(), Some("/data/app/files/app/main.js"));
    assert_eq!(options.positional, vec!["./util".to_string()]);
}

#[test]
fn test_parse_rejects_unknown_option() {
    let err = CliOptions::parse(&args(&["--verbose"])).unwrap_err();
    assert_eq!(err, "unknown option '--verbose'");
}

#[test]
fn test_loader_config_from_root_defaults_files() {
    let options = CliOptions::parse(&args(&["--root=/data/app"])).unwrap();
    let config = options.loader_config().unwrap();

    assert_eq!(config, LoaderConfig::new("/data/app", "/data/app/files"));
}

#[test]
fn test_loader_config_explicit_files() {
    let options = CliOptions::parse(&args(&["--root=/data/app", "--files=/data/files"])).unwrap();
    let config = options.loader_config().unwrap();

    assert_eq!(config.files_dir, PathBuf::from("/data/files"));
}

#[test]
fn test_loader_config_file_with_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loader.json");
    std::fs::write(
        &path,
        r#"{ "root_package_dir": "/a", "files_dir": "/a/files", "modules_root": "vendor" }"#,
    )
    .unwrap();

    let config_arg = format!("--config={}", path.display());
    let options = CliOptions::parse(&args(&[config_arg.as_str(), "--files=/b/files"])).unwrap();
    let config = options.loader_config().unwrap();

    assert_eq!(config.root_package_dir, PathBuf::from("/a"));
    assert_eq!(config.files_dir, PathBuf::from("/b/files"));
    assert_eq!(config.modules_root, "vendor");
}

#[test]
fn test_loader_config_requires_root() {
    let options = CliOptions::parse(&args(&["--files=/data/files"])).unwrap();
    let err = options.loader_config().unwrap_err();
    assert!(err.contains("missing --root"));
}

#[test]
fn test_loader_config_rejects_relative_root() {
    let options = CliOptions::parse(&args(&["--root=data/app"])).unwrap();
    let err = options.loader_config().unwrap_err();
    assert!(err.contains("must be an absolute path"));
}

#[test]
fn test_error_chain_includes_sources() {
    let options = CliOptions::parse(&args(&["--config=/definitely/missing.json"])).unwrap();
    let err = options.loader_config().unwrap_err();
    assert!(err.starts_with("cannot read config '/definitely/missing.json': "));
}
