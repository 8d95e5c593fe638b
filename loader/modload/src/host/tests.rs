use super::*;
use crate::resolve::EXTERNAL_FILE_ERROR;
use crate::storage::MemoryArchive;
use pretty_assertions::assert_eq;
use std::fs;

// The global can only be installed once per process, so the whole lifecycle
// lives in a single test.
#[test]
fn test_global_lifecycle() {
    assert!(module_system().is_none());
    assert!(matches!(resolve("./a", ""), Err(LoadError::NotInitialized)));
    assert!(matches!(get_content("/a.js"), Err(LoadError::NotInitialized)));
    assert!(application_files_path().is_none());

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("pkg");
    let files = root.join("files");
    fs::create_dir_all(files.join("app")).unwrap();
    fs::write(files.join("app/bootstrap.js"), "boot();").unwrap();
    fs::write(files.join("app/a.js"), "require('./b');").unwrap();
    fs::write(files.join("app/b.js"), "exports.b = 1;").unwrap();
    fs::write(dir.path().join("outside.js"), "").unwrap();
    let archive = MemoryArchive::new().with_file("tns_modules/ui.js", "exports.ui = 1;");

    assert!(init(
        LoaderConfig::new(&root, &files),
        Box::new(archive)
    ));
    // Second call is a no-op that keeps the first configuration
    assert!(!init(
        LoaderConfig::new("/elsewhere", "/elsewhere/files"),
        Box::new(MemoryArchive::new())
    ));
    assert_eq!(application_files_path(), Some(files.as_path()));

    let a = files.join("app/a.js");
    let b = resolve("./b", a.to_str().unwrap()).unwrap();
    assert_eq!(b, files.join("app/b.js").to_str().unwrap());
    assert!(get_content(&b).unwrap().contains("exports.b = 1;"));

    let ui = resolve("ui", "").unwrap();
    assert_eq!(ui, "ASSET:tns_modules/ui.js");
    assert!(get_content(&ui).unwrap().contains("exports.ui = 1;"));

    assert_eq!(resolve("missing", "").unwrap(), "");
    assert!(matches!(
        get_content(""),
        Err(LoadError::NotLoadable(ResolvedModule::NotFound))
    ));

    let outside = dir.path().join("outside.js");
    assert_eq!(
        resolve(outside.to_str().unwrap(), "").unwrap(),
        EXTERNAL_FILE_ERROR
    );
    assert!(matches!(
        get_content(EXTERNAL_FILE_ERROR),
        Err(LoadError::NotLoadable(ResolvedModule::ExternalRejected))
    ));

    assert!(get_app_entry_content("./bootstrap.js")
        .unwrap()
        .contains("boot();"));
}
