use super::*;
use crate::config::LoaderConfig;
use crate::storage::MemoryArchive;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

const FILES: &str = "/data/app/files";

fn system(archive: MemoryArchive) -> ModuleSystem {
    ModuleSystem::with_archive(LoaderConfig::new("/data/app", FILES), archive)
}

fn candidate(relative: &str) -> PathBuf {
    PathBuf::from(FILES).join(relative)
}

fn archive_path(key: &str) -> ResolvedModule {
    ResolvedModule::ArchivePath(key.to_string())
}

#[test]
fn test_exact_name_match() {
    let archive = MemoryArchive::new()
        .with_file("tns_modules/ui.js", "")
        .with_file("tns_modules/net.js", "");

    let resolved = system(archive).resolve_in_archive(&candidate("tns_modules/ui.js"));

    assert_eq!(resolved, archive_path("tns_modules/ui.js"));
}

#[test]
fn test_exact_name_beats_index() {
    let archive = MemoryArchive::new()
        .with_file("app/index.js", "")
        .with_file("app/util.js", "");

    let resolved = system(archive).resolve_in_archive(&candidate("app/util.js"));

    assert_eq!(resolved, archive_path("app/util.js"));
}

#[test]
fn test_index_when_no_exact_match() {
    let archive = MemoryArchive::new()
        .with_file("app/index.js", "")
        .with_file("app/other.js", "");

    let resolved = system(archive).resolve_in_archive(&candidate("app/missing.js"));

    assert_eq!(resolved, archive_path("app/index.js"));
}

#[test]
fn test_index_beats_descriptor() {
    let archive = MemoryArchive::new()
        .with_file("tns_modules/http/index.js", "")
        .with_file("tns_modules/http/package.json", r#"{ "main": "lib/http.js" }"#)
        .with_file("tns_modules/http/lib/http.js", "");

    let resolved = system(archive).resolve_in_archive(&candidate("tns_modules/http/client.js"));

    assert_eq!(resolved, archive_path("tns_modules/http/index.js"));
}

#[test]
fn test_descriptor_main() {
    let archive = MemoryArchive::new()
        .with_file("tns_modules/http/package.json", r#"{ "main": "./lib/http.js" }"#)
        .with_file("tns_modules/http/lib/http.js", "");

    let resolved = system(archive).resolve_in_archive(&candidate("tns_modules/http/client.js"));

    assert_eq!(resolved, archive_path("tns_modules/http/lib/http.js"));
}

#[test]
fn test_descriptor_without_main_not_found() {
    let archive = MemoryArchive::new()
        .with_file("tns_modules/http/package.json", r#"{ "name": "http" }"#)
        .with_file("tns_modules/http/lib/http.js", "");

    let resolved = system(archive).resolve_in_archive(&candidate("tns_modules/http/client.js"));

    assert_eq!(resolved, ResolvedModule::NotFound);
}

#[test]
fn test_malformed_descriptor_not_found() {
    let archive = MemoryArchive::new().with_file("tns_modules/http/package.json", "{ oops");

    let resolved = system(archive).resolve_in_archive(&candidate("tns_modules/http/client.js"));

    assert_eq!(resolved, ResolvedModule::NotFound);
}

#[test]
fn test_descriptor_main_escaping_archive_not_found() {
    let archive = MemoryArchive::new()
        .with_file("app/package.json", r#"{ "main": "../../../etc/passwd" }"#);

    let resolved = system(archive).resolve_in_archive(&candidate("app/missing.js"));

    assert_eq!(resolved, ResolvedModule::NotFound);
}

#[test]
fn test_candidate_without_extension_lists_itself() {
    let archive = MemoryArchive::new().with_file("tns_modules/http/lib/index.js", "");

    let resolved = system(archive).resolve_in_archive(&candidate("tns_modules/http/lib"));

    assert_eq!(resolved, archive_path("tns_modules/http/lib/index.js"));
}

#[test]
fn test_candidate_outside_files_dir_not_found() {
    let archive = MemoryArchive::new().with_file("etc/x.js", "");

    let resolved = system(archive).resolve_in_archive(&PathBuf::from("/etc/x.js"));

    assert_eq!(resolved, ResolvedModule::NotFound);
}

#[test]
fn test_missing_listing_not_found() {
    let archive = MemoryArchive::new().with_file("app/index.js", "");

    let resolved = system(archive).resolve_in_archive(&candidate("nowhere/x.js"));

    assert_eq!(resolved, ResolvedModule::NotFound);
}

#[test]
fn test_matches_by_value_not_identity() {
    // Names built at runtime must still match the fixed entry names
    let index = ["index", "js"].join(".");
    let archive = MemoryArchive::new().with_file(format!("app/{index}"), "");

    let resolved = system(archive).resolve_in_archive(&candidate("app/missing.js"));

    assert_eq!(resolved, archive_path("app/index.js"));
}

#[test]
fn test_selection_is_deterministic() {
    let archive: MemoryArchive = ["app/z.js", "app/index.js", "app/a.js"]
        .into_iter()
        .map(|key| (key.to_string(), String::new()))
        .collect();
    let system = system(archive);

    let first = system.resolve_in_archive(&candidate("app/missing.js"));
    for _ in 0..10 {
        assert_eq!(system.resolve_in_archive(&candidate("app/missing.js")), first);
    }
}

#[test]
fn test_archive_key() {
    let system = system(MemoryArchive::new());

    assert_eq!(
        system.archive_key(&candidate("app/x.js")).as_deref(),
        Some("app/x.js")
    );
    assert_eq!(system.archive_key(Path::new("/other/app/x.js")), None);
}

#[test]
fn test_normalize_key() {
    assert_eq!(normalize_key("a/./b/../c.js").as_deref(), Some("a/c.js"));
    assert_eq!(normalize_key("a//b.js").as_deref(), Some("a/b.js"));
    assert_eq!(normalize_key("a/../../b.js"), None);
    assert_eq!(normalize_key("a/.."), None);
}

#[test]
fn test_parent_and_join_key() {
    assert_eq!(parent_key("a/b/c.js"), "a/b");
    assert_eq!(parent_key("c.js"), "");
    assert_eq!(join_key("", "c.js"), "c.js");
    assert_eq!(join_key("a/b", "c.js"), "a/b/c.js");
}
