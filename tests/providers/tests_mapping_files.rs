//! Mapping files loaded from disk through [`AnalysisConfig`].

use std::fs;
use std::path::{Path, PathBuf};

use incwise::config::AnalysisConfig;
use incwise::error::MappingError;
use incwise::hir::codes;
use incwise::providers::{MappingLoader, ProviderMap};
use tempfile::TempDir;

use crate::helpers::report_assertions::codes;
use crate::helpers::unit_builder::*;

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).expect("write mapping file");
    path
}

fn config_for(files: Vec<PathBuf>) -> AnalysisConfig {
    AnalysisConfig {
        mapping_files: files,
        no_default_mappings: true,
        ..AnalysisConfig::default()
    }
}

#[test]
fn test_yaml_file_with_json_ref() {
    let dir = TempDir::new().expect("temp dir");
    let main = write(
        dir.path(),
        "main.imp",
        r#"
- include: ['"priv.h"', private, '"pub.h"', public]
- include: ['@"lib/detail/.*"', private, '"lib/api.h"', public]
- ref: more.json
"#,
    );
    write(
        dir.path(),
        "more.json",
        r#"[{"symbol": ["NULL", "private", "<cstddef>", "public"]}]"#,
    );

    let (map, diagnostics) = config_for(vec![main])
        .build_provider_map()
        .expect("mapping files load");
    assert!(diagnostics.is_empty());
    assert_eq!(map.resolve(&q("priv.h")).file, q("pub.h"));
    assert_eq!(map.resolve(&q("lib/detail/impl.h")).file, q("lib/api.h"));
    assert_eq!(map.symbol_providers("NULL"), &[a("cstddef")]);
    // Built-in tables are off.
    assert_eq!(
        map.resolve(&a("bits/stl_vector.h")).file,
        a("bits/stl_vector.h")
    );
}

#[test]
fn test_mapping_files_layer_over_builtins() {
    let dir = TempDir::new().expect("temp dir");
    let main = write(
        dir.path(),
        "extra.imp",
        r#"- include: ['"gen/x.h"', private, '"x.h"', public]"#,
    );
    let config = AnalysisConfig {
        mapping_files: vec![main],
        ..AnalysisConfig::default()
    };
    let (map, _) = config.build_provider_map().expect("mapping files load");
    assert_eq!(map.resolve(&q("gen/x.h")).file, q("x.h"));
    assert_eq!(map.resolve(&a("bits/stl_vector.h")).file, a("vector"));
}

#[test]
fn test_relative_file_found_on_search_path() {
    let dir = TempDir::new().expect("temp dir");
    write(
        dir.path(),
        "found.imp",
        r#"- include: ['"priv.h"', private, '"pub.h"', public]"#,
    );
    let config = AnalysisConfig {
        mapping_files: vec![PathBuf::from("found.imp")],
        search_path: vec![dir.path().to_path_buf()],
        no_default_mappings: true,
        ..AnalysisConfig::default()
    };
    let (map, _) = config.build_provider_map().expect("found on search path");
    assert_eq!(map.resolve(&q("priv.h")).file, q("pub.h"));
}

#[test]
fn test_loader_records_load_order() {
    let dir = TempDir::new().expect("temp dir");
    let main = write(dir.path(), "a.imp", "- ref: b.imp\n");
    let b = write(dir.path(), "b.imp", "");
    let mut builder = ProviderMap::builder();
    let mut loader = MappingLoader::new(Vec::new());
    loader.load(&mut builder, &main).expect("loads");
    assert_eq!(loader.loaded(), &[b, main]);
}

#[test]
fn test_shared_ref_is_loaded_once() {
    let dir = TempDir::new().expect("temp dir");
    let main = write(dir.path(), "main.imp", "- ref: b.imp\n- ref: c.imp\n");
    let b = write(dir.path(), "b.imp", "- ref: d.imp\n");
    let c = write(dir.path(), "c.imp", "- ref: d.imp\n");
    let d = write(
        dir.path(),
        "d.imp",
        r#"- include: ['"priv.h"', private, '"pub.h"', public]"#,
    );
    let mut builder = ProviderMap::builder();
    let mut loader = MappingLoader::new(Vec::new());
    loader.load(&mut builder, &main).expect("loads");
    assert_eq!(loader.loaded(), &[d, b, c, main]);
    assert_eq!(builder.build().resolve(&q("priv.h")).file, q("pub.h"));
}

#[test]
fn test_missing_ref() {
    let dir = TempDir::new().expect("temp dir");
    let main = write(dir.path(), "main.imp", "- ref: nowhere.imp\n");
    let err = config_for(vec![main])
        .build_provider_map()
        .expect_err("ref cannot be found");
    assert!(matches!(err, MappingError::MissingRef { ref name, .. } if name == "nowhere.imp"));
}

#[test]
fn test_ref_cycle() {
    let dir = TempDir::new().expect("temp dir");
    let a_imp = write(dir.path(), "a.imp", "- ref: b.imp\n");
    write(dir.path(), "b.imp", "- ref: a.imp\n");
    let err = config_for(vec![a_imp])
        .build_provider_map()
        .expect_err("refs loop");
    assert!(matches!(err, MappingError::RefCycle { .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().expect("temp dir");
    let err = config_for(vec![dir.path().join("absent.imp")])
        .build_provider_map()
        .expect_err("file does not exist");
    assert!(matches!(err, MappingError::Io { .. }));
}

#[test]
fn test_unquoted_target_is_invalid() {
    let dir = TempDir::new().expect("temp dir");
    let main = write(
        dir.path(),
        "bad.imp",
        r#"- include: ['"priv.h"', private, pub.h, public]"#,
    );
    let err = config_for(vec![main])
        .build_provider_map()
        .expect_err("target must be quoted");
    assert!(matches!(err, MappingError::InvalidEntry { .. }));
    assert!(err.to_string().contains("bad.imp"));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    let main = write(dir.path(), "broken.json", "[{\"include\": ");
    let err = config_for(vec![main])
        .build_provider_map()
        .expect_err("malformed json");
    assert!(matches!(err, MappingError::Parse { .. }));
}

#[test]
fn test_bad_regex_in_file_is_a_warning() {
    let dir = TempDir::new().expect("temp dir");
    let main = write(
        dir.path(),
        "regex.imp",
        r#"
- include: ['@"(unclosed', private, '"x.h"', public]
- include: ['"priv.h"', private, '"pub.h"', public]
"#,
    );
    let (map, diagnostics) = config_for(vec![main])
        .build_provider_map()
        .expect("bad patterns do not stop loading");
    assert_eq!(
        codes(&diagnostics.into_diagnostics()),
        vec![codes::UNRESOLVABLE_PATTERN]
    );
    assert_eq!(map.resolve(&q("priv.h")).file, q("pub.h"));
}
