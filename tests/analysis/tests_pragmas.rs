//! Pragmas, associated headers and the keep-style policy switches.

use incwise::analysis::{IgnoreReason, UseStatus};
use incwise::config::AnalysisPolicy;
use incwise::hir::{FilePragma, IncludePragma, codes};
use incwise::providers::{ProviderMap, Visibility};

use crate::helpers::report_assertions::*;
use crate::helpers::unit_builder::*;

// ============================================================================
// Keeping includes
// ============================================================================

#[test]
fn test_keep_pragma_retains_unused_include() {
    let session = UnitBuilder::new("f.cc")
        .include_with("f.cc", "unused.h", IncludePragma::Keep)
        .include("f.cc", "other.h")
        .analyze();
    let main = main_report(&session);
    assert_removes(main, &["#include \"other.h\""]);
    assert_full(main, &["#include \"unused.h\""]);
}

#[test]
fn test_always_keep_retains_include_everywhere() {
    let session = UnitBuilder::new("f.cc")
        .include("f.cc", "config.h")
        .pragma("config.h", 1, FilePragma::AlwaysKeep)
        .analyze();
    assert_clean(main_report(&session));
}

#[test]
fn test_keep_glob_retains_matching_include() {
    let policy = AnalysisPolicy {
        keep: vec!["third_party/*".to_string()],
        ..AnalysisPolicy::default()
    };
    let session = UnitBuilder::new("f.cc")
        .policy(policy)
        .include("f.cc", "third_party/zlib.h")
        .include("f.cc", "mine.h")
        .analyze();
    let main = main_report(&session);
    assert_removes(main, &["#include \"mine.h\""]);
    assert_full(main, &["#include \"third_party/zlib.h\""]);
}

#[test]
fn test_bad_keep_glob_is_a_warning() {
    let policy = AnalysisPolicy {
        keep: vec!["[".to_string()],
        ..AnalysisPolicy::default()
    };
    let session = UnitBuilder::new("f.cc").policy(policy).analyze();
    assert_eq!(codes(&session.diagnostics), vec![codes::UNRESOLVABLE_PATTERN]);
}

#[test]
fn test_opaque_artifact_is_retained() {
    let session = UnitBuilder::new("f.cc").include("f.cc", "widget.moc").analyze();
    assert_clean(main_report(&session));
}

#[test]
fn test_precompiled_header_first_and_kept() {
    let policy = AnalysisPolicy {
        pch_in_code: true,
        ..AnalysisPolicy::default()
    };
    let session = UnitBuilder::new("f.cc")
        .policy(policy)
        .include("f.cc", "stdafx.h")
        .define("Foo", "foo.h")
        .full_use("Foo", "f.cc", 10)
        .analyze();
    let main = main_report(&session);
    assert_adds(main, &["#include \"foo.h\""]);
    assert_full(main, &["#include \"stdafx.h\"", "#include \"foo.h\""]);
}

// ============================================================================
// Re-exports
// ============================================================================

#[test]
fn test_export_pragma_makes_includer_a_provider() {
    let session = UnitBuilder::new("f.cc")
        .include("f.cc", "facade.h")
        .include_with("facade.h", "impl.h", IncludePragma::Export)
        .define("Foo", "impl.h")
        .full_use("Foo", "f.cc", 10)
        .analyze();
    let main = main_report(&session);
    assert_clean(main);
    let outcome = main.outcomes_for("Foo").next().expect("outcome for Foo");
    assert_eq!(outcome.status, UseStatus::Included(q("facade.h")));
}

#[test]
fn test_export_region() {
    let session = UnitBuilder::new("f.cc")
        .include("f.cc", "facade.h")
        .pragma("facade.h", 1, FilePragma::BeginExports)
        .include("facade.h", "impl.h")
        .pragma("facade.h", 3, FilePragma::EndExports)
        .include("facade.h", "after.h")
        .define("Foo", "impl.h")
        .define("Bar", "after.h")
        .full_use("Foo", "f.cc", 10)
        .full_use("Bar", "f.cc", 11)
        .analyze();
    let main = main_report(&session);
    assert_adds(main, &["#include \"after.h\""]);
    assert!(main.removed_includes().is_empty());
    assert!(session.diagnostics.is_empty());
}

#[test]
fn test_unclosed_export_region_is_reported() {
    let session = UnitBuilder::new("f.cc")
        .pragma("f.cc", 2, FilePragma::BeginExports)
        .analyze();
    assert_eq!(codes(&session.diagnostics), vec![codes::UNBALANCED_EXPORTS]);
}

// ============================================================================
// Suggestions the file refuses
// ============================================================================

#[test]
fn test_no_include_pragma_blocks_suggestion() {
    let session = UnitBuilder::new("f.cc")
        .pragma("f.cc", 1, FilePragma::NoInclude(q("foo.h")))
        .define("Foo", "foo.h")
        .full_use("Foo", "f.cc", 10)
        .analyze();
    let main = main_report(&session);
    assert_clean(main);
    let outcome = main.outcomes_for("Foo").next().expect("outcome for Foo");
    assert_eq!(outcome.status, UseStatus::Ignored(IgnoreReason::NoUsableProvider));
}

#[test]
fn test_no_forward_declare_pragma_wants_include() {
    let session = UnitBuilder::new("f.cc")
        .pragma("f.cc", 1, FilePragma::NoForwardDeclare("Foo".into()))
        .define("Foo", "foo.h")
        .pointer_use("Foo", "f.cc", 10)
        .analyze();
    let main = main_report(&session);
    assert_adds(main, &["#include \"foo.h\""]);
}

#[test]
fn test_no_forward_decls_policy() {
    let policy = AnalysisPolicy {
        no_forward_decls: true,
        ..AnalysisPolicy::default()
    };
    let session = UnitBuilder::new("f.cc")
        .policy(policy)
        .define("Foo", "foo.h")
        .pointer_use("Foo", "f.cc", 10)
        .analyze();
    assert_adds(main_report(&session), &["#include \"foo.h\""]);
}

#[test]
fn test_transitive_includes_only_drops_outside_provider() {
    let policy = AnalysisPolicy {
        transitive_includes_only: true,
        ..AnalysisPolicy::default()
    };
    let session = UnitBuilder::new("f.cc")
        .policy(policy)
        .define("Foo", "elsewhere.h")
        .full_use("Foo", "f.cc", 10)
        .analyze();
    let main = main_report(&session);
    assert_clean(main);
    let outcome = main.outcomes_for("Foo").next().expect("outcome for Foo");
    assert_eq!(
        outcome.status,
        UseStatus::Ignored(IgnoreReason::OutsideTransitiveClosure)
    );
}

// ============================================================================
// Friends
// ============================================================================

#[test]
fn test_friend_may_keep_private_include() {
    let mut builder = ProviderMap::builder();
    builder.add_mapping_text("\"priv.h\"", Visibility::Private, "\"pub.h\"", Visibility::Public);
    let session = UnitBuilder::new("friend/f.cc")
        .providers(builder.build())
        .include("friend/f.cc", "priv.h")
        .pragma("priv.h", 1, FilePragma::Friend("\"friend/.*".to_string()))
        .define("Foo", "priv.h")
        .full_use("Foo", "friend/f.cc", 10)
        .analyze();
    assert_clean(main_report(&session));
}

#[test]
fn test_bad_friend_pattern_is_dropped() {
    let session = UnitBuilder::new("f.cc")
        .pragma("priv.h", 1, FilePragma::Friend("(unclosed".to_string()))
        .analyze();
    assert_eq!(codes(&session.diagnostics), vec![codes::UNRESOLVABLE_PATTERN]);
}

// ============================================================================
// Associated headers and extra reported files
// ============================================================================

#[test]
fn test_associated_header_is_reported_and_shared() {
    let session = UnitBuilder::new("foo/widget.cc")
        .include("foo/widget.cc", "foo/widget.h")
        .include("foo/widget.h", "foo/base.h")
        .define("Base", "foo/base.h")
        .full_use("Base", "foo/widget.h", 5)
        .full_use("Base", "foo/widget.cc", 20)
        .analyze();

    assert_eq!(session.files.len(), 2);
    let header = report(&session, "foo/widget.h");
    assert_clean(header);

    let main = main_report(&session);
    assert_clean(main);
    let outcome = main.outcomes_for("Base").next().expect("outcome for Base");
    assert_eq!(outcome.status, UseStatus::ViaAssociated(q("foo/base.h")));
}

#[test]
fn test_associated_pragma() {
    let session = UnitBuilder::new("f.cc")
        .include_with("f.cc", "api/f_public.h", IncludePragma::Associated)
        .analyze();
    assert_eq!(session.files.len(), 2);
    assert_clean(main_report(&session));
}

#[test]
fn test_check_also_reports_matching_files() {
    let policy = AnalysisPolicy {
        check_also: vec!["lib/*.h".to_string()],
        ..AnalysisPolicy::default()
    };
    let session = UnitBuilder::new("f.cc")
        .policy(policy)
        .include("f.cc", "lib/a.h")
        .include("lib/a.h", "unused.h")
        .define("A", "lib/a.h")
        .full_use("A", "f.cc", 5)
        .analyze();
    let lib = report(&session, "lib/a.h");
    assert_removes(lib, &["#include \"unused.h\""]);
}
