//! Idempotence, minimality, determinism and the classification partition.

use incwise::analysis::{Attributor, Classifier, HintOracle, IncludeGraph, UseKind};
use incwise::config::AnalysisPolicy;
use incwise::hir::{Declaration, IncludeDirective, SymbolKey, SymbolTable, Use, UseHints};
use incwise::session::SessionReport;
use rstest::rstest;

use crate::helpers::report_assertions::*;
use crate::helpers::unit_builder::*;

/// `f.cc` with the given includes and a fixed set of uses:
/// - `Foo` (full) defined in `foo.h`
/// - `Bar` (full) defined in `bar.h`, which `both.h` also includes
/// - `Baz` (pointer) defined in `baz.h`
fn program(includes: &[&str]) -> UnitBuilder {
    let mut builder = UnitBuilder::new("f.cc");
    for include in includes {
        builder = builder.include("f.cc", include);
    }
    builder
        .include("both.h", "bar.h")
        .define("Foo", "foo.h")
        .define("Bar", "bar.h")
        .define("Baz", "baz.h")
        .full_use("Foo", "f.cc", 20)
        .full_use("Bar", "f.cc", 21)
        .pointer_use("Baz", "f.cc", 22)
}

fn full_includes(session: &SessionReport) -> Vec<String> {
    main_report(session)
        .full_includes()
        .into_iter()
        .map(|f| f.path().to_string())
        .collect()
}

#[test]
fn test_first_run_result() {
    let session = program(&["foo.h", "unused.h", "baz.h"]).analyze();
    let main = main_report(&session);
    assert_adds(main, &["#include \"bar.h\"", "class Baz;"]);
    assert_removes(main, &["#include \"unused.h\"", "#include \"baz.h\""]);
    assert_full(main, &["#include \"bar.h\"", "#include \"foo.h\"", "class Baz;"]);
}

#[test]
fn test_rerun_on_full_list_is_clean() {
    let first = program(&["foo.h", "unused.h", "baz.h"]).analyze();
    let kept = full_includes(&first);
    let kept: Vec<&str> = kept.iter().map(String::as_str).collect();

    let second = program(&kept)
        .forward_declare("Baz", "f.cc", 10)
        .analyze();
    let main = main_report(&second);
    assert_clean(main);
    assert_eq!(texts(&main.full), texts(&main_report(&first).full));
}

#[test]
fn test_every_kept_include_is_needed() {
    let first = program(&["foo.h", "bar.h"]).analyze();
    let kept = full_includes(&first);
    assert_eq!(kept, vec!["bar.h", "foo.h"]);

    for dropped in &kept {
        let remaining: Vec<&str> = kept
            .iter()
            .filter(|f| *f != dropped)
            .map(String::as_str)
            .collect();
        let session = program(&remaining)
            .forward_declare("Baz", "f.cc", 10)
            .analyze();
        let added: Vec<String> = main_report(&session)
            .added_includes()
            .into_iter()
            .map(|f| f.path().to_string())
            .collect();
        assert_eq!(&added, &vec![dropped.clone()], "dropping {dropped}");
    }
}

#[test]
fn test_reexporting_include_is_not_kept_twice() {
    // both.h reaches bar.h, but providers must be included directly.
    let session = program(&["foo.h", "both.h"]).analyze();
    let main = main_report(&session);
    assert_adds(main, &["#include \"bar.h\"", "class Baz;"]);
    assert_removes(main, &["#include \"both.h\""]);
}

#[test]
fn test_tolerate_transitive_accepts_reachable_provider() {
    let policy = AnalysisPolicy {
        tolerate_transitive: true,
        ..AnalysisPolicy::default()
    };
    let session = program(&["foo.h", "both.h"]).policy(policy).analyze();
    let main = main_report(&session);
    assert_adds(main, &["class Baz;"]);
    assert!(main.removed_includes().is_empty());
}

#[test]
fn test_same_unit_same_report() {
    let builder = program(&["foo.h", "both.h", "unused.h"]);
    assert_eq!(builder.analyze(), builder.analyze());
}

#[test]
fn test_attribution_is_deterministic() {
    let key = SymbolKey::class("Foo");
    let mut table = SymbolTable::new();
    table.declare(Declaration::new(key.clone(), at("a.h", 1)).definition());
    table.declare(Declaration::new(key.clone(), at("b.h", 1)).definition());
    let mut graph = IncludeGraph::new();
    graph.add(IncludeDirective::new(q("f.cc"), q("a.h"), 1));
    graph.add(IncludeDirective::new(q("f.cc"), q("b.h"), 2));

    let use_ = Use::at(key, q("f.cc"), 5);
    let mut attributor = Attributor::new();
    let first = attributor
        .attribute(&table, &graph, &use_, true)
        .expect("no fatal error");
    let second = attributor
        .attribute(&table, &graph, &use_, true)
        .expect("no fatal error");
    let fresh = Attributor::new()
        .attribute(&table, &graph, &use_, true)
        .expect("no fatal error");

    assert_eq!(first, second);
    assert_eq!(first, fresh);
    assert_eq!(first.map(|a| a.file), Some(q("a.h")));
    assert_eq!(attributor.cache_hits(), 1);
}

#[rstest]
#[case(UseHints { pointer_or_reference: true, ..Default::default() })]
#[case(UseHints { dereferenced: true, ..Default::default() })]
#[case(UseHints { base_class: true, pointer_or_reference: true, ..Default::default() })]
#[case(UseHints { dependent: true, ..Default::default() })]
#[case(UseHints { container: Some("std::vector".into()), ..Default::default() })]
#[case(UseHints { container: Some("std::list".into()), ..Default::default() })]
#[case(UseHints::default())]
fn test_classification_is_a_partition(#[case] hints: UseHints) {
    let policy = AnalysisPolicy::default();
    let classifier = Classifier::new(&policy, &HintOracle);
    let key = SymbolKey::class("Foo");
    let mut table = SymbolTable::new();
    table.intern(&key);
    let symbol = table.get(&key).expect("interned");

    let use_ = Use::at(key.clone(), q("f.cc"), 1).with_hints(hints);
    let verdict = classifier.classify(&use_, symbol).expect("explicit uses are classified");
    assert!(matches!(verdict.kind, UseKind::Full | UseKind::ForwardDeclarable));
    assert!(!verdict.rule.is_empty());
}

#[rstest]
#[case(UseHints { implicit: true, ..Default::default() })]
#[case(UseHints { local_to_declaration: true, ..Default::default() })]
fn test_implicit_and_local_uses_are_not_classified(#[case] hints: UseHints) {
    let policy = AnalysisPolicy::default();
    let classifier = Classifier::new(&policy, &HintOracle);
    let key = SymbolKey::class("Foo");
    let mut table = SymbolTable::new();
    table.intern(&key);
    let symbol = table.get(&key).expect("interned");
    assert!(
        classifier
            .classify(&Use::at(key.clone(), q("f.cc"), 1).with_hints(hints), symbol)
            .is_none()
    );
}
