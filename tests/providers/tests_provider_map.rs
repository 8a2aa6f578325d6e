//! Resolution through the built-in tables and programmatic mappings.

use incwise::hir::codes;
use incwise::providers::{ProviderMap, ResolutionStep, Visibility};
use rstest::rstest;

use crate::helpers::report_assertions::codes;
use crate::helpers::unit_builder::*;

#[rstest]
#[case("<bits/stl_vector.h>", "<vector>")]
#[case("<bits/stl_map.h>", "<map>")]
#[case("<bits/types/FILE.h>", "<stdio.h>")]
fn test_builtin_private_headers_resolve(#[case] private: &str, #[case] public: &str) {
    let map = ProviderMap::with_builtins();
    let resolved = map.resolve(&file(private));
    assert_eq!(resolved.file, file(public));
    assert_eq!(resolved.step, ResolutionStep::Builtin);
    assert!(resolved.is_public);
}

#[test]
fn test_public_header_resolves_to_itself() {
    let map = ProviderMap::with_builtins();
    let resolved = map.resolve(&a("stdio.h"));
    assert_eq!(resolved.file, a("stdio.h"));
    assert_eq!(resolved.step, ResolutionStep::Identity);
}

#[test]
fn test_empty_map_has_no_builtins() {
    let resolved = ProviderMap::new().resolve(&a("bits/stl_vector.h"));
    assert_eq!(resolved.file, a("bits/stl_vector.h"));
    assert!(resolved.is_public);
}

#[test]
fn test_user_mapping_chain() {
    let mut builder = ProviderMap::builder();
    builder
        .add_mapping_text("\"a.h\"", Visibility::Private, "\"b.h\"", Visibility::Private)
        .add_mapping_text("\"b.h\"", Visibility::Private, "\"c.h\"", Visibility::Public);
    let map = builder.build();
    let resolved = map.resolve(&q("a.h"));
    assert_eq!(resolved.file, q("c.h"));
    assert_eq!(resolved.step, ResolutionStep::UserExact);
}

#[test]
fn test_mapping_loop_terminates() {
    let mut builder = ProviderMap::builder();
    builder
        .add_mapping_text("\"a.h\"", Visibility::Private, "\"b.h\"", Visibility::Private)
        .add_mapping_text("\"b.h\"", Visibility::Private, "\"a.h\"", Visibility::Private);
    let resolved = builder.build().resolve(&q("a.h"));
    assert!(!resolved.is_public);
}

#[test]
fn test_private_without_mapping_stays_private() {
    let mut builder = ProviderMap::builder();
    builder.mark_visibility(q("lonely.h"), Visibility::Private);
    let resolved = builder.build().resolve(&q("lonely.h"));
    assert_eq!(resolved.file, q("lonely.h"));
    assert!(!resolved.is_public);
}

#[test]
fn test_regex_mapping() {
    let mut builder = ProviderMap::builder();
    builder.add_mapping_text(
        "@\"lib/detail/.*\"",
        Visibility::Private,
        "\"lib/api.h\"",
        Visibility::Public,
    );
    let map = builder.build();
    assert_eq!(map.resolve(&q("lib/detail/x.h")).file, q("lib/api.h"));
    assert_eq!(map.resolve(&q("lib/other.h")).file, q("lib/other.h"));
}

#[test]
fn test_bad_regex_is_dropped_with_warning() {
    let mut builder = ProviderMap::builder();
    builder.add_mapping_text("@\"(bad", Visibility::Private, "\"x.h\"", Visibility::Public);
    let (map, diagnostics) = builder.build_with_diagnostics();
    assert!(map.edges().is_empty());
    assert_eq!(
        codes(&diagnostics.into_diagnostics()),
        vec![codes::UNRESOLVABLE_PATTERN]
    );
}

#[test]
fn test_symbol_providers_keep_order() {
    let mut builder = ProviderMap::builder();
    builder
        .add_symbol("NULL", a("cstddef"))
        .add_symbol("NULL", a("cstdio"))
        .add_symbol("NULL", a("cstddef"));
    let map = builder.build();
    assert_eq!(map.symbol_providers("NULL"), &[a("cstddef"), a("cstdio")]);
    assert!(map.symbol_providers("size_t").is_empty());
}
