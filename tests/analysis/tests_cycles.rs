//! Include cycles terminate under both cycle policies.

use incwise::AnalysisError;
use incwise::analysis::{IgnoreReason, UseStatus};
use incwise::config::AnalysisPolicy;
use incwise::hir::codes;

use crate::helpers::report_assertions::*;
use crate::helpers::unit_builder::*;

fn ignoring_cycles() -> AnalysisPolicy {
    AnalysisPolicy {
        ignore_cycles: true,
        ..AnalysisPolicy::default()
    }
}

fn self_cycle() -> UnitBuilder {
    UnitBuilder::new("a.h")
        .include("a.h", "a.h")
        .define("Foo", "a.h")
        .full_use("Foo", "a.h", 10)
}

fn two_cycle() -> UnitBuilder {
    UnitBuilder::new("a.h")
        .include("a.h", "b.h")
        .include("b.h", "a.h")
        .define("Bar", "b.h")
        .full_use("Bar", "a.h", 10)
}

#[test]
fn test_self_cycle_is_fatal_by_default() {
    let err = self_cycle().try_analyze().expect_err("cycle");
    assert_eq!(
        err,
        AnalysisError::IncludeCycle {
            file: q("a.h"),
            cycle: vec![q("a.h"), q("a.h")],
        }
    );
    assert_eq!(err.to_diagnostic().code.as_deref(), Some(codes::INCLUDE_CYCLE));
}

#[test]
fn test_two_cycle_is_fatal_by_default() {
    let err = two_cycle().try_analyze().expect_err("cycle");
    assert_eq!(
        err,
        AnalysisError::IncludeCycle {
            file: q("a.h"),
            cycle: vec![q("a.h"), q("b.h"), q("a.h")],
        }
    );
}

#[test]
fn test_self_cycle_ignored_by_policy() {
    let session = self_cycle().policy(ignoring_cycles()).analyze();
    assert_eq!(codes(&session.diagnostics), vec![codes::CYCLE_IGNORED]);
    assert!(main_report(&session).added_includes().is_empty());
}

#[test]
fn test_two_cycle_ignored_by_policy() {
    let session = two_cycle().policy(ignoring_cycles()).analyze();
    assert_eq!(codes(&session.diagnostics), vec![codes::CYCLE_IGNORED]);
    let main = main_report(&session);
    // b.h includes a.h back, so it cannot be what a.h needs.
    let outcome = main.outcomes_for("Bar").next().expect("outcome for Bar");
    assert_eq!(
        outcome.status,
        UseStatus::Ignored(IgnoreReason::BackwardsInclude)
    );
    assert_eq!(main.removed_includes(), vec![&q("b.h")]);
}

#[test]
fn test_cycle_outside_reported_files_is_harmless() {
    let session = UnitBuilder::new("f.cc")
        .include("f.cc", "a.h")
        .include("a.h", "b.h")
        .include("b.h", "a.h")
        .define("Foo", "a.h")
        .full_use("Foo", "f.cc", 10)
        .analyze();
    assert!(session.diagnostics.is_empty());
    assert_clean(main_report(&session));
}
