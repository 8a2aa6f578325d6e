//! Batches of translation units through the parallel driver.

use incwise::AnalysisError;
use incwise::analysis::HintOracle;
use incwise::config::AnalysisPolicy;
use incwise::providers::ProviderMap;
use incwise::session::analyze_units;

use crate::helpers::report_assertions::*;
use crate::helpers::unit_builder::*;

fn unit(main: &str, header: &str) -> UnitBuilder {
    UnitBuilder::new(main)
        .include(main, header)
        .include(main, "unused.h")
        .define("Foo", header)
        .full_use("Foo", main, 10)
}

#[test]
fn test_results_keep_unit_order() {
    let units: Vec<_> = (0..16)
        .map(|i| unit(&format!("src/f{i}.cc"), &format!("h{i}.h")).build())
        .collect();
    let results = analyze_units(&units, &ProviderMap::new(), &AnalysisPolicy::default(), &HintOracle);

    assert_eq!(results.len(), units.len());
    for (i, result) in results.iter().enumerate() {
        let session = result.as_ref().expect("unit analyzes");
        assert_eq!(session.main_file, q(&format!("src/f{i}.cc")));
        let main = main_report(session);
        assert_removes(main, &["#include \"unused.h\""]);
        assert_full(main, &[&format!("#include \"h{i}.h\"")]);
    }
}

#[test]
fn test_failing_unit_does_not_affect_others() {
    let units = vec![
        unit("a.cc", "a.h").build(),
        UnitBuilder::new("loop.h").include("loop.h", "loop.h").build(),
        unit("b.cc", "b.h").build(),
    ];
    let results = analyze_units(&units, &ProviderMap::new(), &AnalysisPolicy::default(), &HintOracle);

    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(AnalysisError::IncludeCycle { .. })
    ));
    assert!(results[2].is_ok());
}

#[test]
fn test_parallel_matches_sequential() {
    let builders = [unit("a.cc", "a.h"), unit("b.cc", "b.h"), unit("c.cc", "c.h")];
    let units: Vec<_> = builders.iter().map(|b| b.try_analyze()).collect();
    let batch: Vec<_> = builders.into_iter().map(UnitBuilder::build).collect();
    let parallel = analyze_units(&batch, &ProviderMap::new(), &AnalysisPolicy::default(), &HintOracle);
    assert_eq!(units, parallel);
}

#[test]
fn test_empty_batch() {
    let results = analyze_units(&[], &ProviderMap::new(), &AnalysisPolicy::default(), &HintOracle);
    assert!(results.is_empty());
}
