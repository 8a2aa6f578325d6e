//! Analysis: classification, attribution and include decisions.
//!
//! ## Pipeline
//!
//! ```text
//! Use ──▶ Classifier ──▶ Attributor ──▶ FileAnalysis ──▶ engine::finalize ──▶ FileReport
//!            │               │                               │
//!     CompletenessOracle  IncludeGraph                  ProviderView
//! ```
//!
//! ## Key Types
//!
//! - [`Classifier`]: ordered rule table, full use vs forward-declarable
//! - [`Attributor`]: one declaring file per use, with its instantiation cache
//! - [`IncludeGraph`]: who includes whom, distances, cycles
//! - [`FileAnalysis`]: per-file aggregate and its state machine
//! - [`FileReport`]: add, remove and full include lists

mod attribute;
mod classify;
mod engine;
mod file_analysis;
mod include_graph;
mod lines;
mod minimal;

pub use attribute::{Attribution, AttributionRule, Attributor};
pub use classify::{
    Classifier, CompletenessOracle, HintOracle, Rule, UseKind, Verdict, rule_names,
};
pub use engine::{
    EngineContext, FileReport, IgnoreReason, UseOutcome, UseStatus, finalize,
};
pub use file_analysis::{AnalysisState, FileAnalysis, PragmaOverrides, ResolvedUse};
pub use include_graph::{ClosureCache, DistanceMap, IncludeGraph, Reachability};
pub use lines::{LineKind, OutputLine, SortContext, forward_decl_text};
pub use minimal::{Assignment, Cover, CoverInput, choose_includes};
