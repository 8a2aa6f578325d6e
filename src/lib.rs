//! # incwise-base
//!
//! Core library for C/C++ include analysis: which `#include`s and forward
//! declarations a file needs, and which it can drop.
//!
//! The library performs no parsing and no I/O on sources. A front end pushes
//! includes, declarations, pragmas and symbol uses into an
//! [`AnalysisSession`]; the session answers with add, remove and full
//! include lists per file.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! session   → Per-translation-unit context, replay, parallel driver
//!   ↓
//! analysis  → Use Classifier, Symbol Attributor, Decision Engine
//!   ↓
//! providers → Provider Map: private → public headers, pragmas, mapping files
//!   ↓
//! hir       → Symbols, declarations, uses, pragmas, diagnostics
//!   ↓
//! base      → Primitives (IncludeName, locations, path heuristics)
//! ```
//!
//! `config` and `error` sit beside the stack and are used by every layer
//! above `hir`.

// ============================================================================
// MODULES (dependency order: base → hir → providers → analysis → session)
// ============================================================================

/// Foundation types: IncludeName, locations, path heuristics
pub mod base;

/// High-level IR: symbols, declarations, uses, pragmas, diagnostics
pub mod hir;

/// Provider Map: private/public headers, pragma overlay, mapping files
pub mod providers;

/// Classification, attribution and include decisions
pub mod analysis;

/// Analysis session and translation-unit driver
pub mod session;

/// Policy switches and mapping-file configuration
pub mod config;

/// Fatal analysis errors and mapping-file errors
pub mod error;

// Re-export the types a front end needs
pub use analysis::{CompletenessOracle, FileReport, HintOracle, UseKind};
pub use base::{IncludeName, LineRange, Location, SourceLoc};
pub use config::{AnalysisConfig, AnalysisPolicy};
pub use error::{AnalysisError, AnalysisResult, MappingError};
pub use providers::ProviderMap;
pub use session::{AnalysisSession, FrontEndEvent, SessionReport, TranslationUnit, analyze_units};
