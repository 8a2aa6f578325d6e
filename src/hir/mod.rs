//! High-level IR: the facts the front end hands to the analyzer.
//!
//! ## Key Types
//!
//! - [`SymbolTable`]: arena of [`Symbol`]s and [`Declaration`]s keyed by [`SymbolKey`]
//! - [`Use`]: one reference to a symbol, with [`UseHints`]
//! - [`IncludeDirective`], [`FilePragma`]: include lines and pragma markers
//! - [`Diagnostic`], [`DiagnosticCollector`]: non-fatal findings
//!
//! Nothing here makes decisions; classification, attribution and include
//! choice live in [`crate::analysis`].

mod diagnostics;
mod pragmas;
mod symbols;
mod uses;

pub use diagnostics::{Diagnostic, DiagnosticCollector, RelatedInfo, Severity, codes};
pub use pragmas::{FilePragma, IncludeDirective, IncludePragma, PragmaEvent};
pub use symbols::{
    DeclId, Declaration, InstantiationKind, RecordTag, Symbol, SymbolId, SymbolKey, SymbolKind,
    SymbolTable, SymbolTraits,
};
pub use uses::{AliasRef, Use, UseHints};
