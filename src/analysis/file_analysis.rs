//! Per-file aggregate built while a translation unit is traversed.
//!
//! A [`FileAnalysis`] moves strictly forward through
//! `Collecting -> Resolving -> Finalized`. Recording is only possible while
//! collecting, resolved uses are only accepted while resolving, and a
//! finalized analysis is read-only.

use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;
use tracing::debug;

use super::attribute::Attribution;
use super::classify::{UseKind, Verdict};
use crate::base::IncludeName;
use crate::error::{AnalysisError, AnalysisResult};
use crate::hir::{DeclId, IncludeDirective, IncludePragma, SymbolKey, Use};

/// Lifecycle of a [`FileAnalysis`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnalysisState {
    /// Uses and includes are streaming in.
    Collecting,
    /// Uses are being classified and attributed.
    Resolving,
    /// Add and remove lists are computed.
    Finalized,
}

impl AnalysisState {
    fn next(self) -> Option<AnalysisState> {
        match self {
            AnalysisState::Collecting => Some(AnalysisState::Resolving),
            AnalysisState::Resolving => Some(AnalysisState::Finalized),
            AnalysisState::Finalized => None,
        }
    }
}

/// Pragma markers scoped to one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PragmaOverrides {
    /// Includes carrying `keep`.
    pub keep: IndexSet<IncludeName>,
    /// Includes carrying `export` or written inside an export region.
    pub exported: IndexSet<IncludeName>,
    /// Includes marked `associated`.
    pub associated: IndexSet<IncludeName>,
    /// `no_include` targets.
    pub no_include: IndexSet<IncludeName>,
    /// Symbols named by `no_forward_declare`.
    pub no_forward_declare: IndexSet<SmolStr>,
    pub is_private: bool,
}

/// A use after classification and attribution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedUse {
    pub use_: Use,
    pub verdict: Verdict,
    pub attribution: Option<Attribution>,
}

/// Everything known about one analyzed file.
#[derive(Clone, Debug)]
pub struct FileAnalysis {
    file: IncludeName,
    state: AnalysisState,
    current_includes: Vec<IncludeDirective>,
    current_forward_decls: Vec<DeclId>,
    uses: Vec<Use>,
    resolved: Vec<ResolvedUse>,
    pragmas: PragmaOverrides,
}

impl FileAnalysis {
    pub fn new(file: IncludeName) -> Self {
        Self {
            file,
            state: AnalysisState::Collecting,
            current_includes: Vec::new(),
            current_forward_decls: Vec::new(),
            uses: Vec::new(),
            resolved: Vec::new(),
            pragmas: PragmaOverrides::default(),
        }
    }

    pub fn file(&self) -> &IncludeName {
        &self.file
    }

    pub fn state(&self) -> AnalysisState {
        self.state
    }

    /// Includes as written, in source order.
    pub fn current_includes(&self) -> &[IncludeDirective] {
        &self.current_includes
    }

    /// Forward declarations written in the file, in source order.
    pub fn current_forward_decls(&self) -> &[DeclId] {
        &self.current_forward_decls
    }

    pub fn uses(&self) -> &[Use] {
        &self.uses
    }

    pub fn resolved_uses(&self) -> &[ResolvedUse] {
        &self.resolved
    }

    pub fn pragmas(&self) -> &PragmaOverrides {
        &self.pragmas
    }

    // ------------------------------------------------------------------------
    // Collecting
    // ------------------------------------------------------------------------

    fn ensure(&self, expected: AnalysisState, attempted: AnalysisState) -> AnalysisResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(AnalysisError::invalid_transition(
                self.file.clone(),
                self.state,
                attempted,
            ))
        }
    }

    pub fn record_include(&mut self, directive: IncludeDirective) -> AnalysisResult<()> {
        self.ensure(AnalysisState::Collecting, AnalysisState::Collecting)?;
        match directive.pragma {
            Some(IncludePragma::Keep) => {
                self.pragmas.keep.insert(directive.included.clone());
            }
            Some(IncludePragma::Export) => {
                self.pragmas.exported.insert(directive.included.clone());
            }
            Some(IncludePragma::Associated) => {
                self.pragmas.associated.insert(directive.included.clone());
            }
            None => {}
        }
        self.current_includes.push(directive);
        Ok(())
    }

    /// An include inside a `begin_exports` region.
    pub fn mark_exported(&mut self, included: IncludeName) -> AnalysisResult<()> {
        self.ensure(AnalysisState::Collecting, AnalysisState::Collecting)?;
        self.pragmas.exported.insert(included);
        Ok(())
    }

    pub fn record_forward_decl(&mut self, decl: DeclId) -> AnalysisResult<()> {
        self.ensure(AnalysisState::Collecting, AnalysisState::Collecting)?;
        self.current_forward_decls.push(decl);
        Ok(())
    }

    pub fn record_use(&mut self, use_: Use) -> AnalysisResult<()> {
        self.ensure(AnalysisState::Collecting, AnalysisState::Collecting)?;
        self.uses.push(use_);
        Ok(())
    }

    pub fn add_no_include(&mut self, include: IncludeName) -> AnalysisResult<()> {
        self.ensure(AnalysisState::Collecting, AnalysisState::Collecting)?;
        self.pragmas.no_include.insert(include);
        Ok(())
    }

    pub fn add_no_forward_declare(&mut self, symbol: SmolStr) -> AnalysisResult<()> {
        self.ensure(AnalysisState::Collecting, AnalysisState::Collecting)?;
        let symbol = symbol.strip_prefix("::").map(SmolStr::new).unwrap_or(symbol);
        self.pragmas.no_forward_declare.insert(symbol);
        Ok(())
    }

    pub fn mark_private(&mut self) -> AnalysisResult<()> {
        self.ensure(AnalysisState::Collecting, AnalysisState::Collecting)?;
        self.pragmas.is_private = true;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Move to the next state. Backward moves and skips are errors.
    pub fn transition(&mut self, to: AnalysisState) -> AnalysisResult<()> {
        if self.state.next() != Some(to) {
            return Err(AnalysisError::invalid_transition(
                self.file.clone(),
                self.state,
                to,
            ));
        }
        debug!("[ENGINE] {}: {:?} -> {:?}", self.file, self.state, to);
        self.state = to;
        Ok(())
    }

    pub fn add_resolved(&mut self, resolved: ResolvedUse) -> AnalysisResult<()> {
        self.ensure(AnalysisState::Resolving, AnalysisState::Resolving)?;
        self.resolved.push(resolved);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    fn required(&self, kind: UseKind) -> IndexMap<SymbolKey, IncludeName> {
        let mut required = IndexMap::new();
        for resolved in &self.resolved {
            if resolved.verdict.kind != kind {
                continue;
            }
            if let Some(attribution) = &resolved.attribution {
                required
                    .entry(resolved.use_.symbol.clone())
                    .or_insert_with(|| attribution.file.clone());
            }
        }
        required
    }

    /// Symbol -> attributed file, for full uses.
    pub fn required_full_uses(&self) -> IndexMap<SymbolKey, IncludeName> {
        self.required(UseKind::Full)
    }

    /// Symbol -> attributed file, for forward-declarable uses.
    pub fn required_forward_declarable_uses(&self) -> IndexMap<SymbolKey, IncludeName> {
        self.required(UseKind::ForwardDeclarable)
    }
}
