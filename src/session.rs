//! Analysis session: the per-translation-unit context.
//!
//! An [`AnalysisSession`] owns everything that is mutable while one
//! translation unit is analyzed: the symbol and declaration arenas, the
//! include graph, the pragma overlay, the attribution cache and one
//! [`FileAnalysis`] per file. It borrows the shared [`ProviderMap`] and
//! [`AnalysisPolicy`], so many sessions can run side by side.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = AnalysisSession::new(main, &providers, &policy, &HintOracle);
//! session.record_include(IncludeDirective::new(main.clone(), header, 1))?;
//! session.record_declaration(declaration)?;
//! session.record_use(use_)?;
//! let report = session.finish()?;
//! ```
//!
//! [`TranslationUnit`] is an owned, replayable list of the same events and
//! [`analyze_units`] fans a batch of them out over `rayon`.

use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::analysis::{
    AnalysisState, Attributor, Classifier, CompletenessOracle, DistanceMap, EngineContext,
    FileAnalysis, FileReport, IncludeGraph, ResolvedUse, finalize,
};
use crate::base::IncludeName;
use crate::config::{AnalysisPolicy, FileGlobs};
use crate::error::{AnalysisError, AnalysisResult};
use crate::hir::{
    Declaration, Diagnostic, DiagnosticCollector, FilePragma, IncludeDirective, IncludePragma,
    PragmaEvent, SymbolKey, SymbolTable, SymbolTraits, Use,
};
use crate::providers::{PragmaOverlay, ProviderMap};

// ============================================================================
// REPORT
// ============================================================================

/// Everything one translation unit produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionReport {
    pub main_file: IncludeName,
    /// The main file first, then its associated headers, then `check_also`
    /// matches.
    pub files: Vec<FileReport>,
    /// Session-level diagnostics: bad globs and patterns, ignored cycles,
    /// unbalanced export regions.
    pub diagnostics: Vec<Diagnostic>,
}

impl SessionReport {
    pub fn report_for(&self, file: &IncludeName) -> Option<&FileReport> {
        self.files.iter().find(|report| &report.file == file)
    }

    pub fn main_report(&self) -> Option<&FileReport> {
        self.report_for(&self.main_file)
    }

    /// Session and per-file diagnostics together.
    pub fn all_diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .chain(self.files.iter().flat_map(|report| report.diagnostics.iter()))
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// Mutable state of one translation unit.
pub struct AnalysisSession<'a> {
    main_file: IncludeName,
    providers: &'a ProviderMap,
    policy: &'a AnalysisPolicy,
    oracle: &'a dyn CompletenessOracle,

    table: SymbolTable,
    graph: IncludeGraph,
    overlay: PragmaOverlay,
    attributor: Attributor,
    files: IndexMap<IncludeName, FileAnalysis>,
    visited: IndexSet<IncludeName>,
    /// File -> line of its open `begin_exports`.
    open_exports: IndexMap<IncludeName, u32>,
    keep_globs: FileGlobs,
    check_also: FileGlobs,
    diagnostics: DiagnosticCollector,
    finished: bool,
}

impl<'a> AnalysisSession<'a> {
    /// Start a session whose main file is already entered.
    pub fn new(
        main_file: IncludeName,
        providers: &'a ProviderMap,
        policy: &'a AnalysisPolicy,
        oracle: &'a dyn CompletenessOracle,
    ) -> Self {
        let mut diagnostics = DiagnosticCollector::new();
        let keep_globs = policy.keep_globs(&mut diagnostics);
        let check_also = policy.check_also_globs(&mut diagnostics);

        let mut files = IndexMap::new();
        files.insert(main_file.clone(), FileAnalysis::new(main_file.clone()));
        let mut visited = IndexSet::new();
        visited.insert(main_file.clone());

        debug!("[SESSION] Starting session for {}", main_file);
        Self {
            main_file,
            providers,
            policy,
            oracle,
            table: SymbolTable::with_system_namespaces(policy.system_namespaces.iter().cloned()),
            graph: IncludeGraph::new(),
            overlay: PragmaOverlay::new(),
            attributor: Attributor::new(),
            files,
            visited,
            open_exports: IndexMap::new(),
            keep_globs,
            check_also,
            diagnostics,
            finished: false,
        }
    }

    pub fn main_file(&self) -> &IncludeName {
        &self.main_file
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.table
    }

    pub fn graph(&self) -> &IncludeGraph {
        &self.graph
    }

    pub fn attributor(&self) -> &Attributor {
        &self.attributor
    }

    /// The analysis of a file the session has seen.
    pub fn file_analysis(&self, file: &IncludeName) -> AnalysisResult<&FileAnalysis> {
        self.files
            .get(file)
            .ok_or_else(|| AnalysisError::UnknownFile { file: file.clone() })
    }

    fn ensure_open(&self) -> AnalysisResult<()> {
        if self.finished {
            Err(AnalysisError::invalid_transition(
                self.main_file.clone(),
                AnalysisState::Finalized,
                AnalysisState::Collecting,
            ))
        } else {
            Ok(())
        }
    }

    fn analysis_mut(&mut self, file: &IncludeName) -> &mut FileAnalysis {
        self.files
            .entry(file.clone())
            .or_insert_with(|| FileAnalysis::new(file.clone()))
    }

    // ------------------------------------------------------------------------
    // Recording
    // ------------------------------------------------------------------------

    /// The front end entered `file`. Entering a file twice is an error.
    pub fn begin_file(&mut self, file: IncludeName) -> AnalysisResult<()> {
        self.ensure_open()?;
        if !self.visited.insert(file.clone()) {
            return Err(AnalysisError::AlreadyAnalyzed { file });
        }
        debug!("[SESSION] Entering {}", file);
        self.analysis_mut(&file);
        Ok(())
    }

    pub fn record_include(&mut self, directive: IncludeDirective) -> AnalysisResult<()> {
        self.ensure_open()?;
        let includer = directive.includer.clone();
        let included = directive.included.clone();
        self.graph.add(directive.clone());
        self.overlay.observe_include(&includer, &included);

        let exported = directive.pragma == Some(IncludePragma::Export)
            || self.open_exports.contains_key(&includer);
        let analysis = self.analysis_mut(&includer);
        analysis.record_include(directive)?;
        if exported {
            analysis.mark_exported(included.clone())?;
            self.overlay.add_export(included, includer);
        }
        Ok(())
    }

    /// Add a declaration to the arena. Hand-written forward declarations are
    /// also recorded against their file.
    pub fn record_declaration(&mut self, declaration: Declaration) -> AnalysisResult<()> {
        self.ensure_open()?;
        let file = declaration.file().clone();
        let is_forward = declaration.is_forward_declaration();
        let id = self.table.declare(declaration);
        if is_forward {
            self.analysis_mut(&file).record_forward_decl(id)?;
        }
        Ok(())
    }

    pub fn record_traits(&mut self, symbol: &SymbolKey, traits: SymbolTraits) -> AnalysisResult<()> {
        self.ensure_open()?;
        self.table.add_traits(symbol, traits);
        Ok(())
    }

    pub fn record_use(&mut self, use_: Use) -> AnalysisResult<()> {
        self.ensure_open()?;
        self.table.intern(&use_.symbol);
        let file = use_.referencing_file.clone();
        self.analysis_mut(&file).record_use(use_)
    }

    pub fn record_pragma(&mut self, event: PragmaEvent) -> AnalysisResult<()> {
        self.ensure_open()?;
        let PragmaEvent { file, line, pragma } = event;
        match pragma {
            FilePragma::Private { public } => {
                self.overlay.mark_private(file.clone(), public);
                self.analysis_mut(&file).mark_private()?;
            }
            FilePragma::BeginExports => {
                if let Some(open) = self.open_exports.get(&file) {
                    warn!("[SESSION] {}:{}: begin_exports inside region opened at line {}", file, line, open);
                    self.diagnostics
                        .unbalanced_exports(&file, line, "begin_exports inside an open region");
                } else {
                    self.open_exports.insert(file, line);
                }
            }
            FilePragma::EndExports => {
                if self.open_exports.shift_remove(&file).is_none() {
                    warn!("[SESSION] {}:{}: end_exports without begin_exports", file, line);
                    self.diagnostics
                        .unbalanced_exports(&file, line, "end_exports without begin_exports");
                }
            }
            FilePragma::AlwaysKeep => self.overlay.mark_always_keep(file),
            FilePragma::Friend(pattern) => {
                if let Err(err) = self.overlay.add_friend(file, &pattern) {
                    warn!("[SESSION] Dropping friend pattern '{}': {}", pattern, err);
                    self.diagnostics.unresolvable_pattern(&pattern, &err.to_string());
                }
            }
            FilePragma::NoInclude(include) => self.analysis_mut(&file).add_no_include(include)?,
            FilePragma::NoForwardDeclare(symbol) => {
                self.analysis_mut(&file).add_no_forward_declare(symbol)?
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Finishing
    // ------------------------------------------------------------------------

    /// Associated headers of the main file: includes marked `associated`,
    /// plus the first header include sharing the main file's canonical name.
    fn associated_headers(&self) -> Vec<IncludeName> {
        let Some(main) = self.files.get(&self.main_file) else {
            return Vec::new();
        };
        let mut associated: Vec<IncludeName> = main.pragmas().associated.iter().cloned().collect();
        if self.main_file.is_header() {
            return associated;
        }
        let canonical = self.main_file.canonical();
        let canonical_file_name = self.main_file.canonical_file_name();
        let by_name = main.current_includes().iter().map(|d| &d.included).find(|included| {
            included.is_header()
                && !included.is_inline_definitions()
                && (included.canonical() == canonical
                    || included.canonical_file_name() == canonical_file_name)
        });
        if let Some(header) = by_name {
            if !associated.contains(header) {
                associated.push(header.clone());
            }
        }
        associated
    }

    fn check_cycle(&mut self, file: &IncludeName) -> AnalysisResult<()> {
        let Some(cycle) = self.graph.find_cycle(file) else {
            return Ok(());
        };
        if self.policy.ignore_cycles {
            warn!("[SESSION] Ignoring include cycle through {}", file);
            self.diagnostics.cycle_ignored(file, &cycle);
            Ok(())
        } else {
            Err(AnalysisError::include_cycle(file.clone(), cycle))
        }
    }

    /// Classify and attribute every use recorded in `file`.
    fn resolve(&mut self, file: &IncludeName) -> AnalysisResult<()> {
        let reach = DistanceMap::new(&self.graph, file);
        let classifier = Classifier::new(self.policy, self.oracle);
        let analysis = self
            .files
            .entry(file.clone())
            .or_insert_with(|| FileAnalysis::new(file.clone()));
        analysis.transition(AnalysisState::Resolving)?;

        let uses = analysis.uses().to_vec();
        for use_ in uses {
            let Some(symbol) = self.table.get(&use_.symbol) else {
                continue;
            };
            let Some(verdict) = classifier.classify(&use_, symbol) else {
                continue;
            };
            let attribution =
                self.attributor
                    .attribute(&self.table, &reach, &use_, self.policy.using_is_a_use)?;
            analysis.add_resolved(ResolvedUse {
                use_,
                verdict,
                attribution,
            })?;
        }
        Ok(())
    }

    fn finalize_file(
        &mut self,
        file: &IncludeName,
        associated: &[IncludeName],
        associated_includes: &IndexSet<IncludeName>,
        pch: Option<&IncludeName>,
    ) -> AnalysisResult<FileReport> {
        self.check_cycle(file)?;
        self.resolve(file)?;
        let ctx = EngineContext {
            table: &self.table,
            graph: &self.graph,
            providers: self.providers.view(&self.overlay),
            policy: self.policy,
            keep_globs: &self.keep_globs,
            associated,
            associated_includes,
            pch,
        };
        let analysis = self
            .files
            .get_mut(file)
            .ok_or_else(|| AnalysisError::UnknownFile { file: file.clone() })?;
        finalize(&ctx, analysis)
    }

    /// Resolve and finalize the main file, its associated headers and every
    /// `check_also` match. A session finishes once.
    pub fn finish(&mut self) -> AnalysisResult<SessionReport> {
        if self.finished {
            return Err(AnalysisError::invalid_transition(
                self.main_file.clone(),
                AnalysisState::Finalized,
                AnalysisState::Finalized,
            ));
        }
        self.finished = true;

        for (file, line) in std::mem::take(&mut self.open_exports) {
            warn!("[SESSION] {}:{}: begin_exports never closed", file, line);
            self.diagnostics
                .unbalanced_exports(&file, line, "begin_exports without end_exports");
        }

        let main = self.main_file.clone();
        let associated = self.associated_headers();
        let extra: Vec<IncludeName> = if self.check_also.is_empty() {
            Vec::new()
        } else {
            self.graph
                .files()
                .filter(|f| **f != main && !associated.contains(f) && self.check_also.matches(f))
                .cloned()
                .collect()
        };
        debug!(
            "[SESSION] Finishing {} ({} associated, {} check_also)",
            main,
            associated.len(),
            extra.len()
        );

        let no_includes = IndexSet::new();
        let mut associated_reports = Vec::with_capacity(associated.len());
        let mut associated_includes: IndexSet<IncludeName> = IndexSet::new();
        for header in &associated {
            let report = self.finalize_file(header, &[], &no_includes, None)?;
            associated_includes.extend(report.full_includes().into_iter().cloned());
            associated_reports.push(report);
        }

        let pch = if self.policy.pch_in_code {
            self.files
                .get(&main)
                .and_then(|analysis| analysis.current_includes().first())
                .map(|directive| directive.included.clone())
        } else {
            None
        };
        let main_report = self.finalize_file(&main, &associated, &associated_includes, pch.as_ref())?;

        let mut files = vec![main_report];
        files.extend(associated_reports);
        for file in &extra {
            files.push(self.finalize_file(file, &[], &no_includes, None)?);
        }

        info!(
            "[SESSION] {}: {} file(s) reported, {} cached attribution(s) reused",
            main,
            files.len(),
            self.attributor.cache_hits()
        );
        Ok(SessionReport {
            main_file: main,
            files,
            diagnostics: std::mem::take(&mut self.diagnostics).into_diagnostics(),
        })
    }
}

impl std::fmt::Debug for AnalysisSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisSession")
            .field("main_file", &self.main_file)
            .field("files", &self.files.len())
            .field("symbols", &self.table.symbol_count())
            .field("finished", &self.finished)
            .finish()
    }
}

// ============================================================================
// TRANSLATION UNITS
// ============================================================================

/// One fact pushed by the front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrontEndEvent {
    /// The traversal entered a file other than the main file.
    Enter(IncludeName),
    Include(IncludeDirective),
    Declaration(Declaration),
    Pragma(PragmaEvent),
    Traits(SymbolKey, SymbolTraits),
    Use(Use),
}

/// Owned event list for one translation unit, replayable into a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslationUnit {
    pub main_file: IncludeName,
    pub events: Vec<FrontEndEvent>,
}

impl TranslationUnit {
    pub fn new(main_file: IncludeName) -> Self {
        Self {
            main_file,
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, event: FrontEndEvent) -> &mut Self {
        self.events.push(event);
        self
    }

    /// Feed every event to `session`, in order.
    pub fn replay(&self, session: &mut AnalysisSession<'_>) -> AnalysisResult<()> {
        for event in &self.events {
            match event {
                FrontEndEvent::Enter(file) => session.begin_file(file.clone())?,
                FrontEndEvent::Include(directive) => session.record_include(directive.clone())?,
                FrontEndEvent::Declaration(decl) => session.record_declaration(decl.clone())?,
                FrontEndEvent::Pragma(pragma) => session.record_pragma(pragma.clone())?,
                FrontEndEvent::Traits(key, traits) => session.record_traits(key, traits.clone())?,
                FrontEndEvent::Use(use_) => session.record_use(use_.clone())?,
            }
        }
        Ok(())
    }

    /// Run a fresh session over this unit.
    pub fn analyze(
        &self,
        providers: &ProviderMap,
        policy: &AnalysisPolicy,
        oracle: &dyn CompletenessOracle,
    ) -> AnalysisResult<SessionReport> {
        let mut session = AnalysisSession::new(self.main_file.clone(), providers, policy, oracle);
        self.replay(&mut session)?;
        session.finish()
    }
}

/// Analyze independent translation units in parallel. Results keep the order
/// of `units`; one unit failing does not affect the others.
pub fn analyze_units(
    units: &[TranslationUnit],
    providers: &ProviderMap,
    policy: &AnalysisPolicy,
    oracle: &dyn CompletenessOracle,
) -> Vec<AnalysisResult<SessionReport>> {
    debug!("[SESSION] Analyzing {} translation unit(s)", units.len());
    units
        .par_iter()
        .map(|unit| unit.analyze(providers, policy, oracle))
        .collect()
}
