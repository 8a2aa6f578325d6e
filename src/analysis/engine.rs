//! Decision Engine: add, remove and full include lists for one file.
//!
//! ## Steps
//!
//! 1. Trim uses that need nothing: builtins, symbols the file defines itself,
//!    backwards includes, nested classes declared elsewhere. A full use
//!    sitting between a local forward declaration and the local definition
//!    is treated as forward-declarable.
//! 2. Map each remaining full use to its ordered public candidates and
//!    choose the desired includes ([`choose_includes`]).
//! 3. Forward-declarable uses not covered by a full use or by a declaration
//!    visible through a kept include become forward-declare lines.
//! 4. Present lines survive when desired or protected (`keep`, `export`,
//!    `always_keep`, keep globs, associated and precompiled headers, opaque
//!    artifacts). Duplicates collapse to the first occurrence.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use super::classify::UseKind;
use super::file_analysis::{AnalysisState, FileAnalysis, ResolvedUse};
use super::include_graph::{ClosureCache, IncludeGraph};
use super::lines::{OutputLine, SortContext};
use super::minimal::{Assignment, CoverInput, choose_includes};
use crate::base::IncludeName;
use crate::config::{AnalysisPolicy, FileGlobs};
use crate::error::AnalysisResult;
use crate::hir::{Diagnostic, DiagnosticCollector, SymbolKey, SymbolTable};
use crate::providers::ProviderView;

// ============================================================================
// REPORT TYPES
// ============================================================================

/// Why a use needs nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    DefinedEarlierInFile,
    NestedClass,
    DefinedInFile,
    Builtin,
    BackwardsInclude,
    OutsideTransitiveClosure,
    /// Forward-declarable use of a symbol the file also uses fully.
    CoveredByFullUse,
    /// Only non-header or `no_include` providers exist.
    NoUsableProvider,
}

/// What the engine decided for one use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UseStatus {
    Ignored(IgnoreReason),
    /// The referencing file provides the symbol.
    SelfProvided,
    /// An include of an associated header provides it.
    ViaAssociated(IncludeName),
    /// Provided by this include of the file (present or added).
    Included(IncludeName),
    /// A forward-declare line covers it.
    ForwardDeclared,
    /// Nothing declares the symbol.
    NoDeclaration,
}

/// Per-use outcome for renderers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UseOutcome {
    pub symbol: SymbolKey,
    pub line: u32,
    pub kind: UseKind,
    /// Classifier rule that decided `kind`.
    pub rule: &'static str,
    pub attributed: Option<IncludeName>,
    pub status: UseStatus,
}

/// The result of finalizing one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileReport {
    pub file: IncludeName,
    /// Lines to add, in sort order.
    pub add: Vec<OutputLine>,
    /// Present lines to delete, in source order.
    pub remove: Vec<OutputLine>,
    /// The complete minimal set of lines, in sort order.
    pub full: Vec<OutputLine>,
    pub uses: Vec<UseOutcome>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    /// True when nothing needs to change.
    pub fn is_clean(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    pub fn added_includes(&self) -> Vec<&IncludeName> {
        self.add.iter().filter_map(OutputLine::included).collect()
    }

    pub fn removed_includes(&self) -> Vec<&IncludeName> {
        self.remove.iter().filter_map(OutputLine::included).collect()
    }

    pub fn full_includes(&self) -> Vec<&IncludeName> {
        self.full.iter().filter_map(OutputLine::included).collect()
    }

    pub fn added_forward_decls(&self) -> Vec<String> {
        self.add
            .iter()
            .filter(|line| line.is_forward_decl())
            .map(OutputLine::text)
            .collect()
    }

    pub fn removed_forward_decls(&self) -> Vec<String> {
        self.remove
            .iter()
            .filter(|line| line.is_forward_decl())
            .map(OutputLine::text)
            .collect()
    }

    /// Outcomes for a symbol, by qualified name.
    pub fn outcomes_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a UseOutcome> + 'a {
        self.uses.iter().filter(move |o| o.symbol.name == name)
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Read-only facts the engine consults while finalizing one file.
#[derive(Clone, Copy, Debug)]
pub struct EngineContext<'a> {
    pub table: &'a SymbolTable,
    pub graph: &'a IncludeGraph,
    pub providers: ProviderView<'a>,
    pub policy: &'a AnalysisPolicy,
    pub keep_globs: &'a FileGlobs,
    /// Associated headers of the file being finalized.
    pub associated: &'a [IncludeName],
    /// Includes the associated headers end up with.
    pub associated_includes: &'a IndexSet<IncludeName>,
    /// Precompiled header, when the file is the main file under `pch_in_code`.
    pub pch: Option<&'a IncludeName>,
}

struct Need {
    outcome: usize,
    candidates: Vec<IncludeName>,
}

/// Finalize a resolved file.
pub fn finalize(ctx: &EngineContext<'_>, analysis: &mut FileAnalysis) -> AnalysisResult<FileReport> {
    let file = analysis.file().clone();
    debug!("[ENGINE] Finalizing {}", file);

    let mut diagnostics = DiagnosticCollector::new();
    let present: IndexSet<IncludeName> = analysis
        .current_includes()
        .iter()
        .map(|d| d.included.clone())
        .collect();
    let mut closures = ClosureCache::new(ctx.graph);

    let mut outcomes = Vec::with_capacity(analysis.resolved_uses().len());
    let mut needs: Vec<Need> = Vec::new();
    let mut forward: Vec<usize> = Vec::new();
    let mut full_symbols: FxHashSet<SymbolKey> = FxHashSet::default();
    let mut warned_private: FxHashSet<IncludeName> = FxHashSet::default();

    for resolved in analysis.resolved_uses() {
        let idx = outcomes.len();
        let mut outcome = UseOutcome {
            symbol: resolved.use_.symbol.clone(),
            line: resolved.use_.line(),
            kind: resolved.verdict.kind,
            rule: resolved.verdict.rule,
            attributed: resolved.attribution.as_ref().map(|a| a.file.clone()),
            status: UseStatus::NoDeclaration,
        };
        if outcome.kind == UseKind::ForwardDeclarable
            && (ctx.policy.no_forward_decls
                || analysis
                    .pragmas()
                    .no_forward_declare
                    .contains(&resolved.use_.symbol.name))
        {
            outcome.kind = UseKind::Full;
        }

        let Some(attributed) = outcome.attributed.clone() else {
            let providers = ctx.providers.symbol_providers(&resolved.use_.symbol.name);
            let candidates = usable(analysis, &file, &present, providers.to_vec());
            if candidates.is_empty() {
                diagnostics.needs_declaration(&file, outcome.line, &resolved.use_.symbol.name);
            } else {
                full_symbols.insert(outcome.symbol.clone());
                needs.push(Need {
                    outcome: idx,
                    candidates,
                });
            }
            outcomes.push(outcome);
            continue;
        };

        match outcome.kind {
            UseKind::ForwardDeclarable => {
                if let Some(reason) = forward_ignore_reason(ctx, &file, resolved) {
                    outcome.status = UseStatus::Ignored(reason);
                } else {
                    forward.push(idx);
                }
            }
            UseKind::Full => {
                if needs_local_forward_decl(ctx, &file, resolved) {
                    outcome.kind = UseKind::ForwardDeclarable;
                    forward.push(idx);
                    outcomes.push(outcome);
                    continue;
                }
                if let Some(reason) =
                    full_ignore_reason(ctx, &mut closures, &file, &attributed, resolved)
                {
                    outcome.status = UseStatus::Ignored(reason);
                    outcomes.push(outcome);
                    continue;
                }

                let resolution = ctx.providers.resolve_for(&attributed, &file);
                if !resolution.is_public && warned_private.insert(resolution.file.clone()) {
                    diagnostics.no_public_header(&resolution.file);
                }
                let mut candidates = ctx.providers.public_candidates(&attributed, &file);
                if ctx.policy.transitive_includes_only {
                    candidates.retain(|c| closures.reaches(&file, c));
                    if candidates.is_empty() {
                        outcome.status = UseStatus::Ignored(IgnoreReason::OutsideTransitiveClosure);
                        outcomes.push(outcome);
                        continue;
                    }
                }
                let mut candidates = usable(analysis, &file, &present, candidates);
                if candidates.is_empty() {
                    outcome.status = UseStatus::Ignored(IgnoreReason::NoUsableProvider);
                    outcomes.push(outcome);
                    continue;
                }
                if ctx.policy.tolerate_transitive {
                    if let Some(via) = transitive_via(&mut closures, &file, &present, &candidates) {
                        candidates.insert(0, via);
                    }
                }
                full_symbols.insert(outcome.symbol.clone());
                needs.push(Need {
                    outcome: idx,
                    candidates,
                });
            }
        }
        outcomes.push(outcome);
    }

    // Full uses.
    let candidate_lists: Vec<Vec<IncludeName>> = needs.iter().map(|n| n.candidates.clone()).collect();
    let cover = choose_includes(
        &candidate_lists,
        CoverInput {
            referencing: &file,
            present: &present,
            associated_includes: ctx.associated_includes,
        },
    );
    let mut symbols_by_include: IndexMap<IncludeName, Vec<SymbolKey>> = IndexMap::new();
    for (need, assignment) in needs.iter().zip(&cover.assignments) {
        let outcome = &mut outcomes[need.outcome];
        outcome.status = match assignment {
            Some(Assignment::SelfFile) => UseStatus::SelfProvided,
            Some(Assignment::Associated(via)) => UseStatus::ViaAssociated(via.clone()),
            Some(Assignment::Include(include)) => {
                if !present.contains(include) && outcome.kind == UseKind::Full {
                    diagnostics.not_directly_included(&file, outcome.line, &outcome.symbol.name, include);
                }
                let symbols = symbols_by_include.entry(include.clone()).or_default();
                if !symbols.contains(&outcome.symbol) {
                    symbols.push(outcome.symbol.clone());
                }
                UseStatus::Included(include.clone())
            }
            None => UseStatus::Ignored(IgnoreReason::NoUsableProvider),
        };
    }

    // Present includes that survive regardless of uses.
    let protected: IndexSet<IncludeName> = present
        .iter()
        .filter(|included| is_protected(ctx, analysis, included))
        .cloned()
        .collect();
    let kept: IndexSet<IncludeName> = cover.desired.union(&protected).cloned().collect();

    // Forward-declarable uses.
    let mut forward_needed: IndexSet<SymbolKey> = IndexSet::new();
    for idx in forward {
        let outcome = &mut outcomes[idx];
        if full_symbols.contains(&outcome.symbol) {
            outcome.status = UseStatus::Ignored(IgnoreReason::CoveredByFullUse);
            continue;
        }
        if let Some(via) = visible_declaration(ctx, &mut closures, &file, &kept, &outcome.symbol) {
            outcome.status = UseStatus::Included(via);
            continue;
        }
        outcome.status = UseStatus::ForwardDeclared;
        forward_needed.insert(outcome.symbol.clone());
    }

    // Present lines.
    let mut add = Vec::new();
    let mut remove = Vec::new();
    let mut full = Vec::new();
    let mut seen: FxHashSet<&IncludeName> = FxHashSet::default();
    for directive in analysis.current_includes() {
        let line = OutputLine::include(directive.included.clone(), Some(directive.lines)).with_symbols(
            symbols_by_include
                .get(&directive.included)
                .cloned()
                .unwrap_or_default(),
        );
        if seen.insert(&directive.included) && kept.contains(&directive.included) {
            full.push(line);
        } else {
            trace!("[ENGINE] {}: remove {}", file, directive.included);
            remove.push(line);
        }
    }
    for include in &cover.desired {
        if !present.contains(include) {
            let line = OutputLine::include(include.clone(), None)
                .with_symbols(symbols_by_include.get(include).cloned().unwrap_or_default());
            trace!("[ENGINE] {}: add {}", file, include);
            full.push(line.clone());
            add.push(line);
        }
    }

    let mut declared: FxHashSet<SymbolKey> = FxHashSet::default();
    for &decl_id in analysis.current_forward_decls() {
        let decl = ctx.table.declaration(decl_id);
        let Some(symbol) = ctx.table.get(&decl.symbol) else {
            continue;
        };
        let line = OutputLine::forward_decl(symbol, Some(decl.lines));
        if forward_needed.contains(&decl.symbol) && declared.insert(decl.symbol.clone()) {
            full.push(line);
        } else {
            remove.push(line);
        }
    }
    for key in &forward_needed {
        if declared.contains(key) {
            continue;
        }
        if let Some(symbol) = ctx.table.get(key) {
            let line = OutputLine::forward_decl(symbol, None);
            trace!("[ENGINE] {}: add {}", file, line.text());
            full.push(line.clone());
            add.push(line);
        }
    }

    let sort = SortContext {
        pch: ctx.pch.cloned(),
        associated: ctx.associated.to_vec(),
        canonical: file.canonical(),
        quoted_includes_first: ctx.policy.quoted_includes_first,
    };
    sort.sort(&mut add);
    sort.sort(&mut full);
    remove.sort_by_key(|line| line.lines);

    analysis.transition(AnalysisState::Finalized)?;
    debug!(
        "[ENGINE] {}: {} to add, {} to remove",
        file,
        add.len(),
        remove.len()
    );
    Ok(FileReport {
        file,
        add,
        remove,
        full,
        uses: outcomes,
        diagnostics: diagnostics.into_diagnostics(),
    })
}

/// Candidates the file may actually include.
fn usable(
    analysis: &FileAnalysis,
    file: &IncludeName,
    present: &IndexSet<IncludeName>,
    candidates: Vec<IncludeName>,
) -> Vec<IncludeName> {
    candidates
        .into_iter()
        .filter(|c| {
            c == file
                || ((c.is_header() || present.contains(c))
                    && !analysis.pragmas().no_include.contains(c))
        })
        .collect()
}

fn forward_ignore_reason(
    ctx: &EngineContext<'_>,
    file: &IncludeName,
    resolved: &ResolvedUse,
) -> Option<IgnoreReason> {
    let symbol = ctx.table.get(&resolved.use_.symbol)?;
    let in_file: Vec<_> = ctx
        .table
        .candidates(symbol)
        .map(|(_, decl)| decl)
        .filter(|decl| decl.file() == file)
        .collect();
    let line = resolved.use_.line();
    if in_file
        .iter()
        .any(|decl| decl.is_definition && decl.lines.start <= line)
    {
        return Some(IgnoreReason::DefinedEarlierInFile);
    }
    if symbol.traits.enclosing_class.is_some() && in_file.is_empty() {
        return Some(IgnoreReason::NestedClass);
    }
    None
}

/// A full use between a forward declaration and the definition in the same
/// file only needs that declaration.
fn needs_local_forward_decl(ctx: &EngineContext<'_>, file: &IncludeName, resolved: &ResolvedUse) -> bool {
    let Some(symbol) = ctx.table.get(&resolved.use_.symbol) else {
        return false;
    };
    let line = resolved.use_.line();
    let (mut defined_later, mut declared_before) = (false, false);
    for (_, decl) in ctx.table.candidates(symbol) {
        if decl.file() != file {
            continue;
        }
        if decl.is_definition {
            if decl.lines.start <= line {
                return false;
            }
            defined_later = true;
        } else if decl.lines.start < line {
            declared_before = true;
        }
    }
    defined_later && declared_before
}

fn full_ignore_reason(
    ctx: &EngineContext<'_>,
    closures: &mut ClosureCache<'_>,
    file: &IncludeName,
    attributed: &IncludeName,
    resolved: &ResolvedUse,
) -> Option<IgnoreReason> {
    let symbol = ctx.table.get(&resolved.use_.symbol)?;
    if symbol.traits.is_builtin {
        return Some(IgnoreReason::Builtin);
    }
    let defined_here = ctx
        .table
        .candidates(symbol)
        .any(|(_, decl)| decl.is_definition && decl.file() == file);
    if attributed == file || defined_here {
        return Some(IgnoreReason::DefinedInFile);
    }
    if closures.reaches(attributed, file) {
        return Some(IgnoreReason::BackwardsInclude);
    }
    None
}

/// First present include whose transitive closure reaches a candidate.
fn transitive_via(
    closures: &mut ClosureCache<'_>,
    file: &IncludeName,
    present: &IndexSet<IncludeName>,
    candidates: &[IncludeName],
) -> Option<IncludeName> {
    if candidates.iter().any(|c| c == file || present.contains(c)) {
        return None;
    }
    present
        .iter()
        .find(|include| {
            let closure = closures.closure(include);
            candidates.iter().any(|c| closure.contains(c))
        })
        .cloned()
}

fn is_protected(ctx: &EngineContext<'_>, analysis: &FileAnalysis, included: &IncludeName) -> bool {
    let pragmas = analysis.pragmas();
    pragmas.keep.contains(included)
        || pragmas.exported.contains(included)
        || pragmas.associated.contains(included)
        || included.is_opaque_artifact()
        || ctx.associated.contains(included)
        || ctx.providers.is_always_keep(included)
        || ctx.keep_globs.matches(included)
        || ctx.pch == Some(included)
}

/// A kept include (or an associated header) through which a declaration of
/// `symbol` is already visible.
fn visible_declaration(
    ctx: &EngineContext<'_>,
    closures: &mut ClosureCache<'_>,
    file: &IncludeName,
    kept: &IndexSet<IncludeName>,
    symbol: &SymbolKey,
) -> Option<IncludeName> {
    let symbol = ctx.table.get(symbol)?;
    for (_, decl) in ctx.table.candidates(symbol) {
        let declaring = decl.file();
        if declaring == file {
            continue;
        }
        let public = ctx.providers.resolve_for(declaring, file).file;
        for via in [declaring, &public] {
            if kept.contains(via)
                || ctx.associated.contains(via)
                || ctx.associated_includes.contains(via)
            {
                return Some(via.clone());
            }
        }
        if ctx.policy.tolerate_transitive {
            if let Some(via) = kept
                .iter()
                .find(|k| closures.closure(k).contains(declaring))
            {
                return Some(via.clone());
            }
        }
    }
    None
}
