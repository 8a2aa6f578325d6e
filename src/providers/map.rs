//! The Provider Map: which public file provides what a private file declares.
//!
//! ## Resolution order
//!
//! For a private file, the first layer with a mapping wins:
//!
//! 1. exact user mapping
//! 2. glob/regex user mapping, in configuration order
//! 3. in-source `private, include "X"` pragma
//! 4. built-in tables (standard library, platform headers), then path
//!    conventions (`internal/`, `<asm-ARCH/...>`)
//! 5. identity
//!
//! Mappings are chased until a public file is reached. A hop back to a file
//! already visited stops the chase at the current file.
//!
//! Edges out of *public* files never redirect. They name alternative
//! providers (re-exports) and only matter when choosing among candidates.

use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{trace, warn};

use super::builtin::{self, BuiltinEntry};
use super::overlay::PragmaOverlay;
use super::pattern::{self, MatchKind, PathMatcher};
use crate::base::IncludeName;
use crate::hir::DiagnosticCollector;

// ============================================================================
// EDGES
// ============================================================================

/// Visibility of a file in the provider graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "mapping-files",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Visibility {
    Private,
    Public,
}

/// One configured mapping: files matching `from` are provided by `to`.
#[derive(Debug)]
pub struct ProviderEdge {
    pub from: Box<dyn PathMatcher>,
    pub to: IncludeName,
    /// Visibility of the files matched by `from`.
    pub visibility: Visibility,
    pub to_visibility: Visibility,
}

impl ProviderEdge {
    pub fn match_kind(&self) -> MatchKind {
        self.from.kind()
    }
}

/// Which layer produced the first hop of a resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolutionStep {
    UserExact,
    UserPattern,
    Pragma,
    Builtin,
    Convention,
    Identity,
}

/// Outcome of [`ProviderView::resolve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub file: IncludeName,
    pub step: ResolutionStep,
    /// False when the chase ended on a private file with no public target.
    pub is_public: bool,
}

#[derive(Clone, Debug)]
struct Target {
    to: IncludeName,
    to_visibility: Visibility,
}

// ============================================================================
// PROVIDER MAP
// ============================================================================

/// Read-only mapping structure shared by every translation unit.
#[derive(Debug, Default)]
pub struct ProviderMap {
    /// All user edges in configuration order.
    user_edges: Vec<ProviderEdge>,
    /// Exact user edges by source file.
    user_exact: IndexMap<IncludeName, Vec<usize>>,
    /// Glob/regex user edges, configuration order.
    user_patterns: Vec<usize>,
    builtin: IndexMap<IncludeName, Vec<Target>>,
    /// Visibility declared by user configuration for exact files.
    user_visibility: FxHashMap<IncludeName, Visibility>,
    /// Visibility implied by the built-in tables.
    builtin_visibility: FxHashMap<IncludeName, Visibility>,
    /// Files that are public no matter what a mapping says.
    always_public: IndexSet<IncludeName>,
    symbols: IndexMap<SmolStr, Vec<IncludeName>>,
}

impl ProviderMap {
    /// An empty map without built-in tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// A map pre-loaded with the built-in tables.
    pub fn with_builtins() -> Self {
        ProviderMapBuilder::new().with_builtins().build()
    }

    pub fn builder() -> ProviderMapBuilder {
        ProviderMapBuilder::new()
    }

    /// Resolve with no in-source facts.
    pub fn resolve(&self, file: &IncludeName) -> Resolved {
        self.view(empty_overlay()).resolve(file)
    }

    /// Combine with the facts of one translation unit.
    pub fn view<'a>(&'a self, overlay: &'a PragmaOverlay) -> ProviderView<'a> {
        ProviderView { map: self, overlay }
    }

    pub fn edges(&self) -> &[ProviderEdge] {
        &self.user_edges
    }

    /// Public headers mapped to a symbol name.
    pub fn symbol_providers(&self, symbol: &str) -> &[IncludeName] {
        self.symbols
            .get(symbol)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn user_exact_targets(&self, file: &IncludeName) -> Vec<Target> {
        self.user_exact
            .get(file)
            .into_iter()
            .flatten()
            .map(|&idx| self.target_of(idx))
            .collect()
    }

    fn user_pattern_targets(&self, file: &IncludeName) -> Vec<Target> {
        self.user_patterns
            .iter()
            .filter(|&&idx| self.user_edges[idx].from.is_match(file))
            .map(|&idx| self.target_of(idx))
            .collect()
    }

    fn builtin_targets(&self, file: &IncludeName) -> &[Target] {
        self.builtin.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    fn target_of(&self, idx: usize) -> Target {
        let edge = &self.user_edges[idx];
        Target {
            to: edge.to.clone(),
            to_visibility: edge.to_visibility,
        }
    }
}

fn empty_overlay() -> &'static PragmaOverlay {
    static EMPTY: OnceLock<PragmaOverlay> = OnceLock::new();
    EMPTY.get_or_init(PragmaOverlay::default)
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builds a [`ProviderMap`]. Bad patterns are reported and skipped.
#[derive(Debug, Default)]
pub struct ProviderMapBuilder {
    map: ProviderMap,
    diagnostics: DiagnosticCollector,
}

impl ProviderMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the standard library and platform tables.
    pub fn with_builtins(mut self) -> Self {
        for header in builtin::STDLIB_CPP_PUBLIC_HEADERS {
            self.map.always_public.insert(IncludeName::new(header));
        }
        for table in builtin::include_tables() {
            for row in table {
                self.add_builtin(row);
            }
        }
        for row in builtin::SYMBOL_MAP {
            self.add_symbol(row.from, IncludeName::new(row.to));
        }
        self
    }

    fn add_builtin(&mut self, row: &BuiltinEntry) {
        let from = IncludeName::new(row.from);
        let to = IncludeName::new(row.to);
        self.map
            .builtin_visibility
            .entry(from.clone())
            .or_insert(row.from_visibility);
        self.map
            .builtin_visibility
            .entry(to.clone())
            .or_insert(row.to_visibility);
        self.map.builtin.entry(from).or_default().push(Target {
            to,
            to_visibility: row.to_visibility,
        });
    }

    /// Add one user mapping. A pattern that does not compile is reported as
    /// a warning and the entry is dropped.
    pub fn add_mapping(
        &mut self,
        kind: MatchKind,
        from: &str,
        visibility: Visibility,
        to: IncludeName,
        to_visibility: Visibility,
    ) -> &mut Self {
        let matcher = match pattern::compile(kind, from) {
            Ok(matcher) => matcher,
            Err(err) => {
                warn!("[PROVIDERS] Dropping mapping {} -> {}: {}", from, to, err);
                self.diagnostics.unresolvable_pattern(from, &err.reason);
                return self;
            }
        };

        let idx = self.map.user_edges.len();
        match matcher.exact() {
            Some(file) => {
                self.map.user_visibility.insert(file.clone(), visibility);
                self.map.user_exact.entry(file.clone()).or_default().push(idx);
            }
            None => self.map.user_patterns.push(idx),
        }
        self.map
            .user_visibility
            .entry(to.clone())
            .or_insert(to_visibility);
        self.map.user_edges.push(ProviderEdge {
            from: matcher,
            to,
            visibility,
            to_visibility,
        });
        self
    }

    /// Add a mapping written in mapping-file syntax: `@regex`, glob or exact.
    pub fn add_mapping_text(
        &mut self,
        from: &str,
        visibility: Visibility,
        to: &str,
        to_visibility: Visibility,
    ) -> &mut Self {
        let (kind, pattern) = MatchKind::detect(from);
        self.add_mapping(kind, pattern, visibility, IncludeName::new(to), to_visibility)
    }

    /// Declare a file's visibility without mapping it anywhere.
    pub fn mark_visibility(&mut self, file: IncludeName, visibility: Visibility) -> &mut Self {
        self.map.user_visibility.insert(file, visibility);
        self
    }

    /// Map a symbol name to a public header.
    pub fn add_symbol(&mut self, symbol: &str, to: IncludeName) -> &mut Self {
        let providers = self.map.symbols.entry(SmolStr::new(symbol)).or_default();
        if !providers.contains(&to) {
            providers.push(to);
        }
        self
    }

    /// Warnings gathered so far.
    pub fn diagnostics(&self) -> &DiagnosticCollector {
        &self.diagnostics
    }

    pub fn build(self) -> ProviderMap {
        self.map
    }

    /// Build and hand back the warnings gathered while building.
    pub fn build_with_diagnostics(self) -> (ProviderMap, DiagnosticCollector) {
        (self.map, self.diagnostics)
    }
}

// ============================================================================
// VIEW
// ============================================================================

/// A [`ProviderMap`] combined with one translation unit's in-source facts.
#[derive(Clone, Copy, Debug)]
pub struct ProviderView<'a> {
    map: &'a ProviderMap,
    overlay: &'a PragmaOverlay,
}

impl<'a> ProviderView<'a> {
    pub fn map(&self) -> &'a ProviderMap {
        self.map
    }

    pub fn overlay(&self) -> &'a PragmaOverlay {
        self.overlay
    }

    /// True if the file must not be included directly. Checked in the same
    /// layer order as resolution.
    pub fn is_private(&self, file: &IncludeName) -> bool {
        if self.map.always_public.contains(file) {
            return false;
        }
        if let Some(&vis) = self.map.user_visibility.get(file) {
            return vis == Visibility::Private;
        }
        if let Some(vis) = self.map.user_pattern_visibility(file) {
            return vis == Visibility::Private;
        }
        if self.overlay.private_pragma(file).is_some()
            || self.overlay.is_heuristically_private(file)
        {
            return true;
        }
        self.map.builtin_visibility.get(file) == Some(&Visibility::Private)
    }

    /// The first-hop targets of `file`, from the first layer that maps it.
    fn first_layer(&self, file: &IncludeName) -> Option<(ResolutionStep, Vec<Target>)> {
        let exact = self.map.user_exact_targets(file);
        if !exact.is_empty() {
            return Some((ResolutionStep::UserExact, exact));
        }
        let patterns = self.map.user_pattern_targets(file);
        if !patterns.is_empty() {
            return Some((ResolutionStep::UserPattern, patterns));
        }
        if let Some(Some(public)) = self.overlay.private_pragma(file) {
            let target = Target {
                to: public.clone(),
                to_visibility: Visibility::Public,
            };
            return Some((ResolutionStep::Pragma, vec![target]));
        }
        let builtin = self.map.builtin_targets(file);
        if !builtin.is_empty() {
            return Some((ResolutionStep::Builtin, builtin.to_vec()));
        }
        let convention = self.overlay.heuristic_targets(file);
        if !convention.is_empty() {
            let targets = convention
                .iter()
                .map(|to| Target {
                    to: to.clone(),
                    to_visibility: Visibility::Public,
                })
                .collect();
            return Some((ResolutionStep::Convention, targets));
        }
        None
    }

    /// All targets of `file` over every layer, in layer order.
    fn all_targets(&self, file: &IncludeName) -> Vec<IncludeName> {
        let mut targets: Vec<IncludeName> = Vec::new();
        let mut push = |to: &IncludeName| {
            if !targets.contains(to) {
                targets.push(to.clone());
            }
        };
        for target in self.map.user_exact_targets(file) {
            push(&target.to);
        }
        for target in self.map.user_pattern_targets(file) {
            push(&target.to);
        }
        if let Some(Some(public)) = self.overlay.private_pragma(file) {
            push(public);
        }
        for target in self.map.builtin_targets(file) {
            push(&target.to);
        }
        for to in self.overlay.heuristic_targets(file) {
            push(to);
        }
        targets
    }

    /// Map `file` to the public file an includer should use.
    pub fn resolve(&self, file: &IncludeName) -> Resolved {
        let mut visited = vec![file.clone()];
        let mut current = file.clone();
        let mut first_step = ResolutionStep::Identity;

        while self.is_private(&current) {
            let Some((step, targets)) = self.first_layer(&current) else {
                trace!("[PROVIDERS] {} is private with no public mapping", current);
                return Resolved {
                    file: current,
                    step: first_step,
                    is_public: false,
                };
            };
            if first_step == ResolutionStep::Identity {
                first_step = step;
            }
            // Prefer a public target, then the first one listed.
            let next = targets
                .iter()
                .find(|t| t.to_visibility == Visibility::Public && !self.is_private(&t.to))
                .or_else(|| targets.first())
                .map(|t| t.to.clone());
            let Some(next) = next else { break };
            if visited.contains(&next) {
                trace!(
                    "[PROVIDERS] Mapping {} -> {} loops back, stopping",
                    current, next
                );
                break;
            }
            trace!("[PROVIDERS] {} -> {} ({:?})", current, next, step);
            visited.push(next.clone());
            current = next;
        }

        let is_public = !self.is_private(&current);
        Resolved {
            file: current,
            step: first_step,
            is_public,
        }
    }

    /// Resolve from the point of view of `includer`: friends may use the
    /// private file directly.
    pub fn resolve_for(&self, file: &IncludeName, includer: &IncludeName) -> Resolved {
        if self.overlay.is_friend(includer, file) {
            return Resolved {
                file: file.clone(),
                step: ResolutionStep::Identity,
                is_public: true,
            };
        }
        self.resolve(file)
    }

    /// Every public file that may be included to get what `file` declares,
    /// best first: the resolved file, the rest of the mapping closure, then
    /// files that re-export it. Never empty.
    pub fn public_candidates(&self, file: &IncludeName, includer: &IncludeName) -> Vec<IncludeName> {
        let resolved = self.resolve_for(file, includer);
        let mut candidates = vec![resolved.file.clone()];

        // Breadth-first over the mapping closure, guarded against cycles.
        let mut queue = vec![file.clone()];
        let mut seen: IndexSet<IncludeName> = IndexSet::new();
        seen.insert(file.clone());
        let mut idx = 0;
        while idx < queue.len() {
            let current = queue[idx].clone();
            idx += 1;
            let usable =
                !self.is_private(&current) || self.overlay.is_friend(includer, &current);
            if current != *file && usable && !candidates.contains(&current) {
                candidates.push(current.clone());
            }
            for next in self.all_targets(&current) {
                if seen.insert(next.clone()) {
                    queue.push(next);
                }
            }
            for exporter in self.overlay.exporters_of(&current) {
                if seen.insert(exporter.clone()) {
                    queue.push(exporter.clone());
                }
            }
        }

        // Drop an unresolved private original unless nothing else is available.
        if candidates.len() > 1
            && self.is_private(&candidates[0])
            && !self.overlay.is_friend(includer, &candidates[0])
        {
            candidates.remove(0);
        }
        candidates
    }

    /// Public headers providing a symbol with no reachable declaration.
    pub fn symbol_providers(&self, symbol: &str) -> &'a [IncludeName] {
        self.map.symbol_providers(symbol)
    }

    /// True if every includer must keep `file`.
    pub fn is_always_keep(&self, file: &IncludeName) -> bool {
        self.overlay.is_always_keep(file)
    }
}

impl ProviderMap {
    fn user_pattern_visibility(&self, file: &IncludeName) -> Option<Visibility> {
        self.user_patterns
            .iter()
            .map(|&idx| &self.user_edges[idx])
            .find(|edge| edge.from.is_match(file))
            .map(|edge| edge.visibility)
    }
}
