//! Symbol Attributor: one declaring location per use.
//!
//! ## Precedence
//!
//! Candidates are the symbol's declarations reachable from the referencing
//! file (all of them when none is reachable). A use naming a specialization
//! only looks at declarations of that exact specialization when any exist.
//! Then, first match wins:
//!
//! 1. an explicit instantiation declaration (`extern template`) when an
//!    explicit instantiation definition exists for the same specialization
//! 2. a declaration whose file takes responsibility for the specialization
//! 3. the nearest definition, by include distance
//! 4. the nearest declaration
//!
//! Ties go to the declaration discovered first. Macro-produced declarations
//! are attributed to the expansion file unless the macro carries a
//! forward-declare hint, in which case the spelling file wins.
//!
//! Results are cached per (symbol, specialization, referencing file,
//! instantiation flag, candidate count). The candidate count keys the cache
//! on the state of an append-only set, so a warm cache never answers for a
//! stale candidate list.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::trace;

use super::include_graph::Reachability;
use crate::base::IncludeName;
use crate::error::{AnalysisError, AnalysisResult};
use crate::hir::{DeclId, Declaration, InstantiationKind, SymbolId, SymbolTable, Use};

/// Which precedence rule selected the attribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributionRule {
    /// Exercised using-declaration under the using-is-a-use policy.
    UsingDeclaration,
    InstantiationDeclaration,
    IntendsToProvide,
    NearestDefinition,
    NearestDeclaration,
}

/// The file a use is attributed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribution {
    /// `None` for alias attributions.
    pub decl: Option<DeclId>,
    pub file: IncludeName,
    pub rule: AttributionRule,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    symbol: SymbolId,
    specialization: Option<SmolStr>,
    referencing_file: IncludeName,
    explicit_instantiation: bool,
    candidates: usize,
}

#[derive(Clone, Copy)]
struct Candidate<'a> {
    id: DeclId,
    decl: &'a Declaration,
    distance: usize,
}

impl Candidate<'_> {
    fn rank(&self) -> (usize, DeclId) {
        (self.distance, self.id)
    }
}

/// Attribution with its template-instantiation cache. One per session.
#[derive(Debug, Default)]
pub struct Attributor {
    cache: FxHashMap<CacheKey, Attribution>,
    /// Explicit instantiation definition selected per (symbol, specialization).
    instantiations: FxHashMap<(SymbolId, SmolStr), DeclId>,
    cache_hits: usize,
}

impl Attributor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits
    }

    /// Pick the declaration `use_` is attributed to. `Ok(None)` means the
    /// symbol has no declaration at all.
    pub fn attribute(
        &mut self,
        table: &SymbolTable,
        reach: &dyn Reachability,
        use_: &Use,
        using_is_a_use: bool,
    ) -> AnalysisResult<Option<Attribution>> {
        if let Some(alias) = &use_.alias {
            if using_is_a_use && alias.is_using_declaration {
                trace!(
                    "[ATTRIBUTE] {} in {} -> {} (using-declaration)",
                    use_.symbol, use_.referencing_file, alias.file
                );
                return Ok(Some(Attribution {
                    decl: None,
                    file: alias.file.clone(),
                    rule: AttributionRule::UsingDeclaration,
                }));
            }
        }

        let Some(symbol_id) = table.lookup(&use_.symbol) else {
            return Ok(None);
        };
        let symbol = table.symbol(symbol_id);
        if symbol.declarations.is_empty() {
            return Ok(None);
        }

        let key = CacheKey {
            symbol: symbol_id,
            specialization: use_.specialization.clone(),
            referencing_file: use_.referencing_file.clone(),
            explicit_instantiation: use_.hints.explicit_instantiation,
            candidates: symbol.declarations.len(),
        };
        if let Some(cached) = self.cache.get(&key) {
            self.cache_hits += 1;
            return Ok(Some(cached.clone()));
        }

        let candidates = narrow(table, reach, use_, symbol_id);
        let Some((chosen, rule)) = select(&candidates) else {
            return Ok(None);
        };

        if chosen.decl.explicit_instantiation == Some(InstantiationKind::Definition) {
            self.register_instantiation(table, symbol_id, chosen.id)?;
        }
        // Every reachable instantiation definition claims the specialization.
        let mut definitions: Vec<&Candidate<'_>> = candidates
            .iter()
            .filter(|c| {
                c.distance != usize::MAX
                    && c.decl.explicit_instantiation == Some(InstantiationKind::Definition)
            })
            .collect();
        definitions.sort_by_key(|c| c.rank());
        for definition in definitions {
            self.register_instantiation(table, symbol_id, definition.id)?;
        }

        let file = if chosen.decl.macro_forward_declare_hint {
            chosen.decl.location.spelling.file.clone()
        } else {
            chosen.decl.file().clone()
        };
        trace!(
            "[ATTRIBUTE] {} in {} -> {} ({:?})",
            use_.symbol, use_.referencing_file, file, rule
        );
        let attribution = Attribution {
            decl: Some(chosen.id),
            file,
            rule,
        };
        self.cache.insert(key, attribution.clone());
        Ok(Some(attribution))
    }

    fn register_instantiation(
        &mut self,
        table: &SymbolTable,
        symbol: SymbolId,
        decl: DeclId,
    ) -> AnalysisResult<()> {
        let declaration = table.declaration(decl);
        let specialization = declaration.specialization.clone().unwrap_or_default();
        let entry = self
            .instantiations
            .entry((symbol, specialization.clone()))
            .or_insert(decl);
        if *entry == decl {
            return Ok(());
        }
        let first = table.declaration(*entry);
        if first.file() == declaration.file() {
            return Ok(());
        }
        Err(AnalysisError::DoubleExplicitInstantiation {
            symbol: declaration.symbol.name.clone(),
            specialization,
            first: first.file().clone(),
            second: declaration.file().clone(),
        })
    }
}

/// Reachable candidates, restricted to the exact specialization when the
/// use names one that has declarations.
fn narrow<'a>(
    table: &'a SymbolTable,
    reach: &dyn Reachability,
    use_: &Use,
    symbol: SymbolId,
) -> Vec<Candidate<'a>> {
    let all: Vec<Candidate<'a>> = table
        .candidates(table.symbol(symbol))
        .map(|(id, decl)| Candidate {
            id,
            decl,
            distance: reach
                .distance(&use_.referencing_file, decl.file())
                .unwrap_or(usize::MAX),
        })
        .collect();

    let specialized: Vec<Candidate<'a>> = match &use_.specialization {
        Some(args) => {
            let exact: Vec<_> = all
                .iter()
                .filter(|c| c.decl.specialization.as_ref() == Some(args))
                .copied()
                .collect();
            if exact.is_empty() {
                all.iter()
                    .filter(|c| c.decl.specialization.is_none())
                    .copied()
                    .collect()
            } else {
                exact
            }
        }
        None => all.iter().filter(|c| c.decl.specialization.is_none()).copied().collect(),
    };
    let specialized = if specialized.is_empty() { all } else { specialized };

    let reachable: Vec<_> = specialized
        .iter()
        .filter(|c| c.distance != usize::MAX)
        .copied()
        .collect();
    if reachable.is_empty() {
        specialized
    } else {
        reachable
    }
}

fn select<'a>(candidates: &[Candidate<'a>]) -> Option<(Candidate<'a>, AttributionRule)> {
    let nearest = |pred: &dyn Fn(&Candidate<'a>) -> bool| {
        candidates
            .iter()
            .filter(|c| pred(*c))
            .min_by_key(|c| c.rank())
            .copied()
    };

    let has_instantiation_definition = candidates
        .iter()
        .any(|c| c.decl.explicit_instantiation == Some(InstantiationKind::Definition));
    if has_instantiation_definition {
        if let Some(c) =
            nearest(&|c| c.decl.explicit_instantiation == Some(InstantiationKind::Declaration))
        {
            return Some((c, AttributionRule::InstantiationDeclaration));
        }
    }
    if let Some(c) = nearest(&|c| c.decl.intends_to_provide) {
        return Some((c, AttributionRule::IntendsToProvide));
    }
    if let Some(c) = nearest(&|c| c.decl.is_definition) {
        return Some((c, AttributionRule::NearestDefinition));
    }
    nearest(&|_| true).map(|c| (c, AttributionRule::NearestDeclaration))
}
