//! Per-translation-unit provider facts learned from the source itself.
//!
//! The shared [`ProviderMap`](super::ProviderMap) is read-only after
//! construction. Everything a translation unit teaches us while it is being
//! traversed (pragmas, export regions, `internal/` conventions) lands here
//! and is consulted through a [`ProviderView`](super::ProviderView).

use indexmap::{IndexMap, IndexSet};

use super::pattern::{PathMatcher, PatternError, RegexMatcher};
use crate::base::IncludeName;

/// Provider facts scoped to one analysis session.
#[derive(Clone, Debug, Default)]
pub struct PragmaOverlay {
    /// `private[, include "X"]` pragmas.
    private: IndexMap<IncludeName, Option<IncludeName>>,
    /// Mappings implied by path conventions: private file -> public targets.
    heuristic: IndexMap<IncludeName, Vec<IncludeName>>,
    /// Files allowed to include a private header directly.
    friends: IndexMap<IncludeName, Vec<RegexMatcher>>,
    /// Re-exported file -> files re-exporting it, in discovery order.
    exporters: IndexMap<IncludeName, Vec<IncludeName>>,
    always_keep: IndexSet<IncludeName>,
}

impl PragmaOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a `private` pragma on `file`, optionally naming its public header.
    pub fn mark_private(&mut self, file: IncludeName, public: Option<IncludeName>) {
        let entry = self.private.entry(file).or_insert(None);
        if public.is_some() {
            *entry = public;
        }
    }

    /// Record a `friend` pragma on the private header `file`.
    pub fn add_friend(&mut self, file: IncludeName, pattern: &str) -> Result<(), PatternError> {
        let matcher = RegexMatcher::new(pattern)?;
        self.friends.entry(file).or_default().push(matcher);
        Ok(())
    }

    /// `exporter` re-exports everything `exported` provides.
    pub fn add_export(&mut self, exported: IncludeName, exporter: IncludeName) {
        if exported == exporter {
            return;
        }
        let exporters = self.exporters.entry(exported).or_default();
        if !exporters.contains(&exporter) {
            exporters.push(exporter);
        }
    }

    pub fn mark_always_keep(&mut self, file: IncludeName) {
        self.always_keep.insert(file);
    }

    /// Apply path conventions to a freshly seen include:
    /// - `.../internal/x.h` is private, provided by its includer, and every
    ///   file next to the `internal/` directory may include it
    /// - `<asm-ARCH/x.h>` is private and provided by `<asm/x.h>`
    pub fn observe_include(&mut self, includer: &IncludeName, included: &IncludeName) {
        let quoted = included.as_str();
        if let Some(pos) = quoted.find("internal/") {
            let at_component_start = pos == 1 || quoted.as_bytes()[pos - 1] == b'/';
            if at_component_start && includer != included {
                self.push_heuristic(included.clone(), includer.clone());
                let friend = format!("{}.*", regex::escape(&quoted[..pos]));
                if let Ok(matcher) = RegexMatcher::new(&friend) {
                    let friends = self.friends.entry(included.clone()).or_default();
                    if !friends.iter().any(|f| f.source() == matcher.source()) {
                        friends.push(matcher);
                    }
                }
            }
        }

        if included.is_angled() && included.path().starts_with("asm-") {
            if let Some((_, rest)) = included.path().split_once('/') {
                self.push_heuristic(included.clone(), IncludeName::angled(&format!("asm/{rest}")));
            }
        }
    }

    fn push_heuristic(&mut self, from: IncludeName, to: IncludeName) {
        let targets = self.heuristic.entry(from).or_default();
        if !targets.contains(&to) {
            targets.push(to);
        }
    }

    /// Some(target) if `file` carries a `private` pragma; the inner option is
    /// the named public header.
    pub fn private_pragma(&self, file: &IncludeName) -> Option<Option<&IncludeName>> {
        self.private.get(file).map(Option::as_ref)
    }

    pub fn heuristic_targets(&self, file: &IncludeName) -> &[IncludeName] {
        self.heuristic.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_heuristically_private(&self, file: &IncludeName) -> bool {
        self.heuristic.contains_key(file)
    }

    /// True if `includer` may include the private `file` directly.
    pub fn is_friend(&self, includer: &IncludeName, file: &IncludeName) -> bool {
        self.friends
            .get(file)
            .is_some_and(|friends| friends.iter().any(|f| f.is_match_str(includer.as_str())))
    }

    pub fn exporters_of(&self, file: &IncludeName) -> &[IncludeName] {
        self.exporters.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_always_keep(&self, file: &IncludeName) -> bool {
        self.always_keep.contains(file)
    }
}
