//! Fluent builder for translation units.
//!
//! ```ignore
//! let report = UnitBuilder::new("f.cc")
//!     .include("f.cc", "foo.h")
//!     .define("Foo", "foo.h")
//!     .full_use("Foo", "f.cc", 10)
//!     .analyze();
//! ```

use incwise::analysis::HintOracle;
use incwise::base::{IncludeName, Location, SourceLoc};
use incwise::config::AnalysisPolicy;
use incwise::hir::{
    Declaration, FilePragma, IncludeDirective, IncludePragma, PragmaEvent, SymbolKey, SymbolTraits,
    Use, UseHints,
};
use incwise::providers::ProviderMap;
use incwise::session::{FrontEndEvent, SessionReport, TranslationUnit};
use incwise::AnalysisResult;

/// `"path"`
pub fn q(path: &str) -> IncludeName {
    IncludeName::quoted(path)
}

/// `<path>`
pub fn a(path: &str) -> IncludeName {
    IncludeName::angled(path)
}

/// Accepts `foo.h` (quoted), `"foo.h"` or `<foo.h>`.
pub fn file(name: &str) -> IncludeName {
    if name.starts_with('"') || name.starts_with('<') {
        IncludeName::new(name)
    } else {
        q(name)
    }
}

pub fn at(name: &str, line: u32) -> Location {
    Location::plain(SourceLoc::new(file(name), line, 1))
}

pub fn pointer_hints() -> UseHints {
    UseHints {
        pointer_or_reference: true,
        ..UseHints::default()
    }
}

pub fn member_access_hints() -> UseHints {
    UseHints {
        member_access: true,
        ..UseHints::default()
    }
}

pub struct UnitBuilder {
    unit: TranslationUnit,
    providers: ProviderMap,
    policy: AnalysisPolicy,
}

impl UnitBuilder {
    pub fn new(main: &str) -> Self {
        Self {
            unit: TranslationUnit::new(file(main)),
            providers: ProviderMap::new(),
            policy: AnalysisPolicy::default(),
        }
    }

    pub fn providers(mut self, providers: ProviderMap) -> Self {
        self.providers = providers;
        self
    }

    pub fn policy(mut self, policy: AnalysisPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn push(mut self, event: FrontEndEvent) -> Self {
        self.unit.push(event);
        self
    }

    fn next_include_line(&self, includer: &IncludeName) -> u32 {
        let written = self
            .unit
            .events
            .iter()
            .filter(|e| matches!(e, FrontEndEvent::Include(d) if &d.includer == includer))
            .count();
        written as u32 + 1
    }

    // ------------------------------------------------------------------------
    // Includes
    // ------------------------------------------------------------------------

    /// `from` includes `to`, on the next free line of `from`.
    pub fn include(self, from: &str, to: &str) -> Self {
        let includer = file(from);
        let line = self.next_include_line(&includer);
        self.push(FrontEndEvent::Include(IncludeDirective::new(
            includer,
            file(to),
            line,
        )))
    }

    pub fn include_with(self, from: &str, to: &str, pragma: IncludePragma) -> Self {
        let includer = file(from);
        let line = self.next_include_line(&includer);
        self.push(FrontEndEvent::Include(
            IncludeDirective::new(includer, file(to), line).with_pragma(pragma),
        ))
    }

    pub fn enter(self, name: &str) -> Self {
        self.push(FrontEndEvent::Enter(file(name)))
    }

    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------

    pub fn declaration(self, declaration: Declaration) -> Self {
        self.push(FrontEndEvent::Declaration(declaration))
    }

    /// Class `name` defined in `in_file`.
    pub fn define(self, name: &str, in_file: &str) -> Self {
        self.define_at(name, in_file, 1)
    }

    pub fn define_at(self, name: &str, in_file: &str, line: u32) -> Self {
        self.declaration(Declaration::new(SymbolKey::class(name), at(in_file, line)).definition())
    }

    /// Hand-written `class name;` in `in_file` at `line`.
    pub fn forward_declare(self, name: &str, in_file: &str, line: u32) -> Self {
        self.declaration(Declaration::new(SymbolKey::class(name), at(in_file, line)))
    }

    pub fn traits(self, key: SymbolKey, traits: SymbolTraits) -> Self {
        self.push(FrontEndEvent::Traits(key, traits))
    }

    pub fn pragma(self, in_file: &str, line: u32, pragma: FilePragma) -> Self {
        self.push(FrontEndEvent::Pragma(PragmaEvent {
            file: file(in_file),
            line,
            pragma,
        }))
    }

    // ------------------------------------------------------------------------
    // Uses
    // ------------------------------------------------------------------------

    pub fn use_(self, use_: Use) -> Self {
        self.push(FrontEndEvent::Use(use_))
    }

    /// A member access on class `name`: needs the full type.
    pub fn full_use(self, name: &str, in_file: &str, line: u32) -> Self {
        self.use_(Use::at(SymbolKey::class(name), file(in_file), line).with_hints(member_access_hints()))
    }

    /// A pointer to class `name`: forward-declarable.
    pub fn pointer_use(self, name: &str, in_file: &str, line: u32) -> Self {
        self.use_(Use::at(SymbolKey::class(name), file(in_file), line).with_hints(pointer_hints()))
    }

    // ------------------------------------------------------------------------
    // Running
    // ------------------------------------------------------------------------

    pub fn build(self) -> TranslationUnit {
        self.unit
    }

    pub fn try_analyze(&self) -> AnalysisResult<SessionReport> {
        self.unit.analyze(&self.providers, &self.policy, &HintOracle)
    }

    pub fn analyze(&self) -> SessionReport {
        match self.try_analyze() {
            Ok(report) => report,
            Err(err) => panic!("analysis of {} failed: {err}", self.unit.main_file),
        }
    }
}
