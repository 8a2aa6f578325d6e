//! Output lines: `#include`s and forward declarations with their sort keys.

use std::cmp::Ordering;
use std::fmt;

use crate::base::{IncludeName, LineRange};
use crate::hir::{Symbol, SymbolKey, SymbolKind};

/// What a line says.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LineKind {
    Include(IncludeName),
    ForwardDecl { symbol: SymbolKey, text: String },
}

/// One include or forward-declare line, present in the file or proposed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: LineKind,
    /// Where the line is written today; `None` for additions.
    pub lines: Option<LineRange>,
    /// Symbols this line satisfies, for renderers.
    pub symbols: Vec<SymbolKey>,
}

impl OutputLine {
    pub fn include(file: IncludeName, lines: Option<LineRange>) -> Self {
        Self {
            kind: LineKind::Include(file),
            lines,
            symbols: Vec::new(),
        }
    }

    pub fn forward_decl(symbol: &Symbol, lines: Option<LineRange>) -> Self {
        Self {
            kind: LineKind::ForwardDecl {
                symbol: symbol.key.clone(),
                text: forward_decl_text(symbol),
            },
            lines,
            symbols: vec![symbol.key.clone()],
        }
    }

    pub fn with_symbols(mut self, symbols: Vec<SymbolKey>) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn included(&self) -> Option<&IncludeName> {
        match &self.kind {
            LineKind::Include(file) => Some(file),
            LineKind::ForwardDecl { .. } => None,
        }
    }

    pub fn is_forward_decl(&self) -> bool {
        matches!(self.kind, LineKind::ForwardDecl { .. })
    }

    /// The line as it would be written.
    pub fn text(&self) -> String {
        match &self.kind {
            LineKind::Include(file) => file.include_line(),
            LineKind::ForwardDecl { text, .. } => text.clone(),
        }
    }
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())?;
        if let Some(lines) = &self.lines {
            write!(f, "  // lines {lines}")?;
        }
        Ok(())
    }
}

/// `namespace a { namespace b { template <typename T> class S; } }`
pub fn forward_decl_text(symbol: &Symbol) -> String {
    let mut decl = String::new();
    if let Some(header) = &symbol.traits.template_header {
        decl.push_str(header);
        decl.push(' ');
    } else if symbol.key.kind == SymbolKind::ClassTemplate {
        decl.push_str("template <typename> ");
    }
    decl.push_str(symbol.traits.tag.keyword());
    decl.push(' ');
    decl.push_str(symbol.key.unqualified_name());
    decl.push(';');

    symbol.key.scopes().iter().rev().fold(decl, |inner, ns| {
        format!("namespace {ns} {{ {inner} }}")
    })
}

// ============================================================================
// SORTING
// ============================================================================

/// Context needed to order lines within one file.
#[derive(Clone, Debug, Default)]
pub struct SortContext {
    pub pch: Option<IncludeName>,
    pub associated: Vec<IncludeName>,
    /// Canonical name of the file being reported, for `-inl` pairing.
    pub canonical: String,
    pub quoted_includes_first: bool,
}

impl SortContext {
    /// Group ordinal: lower groups are written first.
    pub fn ordinal(&self, line: &OutputLine) -> u8 {
        let file = match &line.kind {
            LineKind::ForwardDecl { .. } => return 7,
            LineKind::Include(file) => file,
        };
        if self.pch.as_ref() == Some(file) {
            0
        } else if self.associated.contains(file) {
            1
        } else if file.is_inline_definitions() && file.canonical() == self.canonical {
            2
        } else if self.quoted_includes_first && !file.is_angled() {
            3
        } else if file.is_angled() && file.path().ends_with(".h") {
            4
        } else if file.is_angled() {
            5
        } else {
            6
        }
    }

    pub fn compare(&self, a: &OutputLine, b: &OutputLine) -> Ordering {
        self.ordinal(a)
            .cmp(&self.ordinal(b))
            .then_with(|| a.text().cmp(&b.text()))
    }

    pub fn sort(&self, lines: &mut [OutputLine]) {
        lines.sort_by(|a, b| self.compare(a, b));
    }
}
