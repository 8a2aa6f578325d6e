//! Symbols and their declaring occurrences.
//!
//! - [`SymbolKey`] - qualified name + kind, the identity shared by all uses
//! - [`Symbol`] - ordered candidate declarations plus facts about the entity
//! - [`Declaration`] - one concrete declaring occurrence
//! - [`SymbolTable`] - arena of symbols and declarations with a lookup table
//!   keyed by symbol identity
//!
//! The candidate set of a symbol only grows: declarations are appended in
//! discovery order and never removed, so a [`DeclId`] stays valid for the
//! whole session and lower ids always mean "seen earlier".

use std::fmt;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::{IncludeName, LineRange, Location};

// ============================================================================
// SYMBOL IDENTITY
// ============================================================================

/// Kind of named entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    /// class, struct or union
    Class,
    ClassTemplate,
    Enum,
    /// typedef or alias declaration
    Typedef,
    Function,
    FunctionTemplate,
    Variable,
    Macro,
}

impl SymbolKind {
    /// Only records and class templates can be forward-declared.
    pub fn is_forward_declarable(self) -> bool {
        matches!(self, SymbolKind::Class | SymbolKind::ClassTemplate)
    }

    pub fn is_template(self) -> bool {
        matches!(self, SymbolKind::ClassTemplate | SymbolKind::FunctionTemplate)
    }

    pub fn display(self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::ClassTemplate => "class template",
            SymbolKind::Enum => "enum",
            SymbolKind::Typedef => "typedef",
            SymbolKind::Function => "function",
            SymbolKind::FunctionTemplate => "function template",
            SymbolKind::Variable => "variable",
            SymbolKind::Macro => "macro",
        }
    }
}

/// Qualified name + kind. Two uses of the same key share one [`Symbol`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolKey {
    pub name: SmolStr,
    pub kind: SymbolKind,
}

impl SymbolKey {
    pub fn new(name: impl Into<SmolStr>, kind: SymbolKind) -> Self {
        let name: SmolStr = name.into();
        let name = match name.strip_prefix("::") {
            Some(stripped) => SmolStr::new(stripped),
            None => name,
        };
        Self { name, kind }
    }

    pub fn class(name: impl Into<SmolStr>) -> Self {
        Self::new(name, SymbolKind::Class)
    }

    pub fn class_template(name: impl Into<SmolStr>) -> Self {
        Self::new(name, SymbolKind::ClassTemplate)
    }

    /// Name without enclosing namespaces or classes.
    pub fn unqualified_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }

    /// Enclosing scopes, outermost first.
    pub fn scopes(&self) -> Vec<&str> {
        let mut parts: Vec<&str> = self.name.split("::").collect();
        parts.pop();
        parts
    }

    /// True if the symbol lives in `namespace` or one nested inside it.
    pub fn is_in_namespace(&self, namespace: &str) -> bool {
        self.name
            .strip_prefix(namespace)
            .is_some_and(|rest| rest.starts_with("::"))
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Index of a symbol in the [`SymbolTable`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a declaration in the [`SymbolTable`] arena. Lower means discovered earlier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(u32);

impl DeclId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ============================================================================
// SYMBOL FACTS
// ============================================================================

/// Keyword used when rendering a forward declaration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RecordTag {
    #[default]
    Class,
    Struct,
    Union,
}

impl RecordTag {
    pub fn keyword(self) -> &'static str {
        match self {
            RecordTag::Class => "class",
            RecordTag::Struct => "struct",
            RecordTag::Union => "union",
        }
    }
}

/// Facts about a symbol supplied by the front end. Merged across reports:
/// once a fact is known to be true it stays true.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTraits {
    pub is_final: bool,
    pub has_default_template_args: bool,
    /// Qualified name of the enclosing class for nested classes.
    pub enclosing_class: Option<SmolStr>,
    pub in_inline_namespace: bool,
    /// Compiler builtins never need a header.
    pub is_builtin: bool,
    pub tag: RecordTag,
    /// Template parameter list used when rendering a forward declaration,
    /// e.g. `template <typename T>`.
    pub template_header: Option<SmolStr>,
}

impl SymbolTraits {
    fn merge(&mut self, other: SymbolTraits) {
        self.is_final |= other.is_final;
        self.has_default_template_args |= other.has_default_template_args;
        self.in_inline_namespace |= other.in_inline_namespace;
        self.is_builtin |= other.is_builtin;
        if other.enclosing_class.is_some() {
            self.enclosing_class = other.enclosing_class;
        }
        if other.tag != RecordTag::Class {
            self.tag = other.tag;
        }
        if other.template_header.is_some() {
            self.template_header = other.template_header;
        }
    }
}

/// Identity of a named entity and every declaration seen for it.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub key: SymbolKey,
    /// Candidate declarations in discovery order.
    pub declarations: Vec<DeclId>,
    pub is_in_system_namespace: bool,
    pub traits: SymbolTraits,
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// Explicit template instantiation flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstantiationKind {
    /// `extern template class S<int>;`
    Declaration,
    /// `template class S<int>;`
    Definition,
}

/// One concrete declaring occurrence of a symbol. Immutable once recorded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub symbol: SymbolKey,
    pub is_definition: bool,
    pub explicit_instantiation: Option<InstantiationKind>,
    pub location: Location,
    /// Source lines the declaration occupies in its expansion file.
    pub lines: LineRange,
    /// Template arguments when this declares a specialization, e.g. `int`.
    pub specialization: Option<SmolStr>,
    /// The file defines a specialization next to the primary template and
    /// takes responsibility for providing it.
    pub intends_to_provide: bool,
    /// Produced by a macro whose body forward-declares the symbol; such
    /// declarations belong to the spelling location.
    pub macro_forward_declare_hint: bool,
}

impl Declaration {
    /// A forward declaration (not a definition) at `location`.
    pub fn new(symbol: SymbolKey, location: Location) -> Self {
        let lines = LineRange::line(location.expansion.line);
        Self {
            symbol,
            is_definition: false,
            explicit_instantiation: None,
            location,
            lines,
            specialization: None,
            intends_to_provide: false,
            macro_forward_declare_hint: false,
        }
    }

    pub fn definition(mut self) -> Self {
        self.is_definition = true;
        self
    }

    pub fn explicit_instantiation(mut self, kind: InstantiationKind) -> Self {
        self.explicit_instantiation = Some(kind);
        self.is_definition = kind == InstantiationKind::Definition;
        self
    }

    pub fn specialization(mut self, args: impl Into<SmolStr>) -> Self {
        self.specialization = Some(args.into());
        self
    }

    pub fn intends_to_provide(mut self) -> Self {
        self.intends_to_provide = true;
        self
    }

    pub fn with_forward_declare_hint(mut self) -> Self {
        self.macro_forward_declare_hint = true;
        self
    }

    pub fn with_lines(mut self, lines: LineRange) -> Self {
        self.lines = lines;
        self
    }

    /// The file the declaration lives in: where it was expanded.
    pub fn file(&self) -> &IncludeName {
        &self.location.expansion.file
    }

    /// A plain forward declaration written by hand: not a definition, not an
    /// explicit instantiation, not macro-generated.
    pub fn is_forward_declaration(&self) -> bool {
        !self.is_definition
            && self.explicit_instantiation.is_none()
            && !self.location.is_macro_expansion()
            && self.symbol.kind.is_forward_declarable()
    }
}

// ============================================================================
// SYMBOL TABLE
// ============================================================================

/// Arena of symbols and declarations with a lookup table keyed by identity.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_key: FxHashMap<SymbolKey, SymbolId>,
    declarations: Vec<Declaration>,
    system_namespaces: Vec<SmolStr>,
}

impl SymbolTable {
    /// Create a new empty table with no system namespaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table whose symbols under any of `namespaces` are flagged as
    /// system symbols.
    pub fn with_system_namespaces<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            system_namespaces: namespaces.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Get or create the symbol for `key`.
    pub fn intern(&mut self, key: &SymbolKey) -> SymbolId {
        if let Some(&id) = self.by_key.get(key) {
            return id;
        }
        let id = SymbolId(self.symbols.len() as u32);
        let is_in_system_namespace = self
            .system_namespaces
            .iter()
            .any(|ns| key.is_in_namespace(ns));
        self.symbols.push(Symbol {
            key: key.clone(),
            declarations: Vec::new(),
            is_in_system_namespace,
            traits: SymbolTraits::default(),
        });
        self.by_key.insert(key.clone(), id);
        id
    }

    /// Record a declaration, appending it to its symbol's candidates.
    pub fn declare(&mut self, declaration: Declaration) -> DeclId {
        let symbol = self.intern(&declaration.symbol);
        let id = DeclId(self.declarations.len() as u32);
        self.declarations.push(declaration);
        self.symbols[symbol.index()].declarations.push(id);
        id
    }

    /// Merge front-end facts into a symbol.
    pub fn add_traits(&mut self, key: &SymbolKey, traits: SymbolTraits) {
        let id = self.intern(key);
        self.symbols[id.index()].traits.merge(traits);
    }

    pub fn lookup(&self, key: &SymbolKey) -> Option<SymbolId> {
        self.by_key.get(key).copied()
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn get(&self, key: &SymbolKey) -> Option<&Symbol> {
        self.lookup(key).map(|id| self.symbol(id))
    }

    pub fn declaration(&self, id: DeclId) -> &Declaration {
        &self.declarations[id.index()]
    }

    /// Candidate declarations of a symbol in discovery order.
    pub fn candidates<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> impl Iterator<Item = (DeclId, &'a Declaration)> + 'a {
        symbol
            .declarations
            .iter()
            .map(move |&id| (id, self.declaration(id)))
    }

    /// All declarations located in `file`, in discovery order.
    pub fn declarations_in<'a>(
        &'a self,
        file: &'a IncludeName,
    ) -> impl Iterator<Item = (DeclId, &'a Declaration)> + 'a {
        self.declarations
            .iter()
            .enumerate()
            .filter(move |(_, decl)| decl.file() == file)
            .map(|(idx, decl)| (DeclId(idx as u32), decl))
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
    }
}
