//! Use records: one reference to a named entity in source text.

use smol_str::SmolStr;

use super::symbols::SymbolKey;
use crate::base::{IncludeName, Location, SourceLoc};

/// Syntactic and semantic facts about a use, supplied by the front end.
///
/// The classifier turns these into a full-use or forward-declarable verdict;
/// none of them is interpreted anywhere else.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UseHints {
    /// Not written in the source: defaulted special members, deduced
    /// template arguments.
    pub implicit: bool,
    /// Appears only inside the body of its own declaration.
    pub local_to_declaration: bool,
    /// Named as the pointee or referent of a pointer/reference type.
    pub pointer_or_reference: bool,
    pub dereferenced: bool,
    pub member_access: bool,
    /// A value of the type is created, copied or destroyed.
    pub value_use: bool,
    pub sizeof_or_alignof: bool,
    pub base_class: bool,
    /// By-value parameter or return type of a function being defined or called.
    pub by_value_signature: bool,
    pub explicit_instantiation: bool,
    /// Written as the argument list selecting an explicit or partial specialization.
    pub specialization_selector: bool,
    /// Element type of this container template, e.g. `std::vector`.
    pub container: Option<SmolStr>,
    /// A dependent type inside an uninstantiated template.
    pub dependent: bool,
}

/// A use made through a `using` declaration or typedef living elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasRef {
    pub file: IncludeName,
    /// A using-declaration (as opposed to a typedef or alias template).
    pub is_using_declaration: bool,
}

/// One reference to a symbol. Created once per traversal event, immutable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Use {
    /// The file whose include list the use contributes to.
    pub referencing_file: IncludeName,
    pub symbol: SymbolKey,
    pub location: Location,
    pub hints: UseHints,
    /// Template arguments when a class-template specialization is named.
    pub specialization: Option<SmolStr>,
    pub alias: Option<AliasRef>,
}

impl Use {
    /// A use located at `location`, contributing to the file it was expanded in.
    pub fn new(symbol: SymbolKey, location: Location) -> Self {
        Self {
            referencing_file: location.expansion.file.clone(),
            symbol,
            location,
            hints: UseHints::default(),
            specialization: None,
            alias: None,
        }
    }

    /// Convenience for a use outside any macro.
    pub fn at(symbol: SymbolKey, file: IncludeName, line: u32) -> Self {
        Self::new(symbol, Location::plain(SourceLoc::new(file, line, 1)))
    }

    pub fn with_hints(mut self, hints: UseHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_specialization(mut self, args: impl Into<SmolStr>) -> Self {
        self.specialization = Some(args.into());
        self
    }

    pub fn through_alias(mut self, alias: AliasRef) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Line of the use in the referencing file.
    pub fn line(&self) -> u32 {
        self.location.expansion.line
    }
}
