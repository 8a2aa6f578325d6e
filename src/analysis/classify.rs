//! Use Classifier: full use or forward-declarable.
//!
//! Classification is an ordered table of named predicate -> outcome rules.
//! The first rule whose predicate holds decides; the last rule always holds,
//! so every explicitly written use gets exactly one verdict. The first two
//! rules exclude a use from classification altogether.
//!
//! Language facts come from a [`CompletenessOracle`]. [`HintOracle`] answers
//! from the [`UseHints`](crate::hir::UseHints) and symbol traits the front
//! end recorded; a front end with deeper knowledge implements the trait
//! itself.

use tracing::trace;

use crate::config::AnalysisPolicy;
use crate::hir::{Symbol, Use};

/// What a use requires of the symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UseKind {
    /// The complete definition is needed.
    Full,
    /// A declaration is enough.
    ForwardDeclarable,
}

/// The outcome of classifying one use, with the rule that decided it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub kind: UseKind,
    pub rule: &'static str,
}

/// Questions about language semantics the classifier cannot answer itself.
pub trait CompletenessOracle: Send + Sync {
    /// `Some(true)` if the construct needs a complete type, `Some(false)` if it
    /// provably does not, `None` if unknown.
    fn requires_complete_type(&self, _use: &Use, _symbol: &Symbol) -> Option<bool> {
        None
    }

    fn is_final(&self, symbol: &Symbol) -> bool {
        symbol.traits.is_final
    }

    fn is_explicit_instantiation(&self, use_: &Use) -> bool {
        use_.hints.explicit_instantiation
    }
}

/// Oracle answering only from recorded hints and traits.
#[derive(Clone, Copy, Debug, Default)]
pub struct HintOracle;

impl CompletenessOracle for HintOracle {}

// ============================================================================
// RULE TABLE
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Skip,
    Full,
    ForwardDeclarable,
}

struct RuleInput<'a> {
    use_: &'a Use,
    symbol: &'a Symbol,
    policy: &'a AnalysisPolicy,
    oracle: &'a dyn CompletenessOracle,
}

/// One row of the classification table.
pub struct Rule {
    pub name: &'static str,
    applies: fn(&RuleInput<'_>) -> bool,
    outcome: Outcome,
}

const fn rule(name: &'static str, applies: fn(&RuleInput<'_>) -> bool, outcome: Outcome) -> Rule {
    Rule {
        name,
        applies,
        outcome,
    }
}

const RULES: &[Rule] = &[
    rule("implicit", |i| i.use_.hints.implicit, Outcome::Skip),
    rule(
        "local_to_declaration",
        |i| i.use_.hints.local_to_declaration,
        Outcome::Skip,
    ),
    rule(
        "explicit_instantiation",
        |i| i.oracle.is_explicit_instantiation(i.use_),
        Outcome::Full,
    ),
    rule("system_namespace", in_system_namespace, Outcome::Full),
    rule(
        "not_forward_declarable",
        |i| !i.symbol.key.kind.is_forward_declarable(),
        Outcome::Full,
    ),
    rule(
        "inline_namespace",
        |i| i.symbol.traits.in_inline_namespace,
        Outcome::Full,
    ),
    rule(
        "default_template_args",
        |i| i.symbol.traits.has_default_template_args,
        Outcome::Full,
    ),
    rule("complete_type_context", needs_complete_type, Outcome::Full),
    rule(
        "specialization_selector",
        |i| i.use_.hints.specialization_selector,
        Outcome::Full,
    ),
    rule("complete_type_container", in_complete_container, Outcome::Full),
    rule(
        "final_pointer_or_reference",
        |i| i.use_.hints.pointer_or_reference && i.oracle.is_final(i.symbol),
        Outcome::ForwardDeclarable,
    ),
    rule(
        "pointer_or_reference",
        |i| i.use_.hints.pointer_or_reference,
        Outcome::ForwardDeclarable,
    ),
    rule("dependent", |i| i.use_.hints.dependent, Outcome::ForwardDeclarable),
    rule(
        "oracle_complete",
        |i| i.oracle.requires_complete_type(i.use_, i.symbol) == Some(true),
        Outcome::Full,
    ),
    rule(
        "oracle_incomplete",
        |i| i.oracle.requires_complete_type(i.use_, i.symbol) == Some(false),
        Outcome::ForwardDeclarable,
    ),
    rule("ambiguous", |_| true, Outcome::ForwardDeclarable),
];

fn in_system_namespace(input: &RuleInput<'_>) -> bool {
    input.symbol.is_in_system_namespace
        || input
            .policy
            .system_namespaces
            .iter()
            .any(|ns| input.symbol.key.is_in_namespace(ns))
}

fn needs_complete_type(input: &RuleInput<'_>) -> bool {
    let hints = &input.use_.hints;
    hints.dereferenced
        || hints.member_access
        || hints.value_use
        || hints.sizeof_or_alignof
        || hints.base_class
        || hints.by_value_signature
}

fn in_complete_container(input: &RuleInput<'_>) -> bool {
    input
        .use_
        .hints
        .container
        .as_deref()
        .is_some_and(|container| input.policy.requires_complete_elements(container))
}

/// The rule names in evaluation order.
pub fn rule_names() -> impl Iterator<Item = &'static str> {
    RULES.iter().map(|rule| rule.name)
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Applies the rule table under one policy.
#[derive(Clone, Copy)]
pub struct Classifier<'a> {
    policy: &'a AnalysisPolicy,
    oracle: &'a dyn CompletenessOracle,
}

impl<'a> Classifier<'a> {
    pub fn new(policy: &'a AnalysisPolicy, oracle: &'a dyn CompletenessOracle) -> Self {
        Self { policy, oracle }
    }

    /// Classify one use. `None` means the use produces no requirement.
    pub fn classify(&self, use_: &Use, symbol: &Symbol) -> Option<Verdict> {
        let input = RuleInput {
            use_,
            symbol,
            policy: self.policy,
            oracle: self.oracle,
        };
        let rule = RULES.iter().find(|rule| (rule.applies)(&input))?;
        trace!(
            "[CLASSIFY] {} at {}:{} -> {:?} ({})",
            use_.symbol,
            use_.referencing_file,
            use_.line(),
            rule.outcome,
            rule.name
        );
        match rule.outcome {
            Outcome::Skip => None,
            Outcome::Full => Some(Verdict {
                kind: UseKind::Full,
                rule: rule.name,
            }),
            Outcome::ForwardDeclarable => Some(Verdict {
                kind: UseKind::ForwardDeclarable,
                rule: rule.name,
            }),
        }
    }
}

impl std::fmt::Debug for Classifier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("policy", self.policy)
            .finish_non_exhaustive()
    }
}
