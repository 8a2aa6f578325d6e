//! Diagnostics: non-fatal findings reported to the renderer.
//!
//! Fatal conditions are [`AnalysisError`](crate::error::AnalysisError)s;
//! everything here degrades to a conservative recommendation and the run
//! continues.

use std::fmt;
use std::sync::Arc;

use crate::base::IncludeName;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A diagnostic message with optional location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file the finding is about, if any (mapping problems have none).
    pub file: Option<IncludeName>,
    /// Line (1-indexed), 0 when unknown.
    pub line: u32,
    pub severity: Severity,
    /// Stable code, see [`codes`].
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    pub related: Vec<RelatedInfo>,
}

/// Related information for a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedInfo {
    pub file: IncludeName,
    pub line: u32,
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<Arc<str>>) -> Self {
        Self {
            file: None,
            line: 0,
            severity: Severity::Error,
            code: None,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(message)
        }
    }

    /// Attach a location.
    pub fn at(mut self, file: IncludeName, line: u32) -> Self {
        self.file = Some(file);
        self.line = line;
        self
    }

    /// Set the diagnostic code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Add related information.
    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}: ", file.path(), self.line)?;
        }
        if let Some(code) = &self.code {
            write!(f, "[{code}] ")?;
        }
        f.write_str(&self.message)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Stable diagnostic codes.
///
/// ## Code Ranges
///
/// - **E0001-E0099**: Fatal analysis errors, mirrored for renderers
/// - **W0001-W0099**: Warnings (dropped mappings, include violations)
pub mod codes {
    /// Include cycle.
    pub const INCLUDE_CYCLE: &str = "E0001";
    /// Two explicit instantiation definitions for one specialization.
    pub const DOUBLE_INSTANTIATION: &str = "E0002";

    /// Mapping pattern failed to compile; entry dropped.
    pub const UNRESOLVABLE_PATTERN: &str = "W0001";
    /// Private header without any public replacement.
    pub const NO_PUBLIC_HEADER: &str = "W0002";
    /// Providing file is not directly included.
    pub const NOT_DIRECTLY_INCLUDED: &str = "W0003";
    /// Nothing provides a declaration for the symbol.
    pub const NEEDS_DECLARATION: &str = "W0004";
    /// Include cycle skipped under the ignore-cycles policy.
    pub const CYCLE_IGNORED: &str = "W0005";
    /// `begin_exports` without `end_exports` or the other way round.
    pub const UNBALANCED_EXPORTS: &str = "W0006";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during analysis.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// A mapping entry whose pattern did not compile.
    pub fn unresolvable_pattern(&mut self, pattern: &str, reason: &str) {
        self.add(
            Diagnostic::warning(format!(
                "skipping mapping entry: cannot compile pattern '{pattern}': {reason}"
            ))
            .with_code(codes::UNRESOLVABLE_PATTERN),
        );
    }

    /// A private header with no public replacement.
    pub fn no_public_header(&mut self, header: &IncludeName) {
        self.add(
            Diagnostic::warning(format!(
                "no public header found to replace the private header {header}"
            ))
            .at(header.clone(), 0)
            .with_code(codes::NO_PUBLIC_HEADER),
        );
    }

    /// A full use whose provider is not directly included.
    pub fn not_directly_included(
        &mut self,
        file: &IncludeName,
        line: u32,
        symbol: &str,
        provider: &IncludeName,
    ) {
        self.add(
            Diagnostic::warning(format!(
                "{symbol} is defined in {provider}, which isn't directly #included"
            ))
            .at(file.clone(), line)
            .with_code(codes::NOT_DIRECTLY_INCLUDED),
        );
    }

    /// A use that nothing declares.
    pub fn needs_declaration(&mut self, file: &IncludeName, line: u32, symbol: &str) {
        self.add(
            Diagnostic::warning(format!(
                "{symbol} needs a declaration, but does not provide or directly #include one"
            ))
            .at(file.clone(), line)
            .with_code(codes::NEEDS_DECLARATION),
        );
    }

    /// An include cycle skipped because cycles are ignored.
    pub fn cycle_ignored(&mut self, file: &IncludeName, cycle: &[IncludeName]) {
        let path: Vec<_> = cycle.iter().map(|f| f.as_str()).collect();
        self.add(
            Diagnostic::warning(format!("ignoring include cycle: {}", path.join(" -> ")))
                .at(file.clone(), 0)
                .with_code(codes::CYCLE_IGNORED),
        );
    }

    /// Unbalanced export region.
    pub fn unbalanced_exports(&mut self, file: &IncludeName, line: u32, what: &str) {
        self.add(
            Diagnostic::warning(format!("unbalanced export region: {what}"))
                .at(file.clone(), line)
                .with_code(codes::UNBALANCED_EXPORTS),
        );
    }

    /// Append everything another collector gathered.
    pub fn extend(&mut self, other: DiagnosticCollector) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get diagnostics for a specific file.
    pub fn diagnostics_for_file(&self, file: &IncludeName) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.file.as_ref() == Some(file))
            .collect()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Take ownership of all diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
