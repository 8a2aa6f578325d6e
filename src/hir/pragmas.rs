//! Include directives and pragma markers as reported by the front end.
//!
//! Pragmas attached to an `#include` line travel with the [`IncludeDirective`];
//! file-level pragmas are [`FilePragma`] events.

use smol_str::SmolStr;

use crate::base::{IncludeName, LineRange};

/// Pragma written on an `#include` line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IncludePragma {
    /// Never remove this include.
    Keep,
    /// The includer re-exports everything the included file provides.
    Export,
    /// The included file is the includer's associated header.
    Associated,
}

/// One `#include` as written in the includer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncludeDirective {
    pub includer: IncludeName,
    pub included: IncludeName,
    pub lines: LineRange,
    pub pragma: Option<IncludePragma>,
}

impl IncludeDirective {
    pub fn new(includer: IncludeName, included: IncludeName, line: u32) -> Self {
        Self {
            includer,
            included,
            lines: LineRange::line(line),
            pragma: None,
        }
    }

    pub fn with_pragma(mut self, pragma: IncludePragma) -> Self {
        self.pragma = Some(pragma);
        self
    }

    pub fn is_keep(&self) -> bool {
        self.pragma == Some(IncludePragma::Keep)
    }

    pub fn is_export(&self) -> bool {
        self.pragma == Some(IncludePragma::Export)
    }
}

/// File-level pragma.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilePragma {
    /// The file is private; `public` names the header to use instead.
    Private { public: Option<IncludeName> },
    /// Includes between this marker and [`FilePragma::EndExports`] are re-exported.
    BeginExports,
    EndExports,
    /// Every includer keeps this file.
    AlwaysKeep,
    /// Includers matching the regex may include this private file directly.
    Friend(String),
    /// Never suggest adding this include to the file.
    NoInclude(IncludeName),
    /// Never forward-declare this symbol in the file.
    NoForwardDeclare(SmolStr),
}

/// A file pragma with its position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PragmaEvent {
    pub file: IncludeName,
    pub line: u32,
    pub pragma: FilePragma,
}
