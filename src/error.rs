//! Error types for analysis and mapping-file loading.

use std::path::PathBuf;

use smol_str::SmolStr;
use thiserror::Error;

use crate::analysis::AnalysisState;
use crate::base::IncludeName;
use crate::hir::{Diagnostic, codes};

/// Fatal analysis errors. Any of these aborts the translation unit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// A reported file transitively includes itself.
    #[error("include cycle in {file}: {}", format_cycle(.cycle))]
    IncludeCycle {
        file: IncludeName,
        cycle: Vec<IncludeName>,
    },

    /// Two different explicit instantiation definitions were selected for one
    /// specialization.
    #[error(
        "explicit instantiation of {symbol}<{specialization}> attempted twice (in {first} and {second})"
    )]
    DoubleExplicitInstantiation {
        symbol: SmolStr,
        specialization: SmolStr,
        first: IncludeName,
        second: IncludeName,
    },

    /// A file analysis was driven out of order.
    #[error("invalid transition for {file}: {from:?} -> {to:?}")]
    InvalidTransition {
        file: IncludeName,
        from: AnalysisState,
        to: AnalysisState,
    },

    /// A file entered the collecting phase twice in one run.
    #[error("{file} was already analyzed in this session")]
    AlreadyAnalyzed { file: IncludeName },

    /// A use or pragma referred to a file the session does not analyze.
    #[error("unknown file: {file}")]
    UnknownFile { file: IncludeName },
}

impl AnalysisError {
    /// Create an include-cycle error.
    pub fn include_cycle(file: IncludeName, cycle: Vec<IncludeName>) -> Self {
        Self::IncludeCycle { file, cycle }
    }

    /// Create an invalid-transition error.
    pub fn invalid_transition(file: IncludeName, from: AnalysisState, to: AnalysisState) -> Self {
        Self::InvalidTransition { file, from, to }
    }

    /// Mirror the error as a diagnostic for renderers.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            AnalysisError::IncludeCycle { file, .. } => {
                diag.at(file.clone(), 0).with_code(codes::INCLUDE_CYCLE)
            }
            AnalysisError::DoubleExplicitInstantiation { second, .. } => {
                diag.at(second.clone(), 0).with_code(codes::DOUBLE_INSTANTIATION)
            }
            AnalysisError::InvalidTransition { file, .. }
            | AnalysisError::AlreadyAnalyzed { file }
            | AnalysisError::UnknownFile { file } => diag.at(file.clone(), 0),
        }
    }
}

fn format_cycle(cycle: &[IncludeName]) -> String {
    cycle
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur while loading mapping files.
#[derive(Debug, Error)]
pub enum MappingError {
    /// IO error while reading a mapping file.
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML/JSON.
    #[error("cannot parse mapping file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// An entry has the wrong shape.
    #[error("invalid mapping entry in {}: {message}", .path.display())]
    InvalidEntry { path: PathBuf, message: String },

    /// A `ref` entry names a file that cannot be found.
    #[error("mapping file {name} referenced from {} not found", .path.display())]
    MissingRef { path: PathBuf, name: String },

    /// Mapping files reference each other in a loop.
    #[error("mapping file {} references itself through {name}", .path.display())]
    RefCycle { path: PathBuf, name: String },
}

impl MappingError {
    /// Create a parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid entry error.
    pub fn invalid_entry(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            path: path.into(),
            message: message.into(),
        }
    }
}
