//! Pluggable matchers for the `from` side of provider edges.
//!
//! Three backends share the [`PathMatcher`] interface:
//! - [`ExactMatcher`] - the quoted include must be identical
//! - [`GlobMatcher`] - shell-style glob over the quoted include (`<bits/*.h>`)
//! - [`RegexMatcher`] - regex that must match the whole quoted include
//!
//! All of them match against the quoted form, so `<` and `"` are part of
//! the text being matched.

use std::fmt;

use regex::Regex;
use thiserror::Error;

use crate::base::IncludeName;

/// How a pattern is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "mapping-files",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum MatchKind {
    Exact,
    Glob,
    Regex,
}

impl MatchKind {
    /// Infer the kind from mapping-file text: `@regex`, a glob when
    /// wildcard characters appear, exact otherwise. Returns the pattern with
    /// any `@` marker removed.
    pub fn detect(text: &str) -> (MatchKind, &str) {
        if let Some(regex) = text.strip_prefix('@') {
            (MatchKind::Regex, regex)
        } else if text.contains(['*', '?', '[']) {
            (MatchKind::Glob, text)
        } else {
            (MatchKind::Exact, text)
        }
    }
}

/// A pattern that failed to compile.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot compile {kind:?} pattern '{pattern}': {reason}")]
pub struct PatternError {
    pub kind: MatchKind,
    pub pattern: String,
    pub reason: String,
}

/// Matcher for the `from` side of a provider edge.
pub trait PathMatcher: fmt::Debug + Send + Sync {
    fn is_match(&self, include: &IncludeName) -> bool;

    fn kind(&self) -> MatchKind;

    /// The pattern text as configured.
    fn source(&self) -> &str;

    /// The single file matched, for exact matchers.
    fn exact(&self) -> Option<&IncludeName> {
        None
    }
}

/// Matches one quoted include.
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    include: IncludeName,
}

impl ExactMatcher {
    pub fn new(include: IncludeName) -> Self {
        Self { include }
    }
}

impl PathMatcher for ExactMatcher {
    fn is_match(&self, include: &IncludeName) -> bool {
        &self.include == include
    }

    fn kind(&self) -> MatchKind {
        MatchKind::Exact
    }

    fn source(&self) -> &str {
        self.include.as_str()
    }

    fn exact(&self) -> Option<&IncludeName> {
        Some(&self.include)
    }
}

/// Glob over the quoted include. `*` also crosses directory separators.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    source: String,
    pattern: glob::Pattern,
}

impl GlobMatcher {
    pub fn new(source: &str) -> Result<Self, PatternError> {
        let pattern = glob::Pattern::new(source).map_err(|err| PatternError {
            kind: MatchKind::Glob,
            pattern: source.to_string(),
            reason: err.msg.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            pattern,
        })
    }
}

impl PathMatcher for GlobMatcher {
    fn is_match(&self, include: &IncludeName) -> bool {
        self.pattern.matches(include.as_str())
    }

    fn kind(&self) -> MatchKind {
        MatchKind::Glob
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// Regex that must match the entire quoted include.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    source: String,
    regex: Regex,
}

impl RegexMatcher {
    pub fn new(source: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|err| PatternError {
            kind: MatchKind::Regex,
            pattern: source.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Match arbitrary text, used for friend patterns over includer names.
    pub fn is_match_str(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PathMatcher for RegexMatcher {
    fn is_match(&self, include: &IncludeName) -> bool {
        self.regex.is_match(include.as_str())
    }

    fn kind(&self) -> MatchKind {
        MatchKind::Regex
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// Build the matcher for `source` with the given backend.
pub fn compile(kind: MatchKind, source: &str) -> Result<Box<dyn PathMatcher>, PatternError> {
    Ok(match kind {
        MatchKind::Exact => Box::new(ExactMatcher::new(IncludeName::new(source))),
        MatchKind::Glob => Box::new(GlobMatcher::new(source)?),
        MatchKind::Regex => Box::new(RegexMatcher::new(source)?),
    })
}
