//! File identity as the text an `#include` directive would use.
//!
//! The front end converts absolute paths to include spellings before handing
//! them over, so every mapping, comparison and recommendation in the crate
//! works on the quoted form: `"foo/bar.h"` or `<vector>`.

use std::fmt;
use std::sync::Arc;

use super::constants::{
    HEADER_EXTENSIONS, INLINE_SUFFIX, OPAQUE_EXTENSIONS, SOURCE_EXTENSIONS, TEST_SUFFIXES,
};

/// A file identity in quoted-include form.
///
/// Cheap to clone. Ordering is lexicographic on the quoted text, which sorts
/// angled includes (`<`) before quoted ones (`"`) only through the explicit
/// sort keys in the engine, never implicitly.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IncludeName(Arc<str>);

impl IncludeName {
    /// `"path"` form.
    pub fn quoted(path: &str) -> Self {
        Self(Arc::from(format!("\"{path}\"")))
    }

    /// `<path>` form.
    pub fn angled(path: &str) -> Self {
        Self(Arc::from(format!("<{path}>")))
    }

    /// Parse text that is already in quoted-include form.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if is_quoted_include(text) {
            Some(Self(Arc::from(text)))
        } else {
            None
        }
    }

    /// Accept either a quoted include or a bare path (treated as `"path"`).
    pub fn new(text: &str) -> Self {
        Self::parse(text).unwrap_or_else(|| Self::quoted(text.trim()))
    }

    /// The quoted text, e.g. `<vector>`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path between the delimiters, e.g. `vector`.
    pub fn path(&self) -> &str {
        &self.0[1..self.0.len() - 1]
    }

    pub fn is_angled(&self) -> bool {
        self.0.starts_with('<')
    }

    /// Everything not ending in a source extension is a header; standard
    /// headers have no extension at all.
    pub fn is_header(&self) -> bool {
        is_header_path(self.path())
    }

    /// Generated or non-header includes that are kept unconditionally.
    pub fn is_opaque_artifact(&self) -> bool {
        !self.is_header()
            || self
                .extension()
                .is_some_and(|ext| OPAQUE_EXTENSIONS.contains(&ext))
    }

    /// File name without directories.
    pub fn file_name(&self) -> &str {
        let path = self.path();
        path.rsplit('/').next().unwrap_or(path)
    }

    /// Directory part, without a trailing slash. Empty for top-level files.
    pub fn directory(&self) -> &str {
        let path = self.path();
        path.rfind('/').map(|idx| &path[..idx]).unwrap_or("")
    }

    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        name.rfind('.').map(|idx| &name[idx + 1..])
    }

    /// Canonical name used to pair a source file with its associated header.
    pub fn canonical(&self) -> String {
        canonical_name(self.path())
    }

    /// Canonical name of the file name alone, ignoring directories.
    pub fn canonical_file_name(&self) -> String {
        canonical_name(self.file_name())
    }

    /// True for `foo-inl.h`-style inline definition headers.
    pub fn is_inline_definitions(&self) -> bool {
        let stem = strip_extension(self.path());
        stem.ends_with(INLINE_SUFFIX)
    }

    /// The `#include` line for this file.
    pub fn include_line(&self) -> String {
        format!("#include {}", self.0)
    }
}

impl fmt::Display for IncludeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for IncludeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IncludeName {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// True for `"..."` or `<...>` text.
pub fn is_quoted_include(text: &str) -> bool {
    if text.len() < 3 {
        return false;
    }
    (text.starts_with('"') && text.ends_with('"')) || (text.starts_with('<') && text.ends_with('>'))
}

/// True unless the path ends in a source-file extension.
pub fn is_header_path(path: &str) -> bool {
    let path = path.trim_end_matches(['"', '>']);
    !SOURCE_EXTENSIONS
        .iter()
        .any(|ext| path.len() > ext.len() && path.ends_with(ext) && path[..path.len() - ext.len()].ends_with('.'))
}

fn strip_extension(path: &str) -> &str {
    for ext in HEADER_EXTENSIONS.iter().chain(SOURCE_EXTENSIONS) {
        if let Some(stem) = path.strip_suffix(ext).and_then(|s| s.strip_suffix('.')) {
            return stem;
        }
    }
    path
}

/// Canonical name of a path: extension, test suffixes and `-inl` stripped,
/// `/internal/` rewritten to `/public/` and `/include/` to `/src/`.
///
/// `foo/bar.h`, `foo/bar.cc`, `foo/bar_test.cc` and `foo/bar-inl.h` all share
/// the canonical name `foo/bar`.
pub fn canonical_name(path: &str) -> String {
    let mut name = strip_extension(path).to_string();

    for suffix in TEST_SUFFIXES {
        if let Some(stem) = name.strip_suffix(suffix) {
            name = stem.to_string();
            break;
        }
    }
    if let Some(stem) = name.strip_suffix(INLINE_SUFFIX) {
        name = stem.to_string();
    }
    if let Some(idx) = name.find("/internal/") {
        name = format!("{}/public/{}", &name[..idx], &name[idx + "/internal/".len()..]);
    }
    if let Some(idx) = name.find("/include/") {
        name = format!("{}/src/{}", &name[..idx], &name[idx + "/include/".len()..]);
    }
    name
}
