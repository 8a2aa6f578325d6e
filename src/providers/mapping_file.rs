//! Mapping files: user-supplied provider mappings in YAML or JSON.
//!
//! A mapping file is a sequence of one-key maps:
//!
//! ```yaml
//! - include: ["<bits/stl_vector.h>", private, "<vector>", public]
//! - include: ["@\"lib/detail/.*\"", private, "\"lib/api.h\"", public]
//! - symbol: ["NULL", private, "<cstddef>", public]
//! - mapping: { from: "<x86/*.h>", to: "<machine/types.h>", visibility: private, match: glob }
//! - ref: more.imp
//! ```
//!
//! `include` sources starting with `@` are regexes, sources with wildcard
//! characters are globs, everything else is exact. `ref` pulls in another
//! file, looked up next to the referencing file and then on the search path.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::map::{ProviderMapBuilder, Visibility};
use super::pattern::MatchKind;
use crate::base::{IncludeName, is_quoted_include};
use crate::error::MappingError;

/// One entry of a mapping file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingEntry {
    /// `[from, from_visibility, to, to_visibility]`
    Include((String, Visibility, String, Visibility)),
    /// `[symbol, visibility, to, to_visibility]`
    Symbol((String, Visibility, String, Visibility)),
    /// Explicit form with a declared match kind.
    Mapping(ExplicitMapping),
    /// Another mapping file.
    Ref(String),
}

/// `{from, to, visibility, match}` form.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ExplicitMapping {
    pub from: String,
    pub to: String,
    pub visibility: Visibility,
    #[serde(default = "default_public")]
    pub to_visibility: Visibility,
    #[serde(default, rename = "match")]
    pub match_kind: Option<MatchKind>,
}

fn default_public() -> Visibility {
    Visibility::Public
}

/// Text format of a mapping file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingFormat {
    Json,
    Yaml,
}

impl MappingFormat {
    /// `.json` files are JSON, everything else (`.imp`, `.yaml`) is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => MappingFormat::Json,
            _ => MappingFormat::Yaml,
        }
    }
}

/// Parse mapping-file text. `origin` is only used for error messages.
pub fn parse_mapping_text(
    text: &str,
    format: MappingFormat,
    origin: &Path,
) -> Result<Vec<MappingEntry>, MappingError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    match format {
        MappingFormat::Json => serde_json::from_str(text)
            .map_err(|err| MappingError::parse(origin, err.to_string())),
        MappingFormat::Yaml => serde_yaml::from_str(text)
            .map_err(|err| MappingError::parse(origin, err.to_string())),
    }
}

/// Loads mapping files into a [`ProviderMapBuilder`], following `ref`s.
#[derive(Debug, Default)]
pub struct MappingLoader {
    search_path: Vec<PathBuf>,
    stack: Vec<PathBuf>,
    loaded: Vec<PathBuf>,
}

impl MappingLoader {
    pub fn new(search_path: Vec<PathBuf>) -> Self {
        Self {
            search_path,
            ..Self::default()
        }
    }

    /// Files loaded so far, in load order.
    pub fn loaded(&self) -> &[PathBuf] {
        &self.loaded
    }

    /// Load `path` and everything it references. A file reached twice is
    /// only read once.
    pub fn load(
        &mut self,
        builder: &mut ProviderMapBuilder,
        path: &Path,
    ) -> Result<(), MappingError> {
        let path = path.to_path_buf();
        if self.stack.contains(&path) {
            return Err(MappingError::RefCycle {
                path: self.stack.last().cloned().unwrap_or_else(|| path.clone()),
                name: path.display().to_string(),
            });
        }
        if self.loaded.contains(&path) {
            debug!("[MAPPING] Already loaded {}", path.display());
            return Ok(());
        }

        let text = fs::read_to_string(&path).map_err(|source| MappingError::Io {
            path: path.clone(),
            source,
        })?;
        let entries = parse_mapping_text(&text, MappingFormat::from_path(&path), &path)?;
        debug!("[MAPPING] Loading {} ({} entries)", path.display(), entries.len());

        self.stack.push(path.clone());
        let result = entries
            .into_iter()
            .try_for_each(|entry| self.apply(builder, &path, entry));
        self.stack.pop();
        result?;

        self.loaded.push(path);
        Ok(())
    }

    fn apply(
        &mut self,
        builder: &mut ProviderMapBuilder,
        origin: &Path,
        entry: MappingEntry,
    ) -> Result<(), MappingError> {
        match entry {
            MappingEntry::Include((from, from_vis, to, to_vis)) => {
                check_include(origin, &to)?;
                if !is_quoted_include(&from) && !from.starts_with('@') {
                    return Err(MappingError::invalid_entry(
                        origin,
                        format!("include source must be quoted or @regex: {from}"),
                    ));
                }
                builder.add_mapping_text(&from, from_vis, &to, to_vis);
            }
            MappingEntry::Symbol((symbol, _, to, to_vis)) => {
                check_include(origin, &to)?;
                let to = IncludeName::new(&to);
                builder.mark_visibility(to.clone(), to_vis);
                builder.add_symbol(&symbol, to);
            }
            MappingEntry::Mapping(mapping) => {
                check_include(origin, &mapping.to)?;
                let (kind, pattern) = match mapping.match_kind {
                    Some(kind) => (kind, mapping.from.as_str()),
                    None => MatchKind::detect(&mapping.from),
                };
                builder.add_mapping(
                    kind,
                    pattern,
                    mapping.visibility,
                    IncludeName::new(&mapping.to),
                    mapping.to_visibility,
                );
            }
            MappingEntry::Ref(name) => {
                let target = self.find_ref(origin, &name).ok_or_else(|| {
                    MappingError::MissingRef {
                        path: origin.to_path_buf(),
                        name: name.clone(),
                    }
                })?;
                self.load(builder, &target)?;
            }
        }
        Ok(())
    }

    fn find_ref(&self, origin: &Path, name: &str) -> Option<PathBuf> {
        let candidate = Path::new(name);
        if candidate.is_absolute() {
            return candidate.is_file().then(|| candidate.to_path_buf());
        }
        origin
            .parent()
            .into_iter()
            .chain(self.search_path.iter().map(PathBuf::as_path))
            .map(|dir| dir.join(name))
            .find(|path| path.is_file())
    }
}

fn check_include(origin: &Path, to: &str) -> Result<(), MappingError> {
    if is_quoted_include(to) {
        Ok(())
    } else {
        Err(MappingError::invalid_entry(
            origin,
            format!("mapping target must be a quoted include: {to}"),
        ))
    }
}
