//! Analysis configuration: policy switches and provider-map sources.
//!
//! ## Key Types
//!
//! - [`AnalysisPolicy`] - switches consulted by the classifier and the engine
//! - [`FileGlobs`] - compiled `keep` / `check_also` globs over include paths
//! - [`AnalysisConfig`] - policy plus mapping files, builds the [`ProviderMap`]
//!
//! With the `mapping-files` feature both types deserialize from YAML or JSON;
//! every field is optional.

use std::path::PathBuf;

use smol_str::SmolStr;
use tracing::warn;

use crate::base::IncludeName;
use crate::base::constants::DEFAULT_SYSTEM_NAMESPACES;
use crate::hir::DiagnosticCollector;
use crate::providers::{ProviderMap, ProviderMapBuilder};

/// Container templates whose element type must be complete.
pub const DEFAULT_COMPLETE_TYPE_CONTAINERS: &[&str] = &[
    "std::array",
    "std::bitset",
    "std::deque",
    "std::hash_map",
    "std::hash_set",
    "std::map",
    "std::multimap",
    "std::multiset",
    "std::set",
    "std::unordered_map",
    "std::unordered_multimap",
    "std::unordered_multiset",
    "std::unordered_set",
    "std::vector",
];

// ============================================================================
// POLICY
// ============================================================================

/// Policy switches for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "mapping-files",
    derive(serde::Deserialize),
    serde(default)
)]
pub struct AnalysisPolicy {
    /// Namespaces whose symbols are never forward-declared.
    pub system_namespaces: Vec<SmolStr>,
    /// Never add a file outside the transitive include closure.
    pub transitive_includes_only: bool,
    /// Treat include cycles as warnings instead of fatal errors.
    pub ignore_cycles: bool,
    /// A provider reachable through a kept include satisfies a use.
    pub tolerate_transitive: bool,
    /// Promote every forward-declarable use to a full use.
    pub no_forward_decls: bool,
    /// Sort quoted includes before angled ones.
    pub quoted_includes_first: bool,
    /// Attribute uses through an exercised using-declaration to its file.
    pub using_is_a_use: bool,
    /// Include paths matching any of these globs are never removed.
    pub keep: Vec<String>,
    /// Extra files to report on besides the main file and its associated headers.
    pub check_also: Vec<String>,
    /// The main file's first include is a precompiled header.
    pub pch_in_code: bool,
    pub complete_type_containers: Vec<SmolStr>,
}

impl Default for AnalysisPolicy {
    fn default() -> Self {
        Self {
            system_namespaces: DEFAULT_SYSTEM_NAMESPACES
                .iter()
                .map(|ns| SmolStr::new(ns))
                .collect(),
            transitive_includes_only: false,
            ignore_cycles: false,
            tolerate_transitive: false,
            no_forward_decls: false,
            quoted_includes_first: false,
            using_is_a_use: true,
            keep: Vec::new(),
            check_also: Vec::new(),
            pch_in_code: false,
            complete_type_containers: DEFAULT_COMPLETE_TYPE_CONTAINERS
                .iter()
                .map(|name| SmolStr::new(name))
                .collect(),
        }
    }
}

impl AnalysisPolicy {
    pub fn is_system_namespace(&self, namespace: &str) -> bool {
        self.system_namespaces.iter().any(|ns| ns == namespace)
    }

    /// True if elements of `container` must be complete types.
    pub fn requires_complete_elements(&self, container: &str) -> bool {
        let container = container.strip_prefix("::").unwrap_or(container);
        self.complete_type_containers.iter().any(|c| c == container)
    }

    /// Compile the `keep` globs. Bad globs are reported and skipped.
    pub fn keep_globs(&self, diagnostics: &mut DiagnosticCollector) -> FileGlobs {
        FileGlobs::compile(&self.keep, diagnostics)
    }

    /// Compile the `check_also` globs. Bad globs are reported and skipped.
    pub fn check_also_globs(&self, diagnostics: &mut DiagnosticCollector) -> FileGlobs {
        FileGlobs::compile(&self.check_also, diagnostics)
    }
}

/// Globs matched against the path inside an include's quotes.
#[derive(Clone, Debug, Default)]
pub struct FileGlobs {
    patterns: Vec<glob::Pattern>,
}

impl FileGlobs {
    pub fn compile(sources: &[String], diagnostics: &mut DiagnosticCollector) -> Self {
        let patterns = sources
            .iter()
            .filter_map(|source| match glob::Pattern::new(source) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    warn!("[PROVIDERS] Ignoring glob '{}': {}", source, err.msg);
                    diagnostics.unresolvable_pattern(source, err.msg);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn matches(&self, file: &IncludeName) -> bool {
        self.patterns.iter().any(|p| p.matches(file.path()))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

// ============================================================================
// CONFIG
// ============================================================================

/// Everything needed to set up a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "mapping-files",
    derive(serde::Deserialize),
    serde(default)
)]
pub struct AnalysisConfig {
    pub policy: AnalysisPolicy,
    /// Mapping files loaded in order after the built-in tables.
    pub mapping_files: Vec<PathBuf>,
    /// Directories searched for mapping files and their `ref`s.
    pub search_path: Vec<PathBuf>,
    /// Skip the built-in standard library and platform tables.
    pub no_default_mappings: bool,
}

impl AnalysisConfig {
    pub fn new(policy: AnalysisPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    #[cfg(feature = "mapping-files")]
    pub fn from_yaml_str(text: &str) -> Result<Self, crate::error::MappingError> {
        serde_yaml::from_str(text)
            .map_err(|err| crate::error::MappingError::parse("<config>", err.to_string()))
    }

    #[cfg(feature = "mapping-files")]
    pub fn from_json_str(text: &str) -> Result<Self, crate::error::MappingError> {
        serde_json::from_str(text)
            .map_err(|err| crate::error::MappingError::parse("<config>", err.to_string()))
    }

    /// A builder seeded with the built-in tables unless they are disabled.
    pub fn provider_builder(&self) -> ProviderMapBuilder {
        let builder = ProviderMap::builder();
        if self.no_default_mappings {
            builder
        } else {
            builder.with_builtins()
        }
    }

    /// Build the shared provider map: built-in tables, then mapping files.
    #[cfg(feature = "mapping-files")]
    pub fn build_provider_map(
        &self,
    ) -> Result<(ProviderMap, DiagnosticCollector), crate::error::MappingError> {
        let mut builder = self.provider_builder();
        let mut loader = crate::providers::MappingLoader::new(self.search_path.clone());
        for path in &self.mapping_files {
            let path = self
                .search_path
                .iter()
                .map(|dir| dir.join(path))
                .find(|candidate| !path.is_absolute() && candidate.is_file())
                .unwrap_or_else(|| path.clone());
            loader.load(&mut builder, &path)?;
        }
        Ok(builder.build_with_diagnostics())
    }

    /// Build the shared provider map from the built-in tables only.
    #[cfg(not(feature = "mapping-files"))]
    pub fn build_provider_map(&self) -> (ProviderMap, DiagnosticCollector) {
        self.provider_builder().build_with_diagnostics()
    }
}
