//! Provider tests
//!
//! - Built-in tables and user mappings resolved through [`ProviderMap`]
//! - Mapping files in YAML and JSON, with `ref`s and their failure modes

#[cfg(feature = "mapping-files")]
pub mod tests_mapping_files;
pub mod tests_provider_map;
