//! Provider Map: who is allowed to provide what.
//!
//! ## Key Types
//!
//! - [`ProviderMap`]: read-only mapping shared across translation units
//! - [`PragmaOverlay`]: per-unit facts from pragmas and path conventions
//! - [`ProviderView`]: the two combined; answers every provider question
//! - [`PathMatcher`]: exact, glob or regex `from` patterns
//!
//! Mapping files are loaded through [`MappingLoader`] when the
//! `mapping-files` feature is enabled.

pub mod builtin;
mod map;
#[cfg(feature = "mapping-files")]
mod mapping_file;
mod overlay;
mod pattern;

pub use map::{
    ProviderEdge, ProviderMap, ProviderMapBuilder, ProviderView, Resolved, ResolutionStep,
    Visibility,
};
#[cfg(feature = "mapping-files")]
pub use mapping_file::{
    ExplicitMapping, MappingEntry, MappingFormat, MappingLoader, parse_mapping_text,
};
pub use overlay::PragmaOverlay;
pub use pattern::{
    ExactMatcher, GlobMatcher, MatchKind, PathMatcher, PatternError, RegexMatcher, compile,
};
