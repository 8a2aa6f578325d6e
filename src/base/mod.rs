//! Foundation types for the include analyzer.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`IncludeName`] - File identity as a quoted include (`"foo.h"`, `<vector>`)
//! - [`SourceLoc`], [`Location`] - Spelling/expansion positions of uses and declarations
//! - [`LineRange`] - Line span of an existing `#include` or forward declaration
//! - Domain constants (header extensions, system namespaces)
//!
//! This module has NO dependencies on other incwise modules.

pub mod constants;
mod include_name;
mod position;

pub use include_name::{IncludeName, canonical_name, is_header_path, is_quoted_include};
pub use position::{LineRange, Location, SourceLoc};
