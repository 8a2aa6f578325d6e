//! Domain constants shared across the analyzer.

/// Header extensions stripped when computing canonical names.
pub const HEADER_EXTENSIONS: &[&str] = &["h", "H", "hpp", "hxx", "hh", "inl"];

/// Extensions of source files. Anything else counts as a header, since
/// standard headers have no extension at all.
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "C", "cc", "CC", "cxx", "CXX", "cpp", "CPP", "c++", "C++", "cp"];

/// Generated or textual artifacts that are included but never analyzed.
/// Includes of these are always retained.
pub const OPAQUE_EXTENSIONS: &[&str] = &["moc", "inc", "def", "gen"];

/// Suffixes of test files that share an associated header with their
/// implementation (`foo_test.cc` pairs with `foo.h`).
pub const TEST_SUFFIXES: &[&str] = &["_unittest", "_regtest", "_test"];

/// Suffix marking an inline-definitions header (`foo-inl.h`).
pub const INLINE_SUFFIX: &str = "-inl";

/// Namespaces whose symbols are never forward-declared.
pub const DEFAULT_SYSTEM_NAMESPACES: &[&str] = &["std", "__gnu_cxx"];

