//! Analysis tests
//!
//! End-to-end runs of translation units through a session:
//! - Reference scenarios (private headers, forward declarations, instantiations)
//! - Idempotence, minimality and determinism
//! - Include cycles under both cycle policies
//! - Pragmas, associated headers and policy switches
//! - The parallel driver

pub mod tests_cycles;
pub mod tests_driver;
pub mod tests_pragmas;
pub mod tests_properties;
