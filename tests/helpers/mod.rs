//! Shared test helpers
//!
//! - `unit_builder`: fluent construction of translation units
//! - `report_assertions`: readable checks on add/remove/full lists

#![allow(dead_code)]

pub mod report_assertions;
pub mod unit_builder;
