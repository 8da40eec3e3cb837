//! HIR layer tests
//!
//! Tests for import resolution and linking:
//! - Import resolution through bundle, files and aliases
//! - Cache refresh and update propagation
//! - Qualified name lookups
//! - Linking and diagnostics

pub mod tests_import_resolution;
pub mod tests_linking;
