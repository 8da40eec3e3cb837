//! Syntax layer tests
//!
//! Parsing of the fixture documents used by the HIR tests.

pub mod tests_documents;
