//! # linkage-base
//!
//! Import resolution and cross-model linking for the platform, intent
//! (library) and execution languages.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! hir       → Import resolution, scopes, linking, diagnostics
//!   ↓
//! project   → Configuration, file loading, bundled definitions
//!   ↓
//! syntax    → Logos lexer, recursive-descent parser, document AST
//!   ↓
//! base      → Primitives (Position, Span, LineIndex, constants)
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → project → hir)
// ============================================================================

/// Foundation types: Position, Span, LineIndex, constants
pub mod base;

/// Syntax: lexer, parser and document AST
pub mod syntax;

/// Project management: configuration, file loading, bundled definitions
pub mod project;

/// High-level IR: import resolution and linking
pub mod hir;

// Re-export foundation types
pub use base::{LineIndex, Position, Span, TextRange, TextSize};

// Re-export the resolution entry points
pub use hir::{
    Diagnostic, ImportScope, Link, ResolutionContext, ResolveError, ResolvedDefinition,
    check_document, link_execution, link_library, link_platform,
};
pub use project::ResolverConfig;
pub use syntax::{Document, ImportDeclaration, ParseError, parse_document};
