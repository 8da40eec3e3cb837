//! High-level IR (HIR) - Import resolution and cross-model linking.
//!
//! This module turns import declarations into shared definitions and binds
//! the references of each document against them.
//!
//! ## Key Types
//!
//! - [`ResolutionContext`] - Import cache, alias table and bundled definitions
//! - [`ResolvedDefinition`] - A loaded platform or library
//! - [`ImportScope`] - Definitions visible from one document
//! - [`ScopeResolver`] - Provider, event and super-platform lookups
//! - [`Link`] - A resolved or unresolved reference
//!
//! ## Layers
//!
//! ```text
//! ImportDeclaration          ← from syntax
//!     │
//!     ▼
//! ResolutionContext::resolve ← alias table → cache → bundle → file system
//!     │
//!     ▼
//! ImportScope                ← per document, declared order + alias table
//!     │
//!     ▼
//! ScopeResolver              ← Platform.Provider, events, extends
//!     │
//!     ▼
//! link_* / check_document    ← Links + diagnostics
//! ```

mod cache;
mod context;
mod definition;
mod diagnostics;
mod error;
mod link;
mod linker;
mod proxy;
mod qualified;
mod scope;

pub use cache::{AliasTable, CacheKey, ImportCache, Indirections};
pub use context::ResolutionContext;
pub use definition::{DefinitionKind, ResolvedDefinition};
pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity, codes};
pub use error::{ImportFailure, ResolveError, SymbolKind};
pub use link::Link;
pub use linker::{
    LinkedExecution, LinkedLibrary, LinkedPlatform, LinkedRule, LinkedTransition, check_document,
    link_execution, link_library, link_platform,
};
pub use proxy::{ProxyResolver, Relation};
pub use qualified::{
    EventHandle, EventProviderHandle, ScopeResolver, resolve_event, resolve_event_provider,
    resolve_extends, split_qualified,
};
pub use scope::{FailedImport, ImportScope, ScopeOrigin, ScopedLibrary, ScopedPlatform};
