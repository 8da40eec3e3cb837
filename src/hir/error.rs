//! Error types for import and reference resolution.

use std::fmt;

use smol_str::SmolStr;
use thiserror::Error;

use super::definition::DefinitionKind;
use crate::project::LoadError;
use crate::syntax::{DocumentKind, ImportDeclaration, ParseError};

/// What a failed reference was looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Platform,
    EventProvider,
    Event,
    Intent,
    State,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SymbolKind::Platform => "platform",
            SymbolKind::EventProvider => "event provider",
            SymbolKind::Event => "event",
            SymbolKind::Intent => "intent",
            SymbolKind::State => "state",
        })
    }
}

/// Why an import could not be turned into a definition.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ImportFailure {
    /// Neither a bundled definition nor a file matches the import path.
    #[error("no bundled definition or file matches the path")]
    NotFound,

    /// The document's top-level element is not what the import asked for.
    #[error("expected a {expected} but the document defines a {found}")]
    KindMismatch {
        expected: DefinitionKind,
        found: DocumentKind,
    },

    /// IO error while reading the document.
    #[error("IO error: {0}")]
    Io(String),

    /// The document does not parse.
    #[error("malformed content: {0}")]
    Malformed(ParseError),
}

impl From<LoadError> for ImportFailure {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Io { source, .. } => ImportFailure::Io(source.to_string()),
            LoadError::Parse { source, .. } => ImportFailure::Malformed(source),
        }
    }
}

/// Errors surfaced by the resolver. None of them is fatal: callers treat
/// every variant as "unresolved" and carry on.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Missing file, wrong top-level kind, IO failure or malformed content.
    #[error("cannot resolve import \"{path}\" (alias={}): {reason}", .alias.as_deref().unwrap_or("none"))]
    UnresolvedImport {
        path: SmolStr,
        alias: Option<SmolStr>,
        reason: ImportFailure,
    },

    /// A dotted reference without exactly two non-empty segments.
    #[error("cannot compute a qualified name from '{text}', expected Platform.Provider")]
    MalformedQualifiedName { text: SmolStr },

    /// A name not found among the currently resolved imports.
    #[error("{kind} '{name}' cannot be resolved")]
    UnresolvedSymbol { kind: SymbolKind, name: SmolStr },

    /// An alias re-bound to a different target; the last registration wins.
    #[error("alias '{alias}' re-bound from {previous} to {replacement}")]
    AmbiguousAliasConflict {
        alias: SmolStr,
        previous: SmolStr,
        replacement: SmolStr,
    },
}

impl ResolveError {
    pub fn unresolved_import(declaration: &ImportDeclaration, reason: ImportFailure) -> Self {
        Self::UnresolvedImport {
            path: declaration.path.clone(),
            alias: declaration.alias().map(SmolStr::from),
            reason,
        }
    }

    pub fn unresolved_symbol(kind: SymbolKind, name: impl Into<SmolStr>) -> Self {
        Self::UnresolvedSymbol {
            kind,
            name: name.into(),
        }
    }
}
