//! Diagnostics for links that did not resolve.
//!
//! Every unresolved reference is reported against the document that holds
//! it, with the raw reference text attached as `data` so that editors can
//! offer quick fixes.

use std::sync::Arc;

use super::error::ResolveError;
use super::proxy::Relation;
use crate::base::Span;
use crate::syntax::{ImportDeclaration, Reference};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Location of the document containing this diagnostic.
    pub location: Arc<str>,
    /// Source range (0-indexed lines and columns).
    pub span: Span,
    /// Severity level.
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// The offending text, for quick fixes.
    pub data: Option<Arc<str>>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(location: impl Into<Arc<str>>, span: Span, message: impl Into<Arc<str>>) -> Self {
        Self {
            location: location.into(),
            span,
            severity: Severity::Error,
            code: None,
            message: message.into(),
            data: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(
        location: impl Into<Arc<str>>,
        span: Span,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(location, span, message)
        }
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the offending text.
    pub fn with_data(mut self, data: impl Into<Arc<str>>) -> Self {
        self.data = Some(data.into());
        self
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Stable diagnostic codes.
pub mod codes {
    /// Undefined reference (name not found).
    pub const UNDEFINED_REFERENCE: &str = "E0001";
    /// Invalid import statement.
    pub const INVALID_IMPORT: &str = "E0014";
    /// Transition target is not a state of the model.
    pub const STATE_NOT_RESOLVED: &str = "E0015";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics while linking a document.
#[derive(Clone, Debug)]
pub struct DiagnosticCollector {
    location: Arc<str>,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create an empty collector for the document at `location`.
    pub fn new(location: impl Into<Arc<str>>) -> Self {
        Self {
            location: location.into(),
            diagnostics: Vec::new(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Report a reference that stayed unresolved after linking.
    ///
    /// Transition targets get their own code and message; every other
    /// relation is reported as an undefined reference.
    pub fn unresolved_link(&mut self, relation: Relation, reference: &Reference) {
        let diagnostic = match relation {
            Relation::TransitionState => Diagnostic::error(
                self.location.clone(),
                reference.span,
                format!("{} cannot be resolved to a State", reference.text),
            )
            .with_code(codes::STATE_NOT_RESOLVED),
            _ => Diagnostic::error(
                self.location.clone(),
                reference.span,
                format!("undefined reference: '{}'", reference.text),
            )
            .with_code(codes::UNDEFINED_REFERENCE),
        };
        self.add(diagnostic.with_data(reference.text.as_str()));
    }

    /// Report an import that did not load.
    pub fn invalid_import(&mut self, declaration: &ImportDeclaration, error: &ResolveError) {
        self.add(
            Diagnostic::error(self.location.clone(), declaration.span, error.to_string())
                .with_code(codes::INVALID_IMPORT)
                .with_data(declaration.path.as_str()),
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Consume the collector, sorted by position.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.diagnostics.sort_by_key(|d| d.span.start);
        self.diagnostics
    }
}
