//! Diagnostic assertion helpers.

use linkage::hir::{Diagnostic, Severity};
use linkage::{ResolutionContext, check_document, parse_document};

/// Parse `source` and return its linking diagnostics.
pub fn diagnostics_for(ctx: &ResolutionContext, source: &str) -> Vec<Diagnostic> {
    let document = parse_document(source, "test.execution").unwrap();
    check_document(ctx, &document)
}

/// Get only error-level diagnostics.
pub fn errors_for(ctx: &ResolutionContext, source: &str) -> Vec<Diagnostic> {
    diagnostics_for(ctx, source)
        .into_iter()
        .filter(|d| d.severity == Severity::Error)
        .collect()
}

/// Assert a source links without errors.
pub fn assert_no_errors(ctx: &ResolutionContext, source: &str) {
    let errors = errors_for(ctx, source);
    assert!(
        errors.is_empty(),
        "Expected no errors, got {} error(s):\n{}",
        errors.len(),
        errors
            .iter()
            .map(|e| format!("  Line {}: {}", e.span.start.line + 1, e.message))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Assert exactly one diagnostic carries `code` and return it.
pub fn assert_single_code<'a>(diagnostics: &'a [Diagnostic], code: &str) -> &'a Diagnostic {
    let matching: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.code.as_deref() == Some(code))
        .collect();
    assert_eq!(
        matching.len(),
        1,
        "Expected one {code} diagnostic, got: {diagnostics:?}"
    );
    matching[0]
}
