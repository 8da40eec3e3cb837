//! Linking parsed documents against their imports.
//!
//! Each linker builds the document's [`ImportScope`] through the
//! [`ResolutionContext`] (which also refreshes the import cache), binds every
//! cross-reference to a [`Link`] and reports what stayed unresolved.

use std::sync::Arc;

use super::context::ResolutionContext;
use super::diagnostics::{Diagnostic, DiagnosticCollector};
use super::error::ResolveError;
use super::link::Link;
use super::proxy::{ProxyResolver, Relation};
use super::qualified::{EventHandle, EventProviderHandle, ScopeResolver};
use super::scope::ImportScope;
use crate::base::constants::QUALIFIED_SEPARATOR;
use crate::syntax::{
    Document, ExecutionModel, Library, PlatformDefinition, Reference, Transition,
};

// ============================================================================
// LINKED DOCUMENTS
// ============================================================================

#[derive(Clone, Debug)]
pub struct LinkedExecution {
    pub event_providers: Vec<Link<EventProviderHandle>>,
    pub rules: Vec<LinkedRule>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Clone, Debug)]
pub struct LinkedRule {
    pub event: Link<EventHandle>,
    pub transitions: Vec<LinkedTransition>,
}

#[derive(Clone, Debug)]
pub struct LinkedTransition {
    /// Index into the model's states.
    pub state: Link<usize>,
    /// Events read by the guard, without duplicates, in order of first use.
    pub accessed_events: Vec<EventHandle>,
}

impl LinkedExecution {
    pub fn is_fully_resolved(&self) -> bool {
        self.event_providers.iter().all(Link::is_resolved)
            && self.rules.iter().all(|rule| {
                rule.event.is_resolved() && rule.transitions.iter().all(|t| t.state.is_resolved())
            })
    }
}

#[derive(Clone, Debug)]
pub struct LinkedPlatform {
    pub extends: Option<Link<Arc<PlatformDefinition>>>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Clone, Debug)]
pub struct LinkedLibrary {
    /// Per event: the intent it follows, if it declares one.
    pub follows: Vec<Option<Link<usize>>>,
    /// Per event: the intents following it.
    pub followed_by: Vec<Vec<usize>>,
    pub diagnostics: Vec<Diagnostic>,
}

// ============================================================================
// LINKERS
// ============================================================================

/// Link an execution model: used providers, rule events, transition targets
/// and the events read by transition guards.
pub fn link_execution(ctx: &ResolutionContext, model: &ExecutionModel) -> LinkedExecution {
    let _span = tracing::debug_span!("link_execution", location = %model.location).entered();

    let scope = ctx.import_scope(&model.imports);
    let resolver = ScopeResolver::new(&scope);
    let mut diagnostics = DiagnosticCollector::new(model.location.as_str());
    report_failed_imports(&scope, &mut diagnostics);

    let mut event_providers = Vec::with_capacity(model.event_providers.len());
    for reference in &model.event_providers {
        let link = bind(
            &mut diagnostics,
            Relation::ExecutionEventProvider,
            reference,
            |r| resolver.event_provider(r.as_str()).ok().flatten().into_iter().collect(),
        );
        event_providers.push(link);
    }

    let mut rules = Vec::with_capacity(model.rules.len());
    for rule in &model.rules {
        let event = bind(&mut diagnostics, Relation::RuleEvent, &rule.event, |r| {
            resolver.event(r.as_str()).into_iter().collect()
        });
        let transitions = rule
            .transitions
            .iter()
            .map(|transition| link_transition(model, &resolver, &mut diagnostics, transition))
            .collect();
        rules.push(LinkedRule { event, transitions });
    }

    LinkedExecution {
        event_providers,
        rules,
        diagnostics: diagnostics.finish(),
    }
}

fn link_transition(
    model: &ExecutionModel,
    resolver: &ScopeResolver<'_>,
    diagnostics: &mut DiagnosticCollector,
    transition: &Transition,
) -> LinkedTransition {
    let state = bind(diagnostics, Relation::TransitionState, &transition.state, |r| {
        model.state(r.as_str()).map(|(index, _)| index).into_iter().collect()
    });

    let mut accessed_events: Vec<EventHandle> = Vec::new();
    if let Some(condition) = &transition.condition {
        for target in condition.accesses() {
            let link = bind(diagnostics, Relation::ConditionAccess, target, |r| {
                resolver.event(r.as_str()).into_iter().collect()
            });
            if let Link::Resolved(event) = link {
                if !accessed_events.contains(&event) {
                    accessed_events.push(event);
                }
            }
        }
    }

    LinkedTransition {
        state,
        accessed_events,
    }
}

/// Link a platform's `extends` reference.
pub fn link_platform(ctx: &ResolutionContext, platform: &PlatformDefinition) -> LinkedPlatform {
    let _span = tracing::debug_span!("link_platform", location = %platform.location).entered();

    let scope = ctx.import_scope(&platform.imports);
    let resolver = ScopeResolver::new(&scope);
    let mut diagnostics = DiagnosticCollector::new(platform.location.as_str());
    report_failed_imports(&scope, &mut diagnostics);

    let extends = platform.extends.as_ref().map(|reference| {
        bind(&mut diagnostics, Relation::PlatformExtends, reference, |r| {
            resolver.super_platform(r.as_str()).into_iter().collect()
        })
    });

    LinkedPlatform {
        extends,
        diagnostics: diagnostics.finish(),
    }
}

/// Link `follows` between the intents of a library.
///
/// A follows reference names an intent of the same library, bare or
/// qualified with the library name. It is bound only when exactly one intent
/// matches.
pub fn link_library(library: &Library) -> LinkedLibrary {
    let _span = tracing::debug_span!("link_library", location = %library.location).entered();

    let mut diagnostics = DiagnosticCollector::new(library.location.as_str());
    let mut follows = Vec::with_capacity(library.events.len());
    let mut followed_by = vec![Vec::new(); library.events.len()];

    for (index, event) in library.events.iter().enumerate() {
        let link = event.follows().map(|reference| {
            bind(&mut diagnostics, Relation::IntentFollows, reference, |r| {
                follows_candidates(library, r.as_str())
            })
        });
        if let Some(Link::Resolved(target)) = &link {
            followed_by[*target].push(index);
        }
        follows.push(link);
    }

    LinkedLibrary {
        follows,
        followed_by,
        diagnostics: diagnostics.finish(),
    }
}

/// Link any document and return only its diagnostics.
pub fn check_document(ctx: &ResolutionContext, document: &Document) -> Vec<Diagnostic> {
    match document {
        Document::Execution(model) => link_execution(ctx, model).diagnostics,
        Document::Platform(platform) => link_platform(ctx, platform).diagnostics,
        Document::Library(library) => {
            let mut diagnostics = DiagnosticCollector::new(library.location.as_str());
            report_failed_imports(&ctx.import_scope(&library.imports), &mut diagnostics);
            let mut all = diagnostics.finish();
            all.extend(link_library(library).diagnostics);
            all
        }
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Create the link and resolve it now unless the relation is bound eagerly.
fn bind<T>(
    diagnostics: &mut DiagnosticCollector,
    relation: Relation,
    reference: &Reference,
    candidates: impl Fn(&Reference) -> Vec<T>,
) -> Link<T> {
    let link = ProxyResolver::create_link(relation, reference, &candidates);
    let link = if relation.is_bidirectional() {
        link
    } else {
        link.or_else_resolve(|r| candidates(r).into_iter().next())
    };
    if let Link::Unresolved(reference) = &link {
        tracing::debug!(
            "{}",
            ResolveError::unresolved_symbol(relation.target_kind(), reference.text.clone())
        );
        diagnostics.unresolved_link(relation, reference);
    }
    link
}

fn report_failed_imports(scope: &ImportScope, diagnostics: &mut DiagnosticCollector) {
    for failed in scope.failures() {
        diagnostics.invalid_import(&failed.declaration, &failed.error);
    }
}

fn follows_candidates(library: &Library, text: &str) -> Vec<usize> {
    let text = text.trim();
    let name = match text.split_once(QUALIFIED_SEPARATOR) {
        None => text,
        Some((owner, name)) if owner == library.name() && !name.contains(QUALIFIED_SEPARATOR) => {
            name
        }
        Some(_) => return Vec::new(),
    };
    library
        .events
        .iter()
        .enumerate()
        .filter(|(_, event)| event.is_intent() && event.name() == name)
        .map(|(index, _)| index)
        .collect()
}
