//! Placeholder creation for cross-references.
//!
//! Most references start out as lazy placeholders that the linkers resolve
//! later against the import scope. Relations with an opposite end are bound
//! eagerly instead, so that both ends are consistent as soon as the link
//! exists.

use super::error::SymbolKind;
use super::link::Link;
use crate::syntax::Reference;

/// Cross-reference relations the linkers bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `platform P extends Q`
    PlatformExtends,
    /// `use provider Platform.Provider`
    ExecutionEventProvider,
    /// `on Event { ... }`
    RuleEvent,
    /// `-> State`
    TransitionState,
    /// `Event.field` inside a transition condition
    ConditionAccess,
    /// `intent A follows B`
    IntentFollows,
    /// Opposite of [`Relation::IntentFollows`]
    IntentFollowedBy,
}

impl Relation {
    pub fn opposite(self) -> Option<Relation> {
        match self {
            Relation::IntentFollows => Some(Relation::IntentFollowedBy),
            Relation::IntentFollowedBy => Some(Relation::IntentFollows),
            _ => None,
        }
    }

    pub fn is_bidirectional(self) -> bool {
        self.opposite().is_some()
    }

    /// What the reference points at.
    pub fn target_kind(self) -> SymbolKind {
        match self {
            Relation::PlatformExtends => SymbolKind::Platform,
            Relation::ExecutionEventProvider => SymbolKind::EventProvider,
            Relation::RuleEvent | Relation::ConditionAccess => SymbolKind::Event,
            Relation::TransitionState => SymbolKind::State,
            Relation::IntentFollows | Relation::IntentFollowedBy => SymbolKind::Intent,
        }
    }
}

pub struct ProxyResolver;

impl ProxyResolver {
    /// Create the link for `reference` along `relation`.
    ///
    /// For bidirectional relations `candidates` runs immediately and a single
    /// candidate is bound. Zero or several candidates, and every other
    /// relation, give an unresolved placeholder.
    pub fn create_link<T>(
        relation: Relation,
        reference: &Reference,
        candidates: impl FnOnce(&Reference) -> Vec<T>,
    ) -> Link<T> {
        if !relation.is_bidirectional() {
            return Link::Unresolved(reference.clone());
        }

        let mut found = candidates(reference);
        match found.len() {
            1 => Link::from_option(found.pop(), reference),
            0 => {
                tracing::debug!("No candidate for {:?} '{}'", relation, reference.text);
                Link::Unresolved(reference.clone())
            }
            n => {
                tracing::debug!(
                    "{} candidates for {:?} '{}', leaving it unresolved",
                    n,
                    relation,
                    reference.text
                );
                Link::Unresolved(reference.clone())
            }
        }
    }
}
