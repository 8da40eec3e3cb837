//! Explicit resolved/unresolved references.

use crate::syntax::Reference;

/// A reference after linking: either bound to its target or still holding
/// the raw text that failed to resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Link<T> {
    Resolved(T),
    Unresolved(Reference),
}

impl<T> Link<T> {
    pub fn from_option(target: Option<T>, reference: &Reference) -> Self {
        match target {
            Some(target) => Link::Resolved(target),
            None => Link::Unresolved(reference.clone()),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Link::Resolved(_))
    }

    pub fn resolved(&self) -> Option<&T> {
        match self {
            Link::Resolved(target) => Some(target),
            Link::Unresolved(_) => None,
        }
    }

    pub fn unresolved(&self) -> Option<&Reference> {
        match self {
            Link::Resolved(_) => None,
            Link::Unresolved(reference) => Some(reference),
        }
    }

    pub fn into_resolved(self) -> Option<T> {
        match self {
            Link::Resolved(target) => Some(target),
            Link::Unresolved(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Link<U> {
        match self {
            Link::Resolved(target) => Link::Resolved(f(target)),
            Link::Unresolved(reference) => Link::Unresolved(reference),
        }
    }

    /// Resolve a pending placeholder with `resolve`; resolved links are kept.
    pub fn or_else_resolve(self, resolve: impl FnOnce(&Reference) -> Option<T>) -> Self {
        match self {
            Link::Resolved(target) => Link::Resolved(target),
            Link::Unresolved(reference) => match resolve(&reference) {
                Some(target) => Link::Resolved(target),
                None => Link::Unresolved(reference),
            },
        }
    }
}
