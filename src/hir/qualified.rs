//! Name resolution against an [`ImportScope`].
//!
//! Three lookups are supported:
//!
//! - event providers by `Platform.Provider`, where `Platform` is a platform
//!   name or an import alias
//! - events by bare name, libraries first then platform providers, first
//!   match wins
//! - super-platforms by name or alias, first match wins
//!
//! Nothing here loads documents: the scope already holds every visible
//! definition.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use smol_str::SmolStr;

use super::error::ResolveError;
use super::scope::ImportScope;
use crate::base::constants::QUALIFIED_SEPARATOR;
use crate::syntax::{EventDefinition, EventProviderDefinition, Library, PlatformDefinition};

// ============================================================================
// HANDLES
// ============================================================================

/// An event provider inside a shared platform.
#[derive(Clone, Debug)]
pub struct EventProviderHandle {
    platform: Arc<PlatformDefinition>,
    index: usize,
}

impl EventProviderHandle {
    pub fn platform(&self) -> &Arc<PlatformDefinition> {
        &self.platform
    }

    pub fn definition(&self) -> &EventProviderDefinition {
        &self.platform.providers[self.index]
    }

    pub fn name(&self) -> &str {
        self.definition().name()
    }

    /// `Platform.Provider` using the platform's own name.
    pub fn qualified_name(&self) -> String {
        format!(
            "{}{}{}",
            self.platform.name(),
            QUALIFIED_SEPARATOR,
            self.name()
        )
    }
}

impl PartialEq for EventProviderHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.platform, &other.platform) && self.index == other.index
    }
}

impl Eq for EventProviderHandle {}

/// An event or intent inside a shared library or platform.
#[derive(Clone, Debug)]
pub enum EventHandle {
    Library {
        library: Arc<Library>,
        index: usize,
    },
    Platform {
        platform: Arc<PlatformDefinition>,
        provider: usize,
        index: usize,
    },
}

impl EventHandle {
    pub fn definition(&self) -> &EventDefinition {
        match self {
            EventHandle::Library { library, index } => &library.events[*index],
            EventHandle::Platform {
                platform,
                provider,
                index,
            } => &platform.providers[*provider].events[*index],
        }
    }

    pub fn name(&self) -> &str {
        self.definition().name()
    }

    /// Name of the library or platform defining the event.
    pub fn owner_name(&self) -> &str {
        match self {
            EventHandle::Library { library, .. } => library.name(),
            EventHandle::Platform { platform, .. } => platform.name(),
        }
    }

    pub fn is_from_library(&self) -> bool {
        matches!(self, EventHandle::Library { .. })
    }

    fn identity(&self) -> (usize, usize, usize) {
        match self {
            EventHandle::Library { library, index } => {
                (Arc::as_ptr(library) as usize, usize::MAX, *index)
            }
            EventHandle::Platform {
                platform,
                provider,
                index,
            } => (Arc::as_ptr(platform) as usize, *provider, *index),
        }
    }
}

impl PartialEq for EventHandle {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for EventHandle {}

impl Hash for EventHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Split `Platform.Provider` into its two segments.
///
/// Surrounding whitespace is ignored. Anything but exactly two non-empty
/// segments is a [`ResolveError::MalformedQualifiedName`].
pub fn split_qualified(text: &str) -> Result<(&str, &str), ResolveError> {
    let mut segments = text.trim().split(QUALIFIED_SEPARATOR);
    match (segments.next(), segments.next(), segments.next()) {
        (Some(platform), Some(provider), None) if !platform.is_empty() && !provider.is_empty() => {
            Ok((platform, provider))
        }
        _ => {
            tracing::warn!("Cannot compute a qualified name from '{}'", text);
            Err(ResolveError::MalformedQualifiedName {
                text: SmolStr::from(text),
            })
        }
    }
}

/// Resolves names against one document's scope.
pub struct ScopeResolver<'a> {
    scope: &'a ImportScope,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(scope: &'a ImportScope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> &'a ImportScope {
        self.scope
    }

    /// Resolve `Platform.Provider`.
    ///
    /// `Ok(None)` when the name is well-formed but nothing matches.
    pub fn event_provider(&self, text: &str) -> Result<Option<EventProviderHandle>, ResolveError> {
        let (platform_name, provider_name) = split_qualified(text)?;
        let Some(platform) = self.scope.platform(platform_name) else {
            tracing::debug!("No platform '{}' in scope", platform_name);
            return Ok(None);
        };
        Ok(platform
            .providers
            .iter()
            .position(|p| p.name() == provider_name)
            .map(|index| EventProviderHandle {
                platform: platform.clone(),
                index,
            }))
    }

    /// Resolve an event by bare name.
    ///
    /// Libraries are searched before platform providers, each in scope order,
    /// and the first match wins even if later imports define the same name.
    pub fn event(&self, name: &str) -> Option<EventHandle> {
        for scoped in self.scope.libraries() {
            if let Some(index) = scoped.library.events.iter().position(|e| e.name() == name) {
                return Some(EventHandle::Library {
                    library: scoped.library.clone(),
                    index,
                });
            }
        }
        for scoped in self.scope.platforms() {
            for (provider, definition) in scoped.platform.providers.iter().enumerate() {
                if let Some(index) = definition.events.iter().position(|e| e.name() == name) {
                    return Some(EventHandle::Platform {
                        platform: scoped.platform.clone(),
                        provider,
                        index,
                    });
                }
            }
        }
        None
    }

    /// Resolve the platform a platform extends.
    pub fn super_platform(&self, name: &str) -> Option<Arc<PlatformDefinition>> {
        self.scope.platform(name.trim()).cloned()
    }
}

/// Resolve `Platform.Provider` in `scope`.
pub fn resolve_event_provider(
    scope: &ImportScope,
    text: &str,
) -> Result<Option<EventProviderHandle>, ResolveError> {
    ScopeResolver::new(scope).event_provider(text)
}

/// Resolve an event by name in `scope`, first match wins.
pub fn resolve_event(scope: &ImportScope, name: &str) -> Option<EventHandle> {
    ScopeResolver::new(scope).event(name)
}

/// Resolve a super-platform by name or alias in `scope`.
pub fn resolve_extends(scope: &ImportScope, name: &str) -> Option<Arc<PlatformDefinition>> {
    ScopeResolver::new(scope).super_platform(name)
}
