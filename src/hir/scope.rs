//! The set of definitions visible from one document.

use std::sync::Arc;

use smol_str::SmolStr;

use super::definition::ResolvedDefinition;
use super::error::ResolveError;
use crate::syntax::{ImportDeclaration, Library, PlatformDefinition};

/// Where a scope entry came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeOrigin {
    /// An import declaration of the document.
    Import,
    /// An alias registered on the context by the embedder.
    AliasTable,
}

#[derive(Clone, Debug)]
pub struct ScopedPlatform {
    pub alias: Option<SmolStr>,
    pub platform: Arc<PlatformDefinition>,
    pub origin: ScopeOrigin,
}

impl ScopedPlatform {
    /// Whether `name` is this platform's name or alias.
    pub fn answers_to(&self, name: &str) -> bool {
        self.platform.name() == name || self.alias.as_deref() == Some(name)
    }
}

#[derive(Clone, Debug)]
pub struct ScopedLibrary {
    pub alias: Option<SmolStr>,
    pub library: Arc<Library>,
    pub origin: ScopeOrigin,
}

/// An import that did not resolve, kept for reporting.
#[derive(Clone, Debug)]
pub struct FailedImport {
    pub declaration: ImportDeclaration,
    pub error: ResolveError,
}

/// Resolved imports of a document, declared imports first and in declaration
/// order, followed by the alias table in registration order.
#[derive(Clone, Debug, Default)]
pub struct ImportScope {
    platforms: Vec<ScopedPlatform>,
    libraries: Vec<ScopedLibrary>,
    failures: Vec<FailedImport>,
}

impl ImportScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ImportScope::push`] for declared imports.
    pub fn with_import(mut self, alias: Option<&str>, definition: ResolvedDefinition) -> Self {
        self.push(alias.map(SmolStr::from), definition, ScopeOrigin::Import);
        self
    }

    pub fn push(
        &mut self,
        alias: Option<SmolStr>,
        definition: ResolvedDefinition,
        origin: ScopeOrigin,
    ) {
        let alias = alias.filter(|a| !a.is_empty());
        match definition {
            ResolvedDefinition::Platform(platform) => self.platforms.push(ScopedPlatform {
                alias,
                platform,
                origin,
            }),
            ResolvedDefinition::Library(library) => self.libraries.push(ScopedLibrary {
                alias,
                library,
                origin,
            }),
        }
    }

    pub fn push_failure(&mut self, declaration: ImportDeclaration, error: ResolveError) {
        self.failures.push(FailedImport { declaration, error });
    }

    pub fn platforms(&self) -> &[ScopedPlatform] {
        &self.platforms
    }

    pub fn libraries(&self) -> &[ScopedLibrary] {
        &self.libraries
    }

    pub fn failures(&self) -> &[FailedImport] {
        &self.failures
    }

    /// First platform whose name or alias is `name`.
    pub fn platform(&self, name: &str) -> Option<&Arc<PlatformDefinition>> {
        self.platforms
            .iter()
            .find(|p| p.answers_to(name))
            .map(|p| &p.platform)
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty() && self.libraries.is_empty()
    }
}
