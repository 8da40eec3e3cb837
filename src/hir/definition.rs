//! Resolved definitions: the closed set of things an import can produce.

use std::fmt;
use std::sync::Arc;

use crate::syntax::{Document, ImportDeclaration, ImportKind, Library, PlatformDefinition};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Platform,
    Library,
}

impl From<ImportKind> for DefinitionKind {
    fn from(kind: ImportKind) -> Self {
        match kind {
            ImportKind::Platform => DefinitionKind::Platform,
            ImportKind::Library => DefinitionKind::Library,
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DefinitionKind::Platform => "platform",
            DefinitionKind::Library => "library",
        })
    }
}

/// A loaded platform or library, shared between every import pointing at it.
///
/// Cloning is cheap. Two values are the *same* cached instance when
/// [`ResolvedDefinition::ptr_eq`] holds; `==` compares contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedDefinition {
    Platform(Arc<PlatformDefinition>),
    Library(Arc<Library>),
}

impl ResolvedDefinition {
    /// Wrap a parsed document; execution models are not importable.
    pub fn from_document(document: Document) -> Option<Self> {
        match document {
            Document::Platform(platform) => Some(Self::Platform(Arc::new(platform))),
            Document::Library(library) => Some(Self::Library(Arc::new(library))),
            Document::Execution(_) => None,
        }
    }

    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::Platform(_) => DefinitionKind::Platform,
            Self::Library(_) => DefinitionKind::Library,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Platform(platform) => platform.name(),
            Self::Library(library) => library.name(),
        }
    }

    /// Location of the owning document.
    pub fn location(&self) -> &str {
        match self {
            Self::Platform(platform) => &platform.location,
            Self::Library(library) => &library.location,
        }
    }

    pub fn imports(&self) -> &[ImportDeclaration] {
        match self {
            Self::Platform(platform) => &platform.imports,
            Self::Library(library) => &library.imports,
        }
    }

    pub fn as_platform(&self) -> Option<&Arc<PlatformDefinition>> {
        match self {
            Self::Platform(platform) => Some(platform),
            Self::Library(_) => None,
        }
    }

    pub fn as_library(&self) -> Option<&Arc<Library>> {
        match self {
            Self::Library(library) => Some(library),
            Self::Platform(_) => None,
        }
    }

    /// Whether both values are the same shared instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Platform(a), Self::Platform(b)) => Arc::ptr_eq(a, b),
            (Self::Library(a), Self::Library(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<PlatformDefinition> for ResolvedDefinition {
    fn from(platform: PlatformDefinition) -> Self {
        Self::Platform(Arc::new(platform))
    }
}

impl From<Library> for ResolvedDefinition {
    fn from(library: Library) -> Self {
        Self::Library(Arc::new(library))
    }
}
