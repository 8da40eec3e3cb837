//! Storage behind the resolution context.
//!
//! - [`ImportCache`]: definitions loaded from import declarations, keyed by
//!   `(path, alias)` and kept separately per kind
//! - [`AliasTable`]: definitions registered by the embedder under an alias
//! - [`Indirections`]: alias locations (`custom://platforms/<alias>.platform`)
//!   and the file each one stands for
//!
//! None of these types lock anything; the owning context wraps each one in
//! its own lock.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::definition::{DefinitionKind, ResolvedDefinition};
use crate::syntax::{ImportDeclaration, Library, PlatformDefinition};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Identity of an import in the cache.
///
/// An empty alias and a missing alias are the same key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: SmolStr,
    pub alias: Option<SmolStr>,
}

impl CacheKey {
    pub fn new(path: impl Into<SmolStr>, alias: Option<&str>) -> Self {
        Self {
            path: path.into(),
            alias: alias.filter(|a| !a.is_empty()).map(SmolStr::from),
        }
    }
}

impl From<&ImportDeclaration> for CacheKey {
    fn from(declaration: &ImportDeclaration) -> Self {
        Self::new(declaration.path.clone(), declaration.alias())
    }
}

// ============================================================================
// IMPORT CACHE
// ============================================================================

#[derive(Debug, Default)]
pub struct ImportCache {
    platforms: FxIndexMap<CacheKey, Arc<PlatformDefinition>>,
    libraries: FxIndexMap<CacheKey, Arc<Library>>,
}

impl ImportCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: DefinitionKind, key: &CacheKey) -> Option<ResolvedDefinition> {
        match kind {
            DefinitionKind::Platform => self
                .platforms
                .get(key)
                .map(|p| ResolvedDefinition::Platform(p.clone())),
            DefinitionKind::Library => self
                .libraries
                .get(key)
                .map(|l| ResolvedDefinition::Library(l.clone())),
        }
    }

    /// Store `definition` under `key` in the map for its kind, returning the
    /// replaced entry.
    pub fn insert(
        &mut self,
        key: CacheKey,
        definition: ResolvedDefinition,
    ) -> Option<ResolvedDefinition> {
        match definition {
            ResolvedDefinition::Platform(p) => self
                .platforms
                .insert(key, p)
                .map(ResolvedDefinition::Platform),
            ResolvedDefinition::Library(l) => self
                .libraries
                .insert(key, l)
                .map(ResolvedDefinition::Library),
        }
    }

    /// Drop every entry whose key is not in `keep`, returning what was evicted.
    pub fn retain_keys(&mut self, keep: &FxHashSet<CacheKey>) -> Vec<(DefinitionKind, CacheKey)> {
        let mut evicted = Vec::new();
        self.platforms.retain(|key, _| {
            let kept = keep.contains(key);
            if !kept {
                evicted.push((DefinitionKind::Platform, key.clone()));
            }
            kept
        });
        self.libraries.retain(|key, _| {
            let kept = keep.contains(key);
            if !kept {
                evicted.push((DefinitionKind::Library, key.clone()));
            }
            kept
        });
        evicted
    }

    /// Point every entry with the same kind and name as `updated` at it.
    pub fn replace_named(&mut self, updated: &ResolvedDefinition) -> usize {
        let mut replaced = 0;
        match updated {
            ResolvedDefinition::Platform(new) => {
                for platform in self.platforms.values_mut() {
                    if platform.name() == new.name() {
                        *platform = new.clone();
                        replaced += 1;
                    }
                }
            }
            ResolvedDefinition::Library(new) => {
                for library in self.libraries.values_mut() {
                    if library.name() == new.name() {
                        *library = new.clone();
                        replaced += 1;
                    }
                }
            }
        }
        replaced
    }

    /// Keys per kind, platforms first, each in insertion order.
    pub fn keys(&self) -> Vec<(DefinitionKind, CacheKey)> {
        self.platforms
            .keys()
            .map(|k| (DefinitionKind::Platform, k.clone()))
            .chain(
                self.libraries
                    .keys()
                    .map(|k| (DefinitionKind::Library, k.clone())),
            )
            .collect()
    }

    pub fn len(&self) -> usize {
        self.platforms.len() + self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.platforms.clear();
        self.libraries.clear();
    }
}

// ============================================================================
// ALIAS TABLE
// ============================================================================

/// Alias-keyed definitions, iterated in registration order.
#[derive(Debug, Default)]
pub struct AliasTable {
    platforms: FxIndexMap<SmolStr, Arc<PlatformDefinition>>,
    libraries: FxIndexMap<SmolStr, Arc<Library>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: DefinitionKind, alias: &str) -> Option<ResolvedDefinition> {
        match kind {
            DefinitionKind::Platform => self
                .platforms
                .get(alias)
                .map(|p| ResolvedDefinition::Platform(p.clone())),
            DefinitionKind::Library => self
                .libraries
                .get(alias)
                .map(|l| ResolvedDefinition::Library(l.clone())),
        }
    }

    /// Bind `alias`, returning the definition it was previously bound to.
    pub fn bind(
        &mut self,
        alias: SmolStr,
        definition: ResolvedDefinition,
    ) -> Option<ResolvedDefinition> {
        match definition {
            ResolvedDefinition::Platform(p) => self
                .platforms
                .insert(alias, p)
                .map(ResolvedDefinition::Platform),
            ResolvedDefinition::Library(l) => self
                .libraries
                .insert(alias, l)
                .map(ResolvedDefinition::Library),
        }
    }

    pub fn platforms(&self) -> impl Iterator<Item = (&SmolStr, &Arc<PlatformDefinition>)> {
        self.platforms.iter()
    }

    pub fn libraries(&self) -> impl Iterator<Item = (&SmolStr, &Arc<Library>)> {
        self.libraries.iter()
    }

    pub fn len(&self) -> usize {
        self.platforms.len() + self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.platforms.clear();
        self.libraries.clear();
    }
}

// ============================================================================
// INDIRECTIONS
// ============================================================================

/// Alias location to file mappings.
#[derive(Debug, Default)]
pub struct Indirections {
    targets: FxHashMap<SmolStr, PathBuf>,
}

impl Indirections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self, alias_location: &str) -> Option<&Path> {
        self.targets.get(alias_location).map(PathBuf::as_path)
    }

    /// Map `alias_location` to `base`, returning the previous target.
    pub fn bind(&mut self, alias_location: SmolStr, base: PathBuf) -> Option<PathBuf> {
        self.targets.insert(alias_location, base)
    }

    /// Remove every mapping that points at `base`, returning how many went.
    pub fn retire_target(&mut self, base: &Path) -> usize {
        let before = self.targets.len();
        self.targets.retain(|_, target| target != base);
        before - self.targets.len()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }
}
