//! Import resolution with a shared cache.
//!
//! A [`ResolutionContext`] owns everything a session needs to turn import
//! declarations into definitions:
//!
//! - the import cache, keyed by `(path, alias)` per definition kind
//! - the alias table filled by the embedder
//! - the bundled core definitions, scanned at most once per session
//! - the alias indirections (`custom://platforms/<alias>.platform`)
//!
//! Resolution order for a declaration:
//!
//! 1. alias table (when the declaration has an alias)
//! 2. import cache
//! 3. load: bundled definition first, then the file system
//!
//! The context is `Send + Sync`; share it with `Arc` and resolve from any
//! thread. Each piece of state sits behind its own lock and no lock is held
//! while a document is read and parsed, so concurrent misses on the same key
//! may both load it. The last writer wins and both callers get an equivalent
//! definition.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::{SmolStr, format_smolstr};
use uuid::Uuid;

use super::cache::{AliasTable, CacheKey, ImportCache, Indirections};
use super::definition::{DefinitionKind, ResolvedDefinition};
use super::error::{ImportFailure, ResolveError};
use super::scope::{ImportScope, ScopeOrigin};
use crate::base::constants::{
    CORE_LIBRARY_NAMESPACE, CORE_PLATFORM_NAMESPACE, CUSTOM_LIBRARY_NAMESPACE,
    CUSTOM_PLATFORM_NAMESPACE, LIBRARY_EXTENSION, PLATFORM_EXTENSION,
};
use crate::project::{self, CoreScanner, ResolverConfig};
use crate::syntax::{DocumentKind, ImportDeclaration};

pub struct ResolutionContext {
    id: Uuid,
    config: ResolverConfig,
    cache: RwLock<ImportCache>,
    aliases: RwLock<AliasTable>,
    indirections: RwLock<Indirections>,
    ignored_aliases: RwLock<FxHashSet<SmolStr>>,
    core: RwLock<FxHashMap<SmolStr, ResolvedDefinition>>,
    /// Held for the whole scan so that it runs once.
    core_loaded: Mutex<bool>,
    load_count: AtomicUsize,
}

impl ResolutionContext {
    pub fn new(config: ResolverConfig) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!("Resolution session {} created", id);
        Self {
            id,
            config,
            cache: RwLock::new(ImportCache::new()),
            aliases: RwLock::new(AliasTable::new()),
            indirections: RwLock::new(Indirections::new()),
            ignored_aliases: RwLock::new(FxHashSet::default()),
            core: RwLock::new(FxHashMap::default()),
            core_loaded: Mutex::new(false),
            load_count: AtomicUsize::new(0),
        }
    }

    /// A context configured from the environment.
    pub fn from_env() -> Self {
        Self::new(ResolverConfig::from_env())
    }

    /// Session identifier, attached to every resolution span.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    // ========================================================================
    // BUNDLED DEFINITIONS
    // ========================================================================

    /// Scan the bundled definitions unless already done. Returns whether this
    /// call performed the scan.
    ///
    /// The session is marked loaded even when no bundle root is configured,
    /// so a missing bundle is reported once.
    pub fn ensure_core_loaded(&self) -> bool {
        let mut loaded = self.core_loaded.lock();
        if *loaded {
            return false;
        }

        match self.config.core_root() {
            Some(root) => {
                let entries = CoreScanner::new(root).scan();
                let mut core = self.core.write();
                for entry in entries {
                    let kind = entry.document.kind();
                    match ResolvedDefinition::from_document(entry.document) {
                        Some(definition) => {
                            core.insert(entry.location, definition);
                        }
                        None => tracing::error!(
                            "Bundled document {} is an {}, skipping it",
                            entry.location,
                            kind
                        ),
                    }
                }
                tracing::info!("{} bundled definition(s) registered", core.len());
            }
            None => tracing::error!(
                "No bundle root configured, bundled platforms and libraries cannot be imported"
            ),
        }

        *loaded = true;
        true
    }

    pub fn is_core_loaded(&self) -> bool {
        *self.core_loaded.lock()
    }

    /// Bundled definition registered at `location` (`core://...`).
    pub fn core_definition(&self, location: &str) -> Option<ResolvedDefinition> {
        self.core.read().get(location).cloned()
    }

    /// Every bundled definition, sorted by location.
    pub fn core_definitions(&self) -> Vec<ResolvedDefinition> {
        let core = self.core.read();
        let mut entries: Vec<_> = core.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, d)| d.clone()).collect()
    }

    // ========================================================================
    // ALIASES
    // ========================================================================

    /// Bind `alias` to `definition` in the alias table.
    ///
    /// Alias-table entries take precedence over loading for any declaration
    /// with that alias and the same kind. Re-binding an alias to another
    /// definition is logged as a conflict; the new binding wins.
    pub fn register_alias(
        &self,
        alias: impl Into<SmolStr>,
        definition: ResolvedDefinition,
    ) -> Option<ResolvedDefinition> {
        let alias = alias.into();
        let previous = self.aliases.write().bind(alias.clone(), definition.clone());
        if let Some(previous) = &previous {
            if !previous.ptr_eq(&definition) {
                let conflict = ResolveError::AmbiguousAliasConflict {
                    alias,
                    previous: previous.location().into(),
                    replacement: definition.location().into(),
                };
                tracing::warn!("{}", conflict);
            }
        }
        previous
    }

    /// Put a definition in the import cache as if it had been loaded for
    /// `path` and `alias`.
    pub fn register_import(
        &self,
        path: impl Into<SmolStr>,
        alias: Option<&str>,
        definition: ResolvedDefinition,
    ) {
        let key = CacheKey::new(path, alias);
        self.cache.write().insert(key, definition);
    }

    /// Stop creating indirections for `alias`.
    pub fn ignore_alias(&self, alias: impl Into<SmolStr>) {
        self.ignored_aliases.write().insert(alias.into());
    }

    pub fn is_alias_ignored(&self, alias: &str) -> bool {
        self.ignored_aliases.read().contains(alias)
    }

    /// File an alias location currently stands for.
    pub fn alias_location(&self, kind: DefinitionKind, alias: &str) -> Option<PathBuf> {
        let location = alias_uri(kind, alias);
        self.indirections
            .read()
            .target(&location)
            .map(Path::to_path_buf)
    }

    // ========================================================================
    // RESOLUTION
    // ========================================================================

    /// Resolve one import declaration.
    pub fn resolve(
        &self,
        declaration: &ImportDeclaration,
    ) -> Result<ResolvedDefinition, ResolveError> {
        let _span = tracing::debug_span!(
            "resolve",
            session = %self.id,
            path = %declaration.path,
            alias = declaration.alias().unwrap_or("")
        )
        .entered();

        let kind = DefinitionKind::from(declaration.kind);
        if let Some(alias) = declaration.alias() {
            if let Some(definition) = self.aliases.read().get(kind, alias) {
                tracing::trace!("Alias table hit for {}", alias);
                return Ok(definition);
            }
        }

        let key = CacheKey::from(declaration);
        if let Some(definition) = self.cache.read().get(kind, &key) {
            tracing::trace!("Cache hit for {}", declaration);
            return Ok(definition);
        }

        tracing::debug!("{} is not in the cache, loading it", declaration);
        let definition = self.load(declaration, kind).map_err(|reason| {
            let err = ResolveError::unresolved_import(declaration, reason);
            tracing::error!("{}", err);
            err
        })?;
        self.cache.write().insert(key, definition.clone());
        Ok(definition)
    }

    /// Resolve a document's imports, evicting cached entries for imports it
    /// no longer declares. Failed imports are left out of the result.
    pub fn refresh(&self, imports: &[ImportDeclaration]) -> Vec<ResolvedDefinition> {
        self.refresh_results(imports)
            .into_iter()
            .filter_map(Result::ok)
            .collect()
    }

    /// Like [`ResolutionContext::refresh`], with one result per declaration.
    pub fn refresh_results(
        &self,
        imports: &[ImportDeclaration],
    ) -> Vec<Result<ResolvedDefinition, ResolveError>> {
        let keep: FxHashSet<CacheKey> = imports.iter().map(CacheKey::from).collect();
        let evicted = self.cache.write().retain_keys(&keep);
        for (kind, key) in evicted {
            tracing::info!(
                "Removing unused {} import {} (alias={})",
                kind,
                key.path,
                key.alias.as_deref().unwrap_or("none")
            );
        }
        imports.iter().map(|decl| self.resolve(decl)).collect()
    }

    /// Scope of a document with these imports: resolved declarations in
    /// order, then the alias table in registration order.
    pub fn import_scope(&self, imports: &[ImportDeclaration]) -> ImportScope {
        let mut scope = ImportScope::new();
        for (declaration, result) in imports.iter().zip(self.refresh_results(imports)) {
            match result {
                Ok(definition) => scope.push(
                    declaration.alias().map(SmolStr::from),
                    definition,
                    ScopeOrigin::Import,
                ),
                Err(err) => scope.push_failure(declaration.clone(), err),
            }
        }

        let aliases = self.aliases.read();
        for (alias, platform) in aliases.platforms() {
            scope.push(
                Some(alias.clone()),
                ResolvedDefinition::Platform(platform.clone()),
                ScopeOrigin::AliasTable,
            );
        }
        for (alias, library) in aliases.libraries() {
            scope.push(
                Some(alias.clone()),
                ResolvedDefinition::Library(library.clone()),
                ScopeOrigin::AliasTable,
            );
        }
        scope
    }

    /// Replace every cached definition with the same kind and name as
    /// `updated`, under every alias. Returns how many entries changed.
    pub fn update_import(&self, updated: ResolvedDefinition) -> usize {
        let replaced = self.cache.write().replace_named(&updated);
        tracing::info!(
            "Updated {} cached import(s) of {} {}",
            replaced,
            updated.kind(),
            updated.name()
        );
        replaced
    }

    pub fn cached(&self, kind: DefinitionKind, key: &CacheKey) -> Option<ResolvedDefinition> {
        self.cache.read().get(kind, key)
    }

    pub fn cache_keys(&self) -> Vec<(DefinitionKind, CacheKey)> {
        self.cache.read().keys()
    }

    /// Number of documents read from disk for imports so far.
    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::Relaxed)
    }

    /// Drop all session state, bundled definitions included.
    pub fn reset(&self) {
        let mut loaded = self.core_loaded.lock();
        self.core.write().clear();
        self.cache.write().clear();
        self.aliases.write().clear();
        self.indirections.write().clear();
        self.ignored_aliases.write().clear();
        self.load_count.store(0, Ordering::Relaxed);
        *loaded = false;
        tracing::debug!("Resolution session {} reset", self.id);
    }

    // ========================================================================
    // LOADING
    // ========================================================================

    fn load(
        &self,
        declaration: &ImportDeclaration,
        kind: DefinitionKind,
    ) -> Result<ResolvedDefinition, ImportFailure> {
        self.ensure_core_loaded();
        if let Some(definition) = self.core_lookup(declaration, kind) {
            tracing::debug!("{} resolved to a bundled definition", declaration);
            return expect_kind(definition, kind);
        }

        let base = project::locate(&declaration.path, &self.config).ok_or(ImportFailure::NotFound)?;
        let location = match declaration.alias() {
            Some(alias) => self.bind_alias(kind, alias, &base),
            None => {
                self.indirections.write().retire_target(&base);
                SmolStr::from(base.to_string_lossy())
            }
        };

        self.load_count.fetch_add(1, Ordering::Relaxed);
        let document = project::load_document(&base, location)?;
        let found = document.kind();
        match ResolvedDefinition::from_document(document) {
            Some(definition) if definition.kind() == kind => Ok(definition),
            _ => Err(ImportFailure::KindMismatch {
                expected: kind,
                found,
            }),
        }
    }

    fn core_lookup(
        &self,
        declaration: &ImportDeclaration,
        kind: DefinitionKind,
    ) -> Option<ResolvedDefinition> {
        let (namespace, extension) = match kind {
            DefinitionKind::Platform => (CORE_PLATFORM_NAMESPACE, PLATFORM_EXTENSION),
            DefinitionKind::Library => (CORE_LIBRARY_NAMESPACE, LIBRARY_EXTENSION),
        };
        let path = declaration.path.as_str();
        let suffix = format!(".{extension}");
        let location = if path.ends_with(&suffix) {
            format_smolstr!("{namespace}{path}")
        } else {
            format_smolstr!("{namespace}{path}{suffix}")
        };
        self.core.read().get(&location).cloned()
    }

    /// Point the alias location at `base`, retiring stale mappings first, and
    /// return the alias location.
    fn bind_alias(&self, kind: DefinitionKind, alias: &str, base: &Path) -> SmolStr {
        let location = alias_uri(kind, alias);
        if self.is_alias_ignored(alias) {
            tracing::debug!("Alias {} is ignored, no indirection created", alias);
            return location;
        }

        let mut indirections = self.indirections.write();
        indirections.retire_target(base);
        if let Some(previous) = indirections.bind(location.clone(), base.to_path_buf()) {
            let conflict = ResolveError::AmbiguousAliasConflict {
                alias: alias.into(),
                previous: SmolStr::from(previous.to_string_lossy()),
                replacement: SmolStr::from(base.to_string_lossy()),
            };
            tracing::warn!("{}", conflict);
        }
        location
    }
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self::from_env()
    }
}

impl std::fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("cached", &self.cache.read().len())
            .field("aliases", &self.aliases.read().len())
            .finish_non_exhaustive()
    }
}

/// `custom://platforms/<alias>.platform` or `custom://libraries/<alias>.intent`.
fn alias_uri(kind: DefinitionKind, alias: &str) -> SmolStr {
    match kind {
        DefinitionKind::Platform => {
            format_smolstr!("{CUSTOM_PLATFORM_NAMESPACE}{alias}.{PLATFORM_EXTENSION}")
        }
        DefinitionKind::Library => {
            format_smolstr!("{CUSTOM_LIBRARY_NAMESPACE}{alias}.{LIBRARY_EXTENSION}")
        }
    }
}

fn expect_kind(
    definition: ResolvedDefinition,
    expected: DefinitionKind,
) -> Result<ResolvedDefinition, ImportFailure> {
    if definition.kind() == expected {
        return Ok(definition);
    }
    let found = match definition.kind() {
        DefinitionKind::Platform => DocumentKind::Platform,
        DefinitionKind::Library => DocumentKind::Library,
    };
    Err(ImportFailure::KindMismatch { expected, found })
}
