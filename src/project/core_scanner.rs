//! Directory walk over the bundled definitions.
//!
//! Bundled platforms live under `<root>/plugins/platforms/**/*.platform` and
//! bundled libraries under `<root>/plugins/libraries/**/*.intent`. Every file
//! is registered under the core namespace by file name, so that
//! `import platform "CorePlatform"` finds `core://platforms/CorePlatform.platform`.
//!
//! Failures never abort the scan: an unreadable directory entry or a file that
//! does not parse is logged and skipped.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use smol_str::{SmolStr, format_smolstr};
use walkdir::WalkDir;

use super::file_loader;
use crate::base::constants::{
    CORE_LIBRARIES_DIR, CORE_LIBRARY_NAMESPACE, CORE_PLATFORM_NAMESPACE, CORE_PLATFORMS_DIR,
    LIBRARY_EXTENSION, PLATFORM_EXTENSION,
};
use crate::syntax::Document;

/// A parsed bundled document and the core location it is registered under.
#[derive(Clone, Debug)]
pub struct CoreEntry {
    pub location: SmolStr,
    pub document: Document,
}

/// Scans a bundle root for platforms and libraries.
pub struct CoreScanner {
    root: PathBuf,
}

impl CoreScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the bundle and parse every platform and library found.
    pub fn scan(&self) -> Vec<CoreEntry> {
        let mut entries = self.scan_dir(
            CORE_PLATFORMS_DIR,
            PLATFORM_EXTENSION,
            CORE_PLATFORM_NAMESPACE,
        );
        entries.extend(self.scan_dir(CORE_LIBRARIES_DIR, LIBRARY_EXTENSION, CORE_LIBRARY_NAMESPACE));
        tracing::debug!(
            "Scanned {} bundled definition(s) under {}",
            entries.len(),
            self.root.display()
        );
        entries
    }

    fn scan_dir(&self, dir: &str, extension: &str, namespace: &str) -> Vec<CoreEntry> {
        let files = collect_files(&self.root.join(dir), extension);

        // Parse files in parallel
        files
            .par_iter()
            .filter_map(|path| {
                let file_name = path.file_name()?.to_string_lossy();
                let location = format_smolstr!("{namespace}{file_name}");
                match file_loader::load_document(path, location.clone()) {
                    Ok(document) => {
                        tracing::debug!("Bundled {} loaded ({})", file_name, location);
                        Some(CoreEntry { location, document })
                    }
                    Err(e) => {
                        tracing::error!("An error occurred when loading the bundled file: {}", e);
                        None
                    }
                }
            })
            .collect()
    }
}

/// Recursively collect files with `extension` under `dir`, sorted by path.
pub fn collect_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::error!("Cannot walk {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| file_loader::has_extension(path, extension))
        .collect();
    files.sort();
    files
}
