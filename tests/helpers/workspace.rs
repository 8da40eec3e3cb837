//! Temporary workspace with a bundle root and a working directory.

use std::fs;
use std::path::{Path, PathBuf};

use linkage::ResolutionContext;
use linkage::base::constants::{CORE_LIBRARIES_DIR, CORE_PLATFORMS_DIR};
use linkage::project::ResolverConfig;
use tempfile::TempDir;

use super::source_fixtures::{CORE_LIBRARY, CORE_PLATFORM};

pub struct TestWorkspace {
    _dir: TempDir,
    bundle: PathBuf,
    work: PathBuf,
}

impl TestWorkspace {
    /// An empty workspace with an empty bundle.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let bundle = dir.path().join("bundle");
        let work = dir.path().join("work");
        fs::create_dir_all(bundle.join(CORE_PLATFORMS_DIR)).unwrap();
        fs::create_dir_all(bundle.join(CORE_LIBRARIES_DIR)).unwrap();
        fs::create_dir_all(&work).unwrap();
        Self {
            _dir: dir,
            bundle,
            work,
        }
    }

    /// A workspace whose bundle holds `CorePlatform` and `CoreLibrary`.
    pub fn with_core() -> Self {
        let workspace = Self::new();
        workspace.add_core_platform("CorePlatform", CORE_PLATFORM);
        workspace.add_core_library("CoreLibrary", CORE_LIBRARY);
        workspace
    }

    pub fn work(&self) -> &Path {
        &self.work
    }

    pub fn add_core_platform(&self, name: &str, source: &str) {
        fs::write(
            self.bundle
                .join(CORE_PLATFORMS_DIR)
                .join(format!("{name}.platform")),
            source,
        )
        .unwrap();
    }

    pub fn add_core_library(&self, name: &str, source: &str) {
        fs::write(
            self.bundle
                .join(CORE_LIBRARIES_DIR)
                .join(format!("{name}.intent")),
            source,
        )
        .unwrap();
    }

    /// Write a file relative to the working directory.
    pub fn add_file(&self, relative: &str, source: &str) -> PathBuf {
        let path = self.work.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, source).unwrap();
        path
    }

    pub fn config(&self) -> ResolverConfig {
        ResolverConfig::new(&self.work).with_core_root(&self.bundle)
    }

    pub fn context(&self) -> ResolutionContext {
        ResolutionContext::new(self.config())
    }
}
