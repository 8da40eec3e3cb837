//! Resolver configuration.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::base::constants::HOME_ENV_VAR;

/// Where the resolver looks for documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Root of the bundled definitions (`<root>/plugins/...`). `None` disables
    /// core-definition loading.
    pub core_root: Option<PathBuf>,
    /// Base directory for relative import paths.
    pub working_dir: PathBuf,
    /// Root used for workspace-relative import paths.
    pub workspace_root: PathBuf,
}

impl ResolverConfig {
    /// A configuration without bundled definitions rooted at `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        Self {
            core_root: None,
            workspace_root: working_dir.clone(),
            working_dir,
        }
    }

    /// Reads the bundle root from the `LINKAGE_HOME` environment variable and
    /// uses the process working directory for relative paths.
    pub fn from_env() -> Self {
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut config = Self::new(working_dir);
        config.core_root = core_root_from(std::env::var_os(HOME_ENV_VAR));
        config
    }

    pub fn with_core_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.core_root = Some(root.into());
        self
    }

    pub fn without_core_root(mut self) -> Self {
        self.core_root = None;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = root.into();
        self
    }

    pub fn core_root(&self) -> Option<&Path> {
        self.core_root.as_deref()
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn core_root_from(value: Option<OsString>) -> Option<PathBuf> {
    match value {
        Some(value) if !value.is_empty() => Some(PathBuf::from(value)),
        _ => {
            tracing::error!(
                "{} environment variable not set, no bundled definitions to import",
                HOME_ENV_VAR
            );
            None
        }
    }
}
