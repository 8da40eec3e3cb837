//! Locating and loading documents from disk.

use std::path::{Path, PathBuf};

use smol_str::SmolStr;
use thiserror::Error;

use super::ResolverConfig;
use crate::syntax::{Document, ParseError, parse_document};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Get the file extension of a path, if any.
pub fn get_extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

pub fn has_extension(path: &Path, extension: &str) -> bool {
    get_extension(path) == Some(extension)
}

/// Read a file to a string.
pub fn load_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a document, recording `location` as its owner.
pub fn load_document(path: &Path, location: impl Into<SmolStr>) -> Result<Document, LoadError> {
    let content = load_file(path)?;
    parse_document(&content, location).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Find the file an import path designates.
///
/// Tried in order: the path relative to the working directory (or as-is when
/// absolute), then the path relative to the workspace root. The result is
/// always absolute.
pub fn locate(path: &str, config: &ResolverConfig) -> Option<PathBuf> {
    let raw = Path::new(path);
    let relative = if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        config.working_dir.join(raw)
    };
    if relative.is_file() {
        return Some(absolute(&relative));
    }

    let workspace = config
        .workspace_root
        .join(path.trim_start_matches(['/', '\\']));
    if workspace.is_file() {
        return Some(absolute(&workspace));
    }

    None
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
