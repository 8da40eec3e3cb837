//! Foundation types for the linkage toolchain.
//!
//! This module provides fundamental types used throughout the resolver:
//! - [`Position`], [`Span`] - Line/column positions for document nodes
//! - [`LineIndex`] - Byte offset to line/column conversion
//! - Domain constants (file extensions, namespaces, environment variable)
//!
//! This module has NO dependencies on other linkage modules.

pub mod constants;
mod line_index;
mod position;

pub use line_index::LineIndex;
pub use position::{Position, Span};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
