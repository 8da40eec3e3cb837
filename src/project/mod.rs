mod config;
pub mod core_scanner;
pub mod file_loader;

pub use config::ResolverConfig;
pub use core_scanner::{CoreEntry, CoreScanner};
pub use file_loader::{LoadError, load_document, locate};
