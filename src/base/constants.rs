//! Domain constants shared by every layer.

/// Extension of platform definition documents.
pub const PLATFORM_EXTENSION: &str = "platform";

/// Extension of intent library documents.
pub const LIBRARY_EXTENSION: &str = "intent";

/// Environment variable naming the root directory of bundled definitions.
pub const HOME_ENV_VAR: &str = "LINKAGE_HOME";

/// Directory (relative to the bundle root) holding bundled platforms.
pub const CORE_PLATFORMS_DIR: &str = "plugins/platforms";

/// Directory (relative to the bundle root) holding bundled libraries.
pub const CORE_LIBRARIES_DIR: &str = "plugins/libraries";

/// Namespace under which bundled platforms are registered.
pub const CORE_PLATFORM_NAMESPACE: &str = "core://platforms/";

/// Namespace under which bundled libraries are registered.
pub const CORE_LIBRARY_NAMESPACE: &str = "core://libraries/";

/// Namespace of alias indirections for platforms imported with `as`.
pub const CUSTOM_PLATFORM_NAMESPACE: &str = "custom://platforms/";

/// Namespace of alias indirections for libraries imported with `as`.
pub const CUSTOM_LIBRARY_NAMESPACE: &str = "custom://libraries/";

/// Separator of `Platform.Provider` references.
pub const QUALIFIED_SEPARATOR: char = '.';
