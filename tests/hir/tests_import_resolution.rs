//! Import resolution tests for the HIR layer.

use linkage::hir::{CacheKey, DefinitionKind, ImportFailure, ResolveError};
use linkage::{ImportDeclaration, ResolvedDefinition, parse_document};

use crate::helpers::source_fixtures::*;
use crate::helpers::workspace::TestWorkspace;

fn parsed(source: &str, location: &str) -> ResolvedDefinition {
    ResolvedDefinition::from_document(parse_document(source, location).unwrap()).unwrap()
}

// =============================================================================
// LOOKUP ORDER
// =============================================================================

#[test]
fn test_bundled_platform_by_bare_name() {
    let workspace = TestWorkspace::with_core();
    let ctx = workspace.context();

    let core = ctx.resolve(&ImportDeclaration::platform("CorePlatform")).unwrap();
    assert_eq!(core.name(), "CorePlatform");
    assert_eq!(core.location(), "core://platforms/CorePlatform.platform");
    assert_eq!(ctx.load_count(), 0);
}

#[test]
fn test_bundled_library_with_extension() {
    let workspace = TestWorkspace::with_core();
    let ctx = workspace.context();

    let core = ctx
        .resolve(&ImportDeclaration::library("CoreLibrary.intent"))
        .unwrap();
    assert_eq!(core.kind(), DefinitionKind::Library);
    assert_eq!(core.location(), "core://libraries/CoreLibrary.intent");
}

#[test]
fn test_bundle_shadows_workspace_file() {
    let workspace = TestWorkspace::with_core();
    workspace.add_file("CorePlatform.platform", "platform Shadow");
    let ctx = workspace.context();

    let def = ctx
        .resolve(&ImportDeclaration::platform("CorePlatform.platform"))
        .unwrap();
    assert_eq!(def.name(), "CorePlatform");
}

#[test]
fn test_relative_path_from_working_dir() {
    let workspace = TestWorkspace::new();
    workspace.add_file("platforms/Slack.platform", SLACK_PLATFORM);
    let ctx = workspace.context();

    let def = ctx
        .resolve(&ImportDeclaration::platform("platforms/Slack.platform"))
        .unwrap();
    assert_eq!(def.name(), "Slack");
    assert!(std::path::Path::new(def.location()).is_absolute());
}

#[test]
fn test_workspace_relative_path() {
    let workspace = TestWorkspace::new();
    workspace.add_file("shared/Calendar.platform", CALENDAR_PLATFORM);
    let config = workspace
        .config()
        .with_working_dir(workspace.work().join("elsewhere"))
        .with_workspace_root(workspace.work());
    let ctx = linkage::ResolutionContext::new(config);

    let def = ctx
        .resolve(&ImportDeclaration::platform("/shared/Calendar.platform"))
        .unwrap();
    assert_eq!(def.name(), "Calendar");
}

#[test]
fn test_absolute_path() {
    let workspace = TestWorkspace::new();
    let path = workspace.add_file("Calendar.platform", CALENDAR_PLATFORM);
    let ctx = workspace.context();

    let def = ctx
        .resolve(&ImportDeclaration::platform(&*path.to_string_lossy()))
        .unwrap();
    assert_eq!(def.name(), "Calendar");
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn test_missing_file() {
    let workspace = TestWorkspace::with_core();
    let ctx = workspace.context();

    let err = ctx
        .resolve(&ImportDeclaration::platform("Nowhere.platform").with_alias("n"))
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::UnresolvedImport {
            path: "Nowhere.platform".into(),
            alias: Some("n".into()),
            reason: ImportFailure::NotFound,
        }
    );
    assert!(ctx.cache_keys().is_empty());
}

#[test]
fn test_library_imported_as_platform() {
    let workspace = TestWorkspace::new();
    workspace.add_file("Greetings.intent", GREETINGS_LIBRARY);
    let ctx = workspace.context();

    let err = ctx
        .resolve(&ImportDeclaration::platform("Greetings.intent"))
        .unwrap_err();
    assert!(matches!(
        err,
        ResolveError::UnresolvedImport {
            reason: ImportFailure::KindMismatch { .. },
            ..
        }
    ));
}

#[test]
fn test_execution_model_is_not_importable() {
    let workspace = TestWorkspace::new();
    workspace.add_file("bot.execution", CALENDAR_BOT);
    let ctx = workspace.context();

    assert!(ctx.resolve(&ImportDeclaration::library("bot.execution")).is_err());
}

#[test]
fn test_failure_is_retried_after_fix() {
    let workspace = TestWorkspace::new();
    let ctx = workspace.context();
    let decl = ImportDeclaration::platform("Calendar.platform");

    assert!(ctx.refresh(std::slice::from_ref(&decl)).is_empty());
    workspace.add_file("Calendar.platform", CALENDAR_PLATFORM);
    let defs = ctx.refresh(std::slice::from_ref(&decl));
    assert_eq!(defs.len(), 1);
}

// =============================================================================
// ALIASES
// =============================================================================

#[test]
fn test_alias_table_takes_precedence() {
    let workspace = TestWorkspace::new();
    workspace.add_file("Slack.platform", SLACK_PLATFORM);
    let ctx = workspace.context();
    let registered = parsed("platform Teams", "embedder://teams");
    ctx.register_alias("chat", registered.clone());

    let def = ctx
        .resolve(&ImportDeclaration::platform("Slack.platform").with_alias("chat"))
        .unwrap();
    assert!(def.ptr_eq(&registered));

    let unaliased = ctx
        .resolve(&ImportDeclaration::platform("Slack.platform"))
        .unwrap();
    assert_eq!(unaliased.name(), "Slack");
}

#[test]
fn test_alias_rebinding_last_wins() {
    let workspace = TestWorkspace::new();
    let ctx = workspace.context();
    let first = parsed("platform Teams", "a");
    let second = parsed("platform Discord", "b");

    assert!(ctx.register_alias("chat", first).is_none());
    let previous = ctx.register_alias("chat", second.clone()).unwrap();
    assert_eq!(previous.name(), "Teams");

    let def = ctx
        .resolve(&ImportDeclaration::platform("anything").with_alias("chat"))
        .unwrap();
    assert!(def.ptr_eq(&second));
}

#[test]
fn test_same_path_different_alias_is_a_different_entry() {
    let workspace = TestWorkspace::new();
    workspace.add_file("Slack.platform", SLACK_PLATFORM);
    let ctx = workspace.context();

    let plain = ctx
        .resolve(&ImportDeclaration::platform("Slack.platform"))
        .unwrap();
    let aliased = ctx
        .resolve(&ImportDeclaration::platform("Slack.platform").with_alias("chat"))
        .unwrap();

    assert!(!plain.ptr_eq(&aliased));
    assert_eq!(aliased.location(), "custom://platforms/chat.platform");
    assert_eq!(ctx.load_count(), 2);
}

// =============================================================================
// CACHE MAINTENANCE
// =============================================================================

#[test]
fn test_refresh_keeps_only_declared_imports() {
    let workspace = TestWorkspace::with_core();
    workspace.add_file("Slack.platform", SLACK_PLATFORM);
    workspace.add_file("Greetings.intent", GREETINGS_LIBRARY);
    let ctx = workspace.context();

    let all = vec![
        ImportDeclaration::platform("Slack.platform").with_alias("chat"),
        ImportDeclaration::library("Greetings.intent"),
        ImportDeclaration::library("CoreLibrary"),
    ];
    assert_eq!(ctx.refresh(&all).len(), 3);

    // The alias was renamed and the library import deleted.
    let edited = vec![
        ImportDeclaration::platform("Slack.platform").with_alias("im"),
        ImportDeclaration::library("CoreLibrary"),
    ];
    assert_eq!(ctx.refresh(&edited).len(), 2);

    let keys: Vec<CacheKey> = ctx.cache_keys().into_iter().map(|(_, key)| key).collect();
    assert_eq!(keys.len(), 2);
    assert!(keys.contains(&CacheKey::new("Slack.platform", Some("im"))));
    assert!(keys.contains(&CacheKey::new("CoreLibrary", None)));
    assert!(ctx.alias_location(DefinitionKind::Platform, "chat").is_none());
}

#[test]
fn test_repeated_refresh_does_not_reload() {
    let workspace = TestWorkspace::with_core();
    workspace.add_file("Slack.platform", SLACK_PLATFORM);
    let ctx = workspace.context();
    let imports = vec![
        ImportDeclaration::platform("Slack.platform"),
        ImportDeclaration::platform("CorePlatform"),
    ];

    ctx.refresh(&imports);
    ctx.refresh(&imports);
    ctx.refresh(&imports);
    assert_eq!(ctx.load_count(), 1);
}

#[test]
fn test_update_import_propagates_to_every_alias() {
    let workspace = TestWorkspace::new();
    workspace.add_file("Calendar.platform", CALENDAR_PLATFORM);
    let ctx = workspace.context();
    let imports = vec![
        ImportDeclaration::platform("Calendar.platform"),
        ImportDeclaration::platform("Calendar.platform").with_alias("cal"),
    ];
    ctx.refresh(&imports);

    let edited = parsed(CALENDAR_PLATFORM_EDITED, "editor://Calendar.platform");
    assert_eq!(ctx.update_import(edited.clone()), 2);

    for def in ctx.refresh(&imports) {
        assert!(def.ptr_eq(&edited));
        let platform = def.as_platform().unwrap();
        assert!(platform.event_provider("Agenda").unwrap().event("Cancelled").is_some());
    }
}

#[test]
fn test_update_import_ignores_other_kind() {
    let workspace = TestWorkspace::new();
    workspace.add_file("Calendar.platform", CALENDAR_PLATFORM);
    let ctx = workspace.context();
    ctx.resolve(&ImportDeclaration::platform("Calendar.platform"))
        .unwrap();

    assert_eq!(ctx.update_import(parsed("library Calendar", "lib")), 0);
}

#[test]
fn test_reset_rescans_bundle() {
    let workspace = TestWorkspace::with_core();
    let ctx = workspace.context();
    ctx.resolve(&ImportDeclaration::platform("CorePlatform")).unwrap();

    ctx.reset();
    workspace.add_core_platform("Extra", "platform Extra");
    let extra = ctx.resolve(&ImportDeclaration::platform("Extra")).unwrap();
    assert_eq!(extra.location(), "core://platforms/Extra.platform");
}
