//! Linking and diagnostics for whole documents.

use linkage::hir::{Link, codes, link_execution, link_library, link_platform};
use linkage::{Document, parse_document};

use crate::helpers::diagnostic_helpers::*;
use crate::helpers::source_fixtures::*;
use crate::helpers::workspace::TestWorkspace;

fn chat_workspace() -> TestWorkspace {
    let workspace = TestWorkspace::with_core();
    workspace.add_file("Slack.platform", SLACK_PLATFORM);
    workspace.add_file("Greetings.intent", GREETINGS_LIBRARY);
    workspace.add_file("Calendar.platform", CALENDAR_PLATFORM);
    workspace
}

fn execution(source: &str) -> linkage::syntax::ExecutionModel {
    match parse_document(source, "bot.execution").unwrap() {
        Document::Execution(model) => model,
        other => panic!("expected an execution model, got {}", other.kind()),
    }
}

#[test]
fn test_chat_bot_links_cleanly() {
    let workspace = chat_workspace();
    let ctx = workspace.context();
    assert_no_errors(&ctx, CHAT_BOT);

    let linked = link_execution(&ctx, &execution(CHAT_BOT));
    assert!(linked.is_fully_resolved());

    let provider = linked.event_providers[0].resolved().unwrap();
    assert_eq!(provider.qualified_name(), "Slack.MessageReceived");

    let owners: Vec<_> = linked
        .rules
        .iter()
        .map(|rule| rule.event.resolved().unwrap().owner_name().to_string())
        .collect();
    assert_eq!(owners, vec!["Greetings", "Greetings", "CoreLibrary"]);

    let guard = &linked.rules[0].transitions[0];
    assert_eq!(guard.state, Link::Resolved(1));
    assert_eq!(guard.accessed_events.len(), 1);
    assert_eq!(guard.accessed_events[0].name(), "Message");
}

#[test]
fn test_calendar_bot_links_cleanly() {
    let workspace = chat_workspace();
    let ctx = workspace.context();
    assert_no_errors(&ctx, CALENDAR_BOT);
}

#[test]
fn test_unknown_state_diagnostic() {
    let workspace = chat_workspace();
    let ctx = workspace.context();
    let source = r#"
import library "Greetings.intent"
state Init
on Hello {
    -> Nowhere
}
"#;

    let diagnostics = diagnostics_for(&ctx, source);
    let diag = assert_single_code(&diagnostics, codes::STATE_NOT_RESOLVED);
    assert_eq!(&*diag.message, "Nowhere cannot be resolved to a State");
    assert_eq!(diag.data.as_deref(), Some("Nowhere"));
    assert_eq!(diag.span.start.line, 4);
    assert_eq!(diag.span.start.column, 7);
}

#[test]
fn test_unknown_provider_and_event() {
    let workspace = chat_workspace();
    let ctx = workspace.context();
    let source = r#"
import platform "Slack.platform" as chat
use provider chat.Typing
state Init
on Meeting { -> Init }
"#;

    let diagnostics = errors_for(&ctx, source);
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.iter().all(|d| d.code.as_deref() == Some(codes::UNDEFINED_REFERENCE)));
    let texts: Vec<_> = diagnostics.iter().filter_map(|d| d.data.as_deref()).collect();
    assert_eq!(texts, vec!["chat.Typing", "Meeting"]);
}

#[test]
fn test_broken_import_diagnostic() {
    let workspace = chat_workspace();
    workspace.add_file("Broken.platform", "platform Broken {");
    let ctx = workspace.context();
    let source = "import platform \"Broken.platform\"\nstate Init";

    let diagnostics = diagnostics_for(&ctx, source);
    let diag = assert_single_code(&diagnostics, codes::INVALID_IMPORT);
    assert!(diag.message.contains("malformed content"));
    assert_eq!(diag.span.start.line, 0);
}

#[test]
fn test_alias_rename_breaks_old_references() {
    let workspace = chat_workspace();
    let ctx = workspace.context();
    let before = "import platform \"Slack.platform\" as chat\nuse provider chat.MessageReceived";
    let after = "import platform \"Slack.platform\" as im\nuse provider chat.MessageReceived";

    assert_no_errors(&ctx, before);
    let diagnostics = errors_for(&ctx, after);
    assert_single_code(&diagnostics, codes::UNDEFINED_REFERENCE);
}

#[test]
fn test_platform_extends_bundled_platform() {
    let workspace = chat_workspace();
    let ctx = workspace.context();
    let Document::Platform(slack) = parse_document(SLACK_PLATFORM, "Slack.platform").unwrap() else {
        panic!("expected a platform");
    };

    let linked = link_platform(&ctx, &slack);
    let parent = linked.extends.unwrap();
    assert_eq!(parent.resolved().map(|p| p.name()), Some("CorePlatform"));
    assert!(linked.diagnostics.is_empty());
}

#[test]
fn test_platform_extends_missing_platform() {
    let workspace = chat_workspace();
    let ctx = workspace.context();
    let diagnostics = diagnostics_for(&ctx, "platform Teams extends Office");
    let diag = assert_single_code(&diagnostics, codes::UNDEFINED_REFERENCE);
    assert_eq!(diag.data.as_deref(), Some("Office"));
}

#[test]
fn test_library_follows_chain() {
    let Document::Library(greetings) = parse_document(GREETINGS_LIBRARY, "Greetings.intent").unwrap() else {
        panic!("expected a library");
    };

    let linked = link_library(&greetings);
    assert_eq!(linked.follows[1], Some(Link::Resolved(0)));
    assert_eq!(linked.follows[2], Some(Link::Resolved(1)));
    assert_eq!(linked.follows[3], None);
    assert_eq!(linked.followed_by[0], vec![1]);
    assert_eq!(linked.followed_by[1], vec![2]);
    assert!(linked.followed_by[2].is_empty());
}

#[test]
fn test_library_follows_plain_event_is_unresolved() {
    let workspace = TestWorkspace::new();
    let ctx = workspace.context();
    let diagnostics = diagnostics_for(&ctx, "library L { event Timeout intent Ask follows Timeout }");
    let diag = assert_single_code(&diagnostics, codes::UNDEFINED_REFERENCE);
    assert_eq!(diag.data.as_deref(), Some("Timeout"));
}
