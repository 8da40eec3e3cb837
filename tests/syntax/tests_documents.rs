//! Whole-document parsing tests.

use linkage::syntax::{DocumentKind, Expression, ImportKind, ParseErrorKind};
use linkage::{Document, parse_document};
use rstest::rstest;

use crate::helpers::source_fixtures::*;

#[rstest]
#[case(CORE_PLATFORM, DocumentKind::Platform)]
#[case(CORE_LIBRARY, DocumentKind::Library)]
#[case(SLACK_PLATFORM, DocumentKind::Platform)]
#[case(GREETINGS_LIBRARY, DocumentKind::Library)]
#[case(CHAT_BOT, DocumentKind::Execution)]
#[case(CALENDAR_BOT, DocumentKind::Execution)]
fn test_fixtures_parse(#[case] source: &str, #[case] kind: DocumentKind) {
    let document = parse_document(source, "fixture").unwrap();
    assert_eq!(document.kind(), kind);
    assert_eq!(document.location(), "fixture");
}

#[test]
fn test_chat_bot_structure() {
    let Document::Execution(model) = parse_document(CHAT_BOT, "bot.execution").unwrap() else {
        panic!("expected an execution model");
    };

    let imports: Vec<_> = model
        .imports
        .iter()
        .map(|i| (i.kind, i.path.as_str(), i.alias()))
        .collect();
    assert_eq!(
        imports,
        vec![
            (ImportKind::Platform, "Slack.platform", Some("chat")),
            (ImportKind::Library, "Greetings.intent", None),
            (ImportKind::Library, "CoreLibrary", None),
        ]
    );
    assert_eq!(model.event_providers[0].as_str(), "chat.MessageReceived");
    assert_eq!(model.states.len(), 3);
    assert_eq!(model.rules.len(), 3);

    let guard = model.rules[0].transitions[0].condition.as_ref().unwrap();
    let accesses: Vec<_> = guard.accesses().iter().map(|r| r.as_str()).collect();
    assert_eq!(accesses, vec!["Message"]);
    assert!(matches!(guard, Expression::Binary { .. }));
}

#[test]
fn test_intent_details() {
    let Document::Library(library) = parse_document(GREETINGS_LIBRARY, "g").unwrap() else {
        panic!("expected a library");
    };

    let hello = library.event("Hello").unwrap();
    assert!(hello.is_intent());
    assert_eq!(hello.intent.as_ref().unwrap().inputs, vec!["hi", "hello"]);
    assert_eq!(
        library.event("Bye").and_then(|e| e.follows()).map(|r| r.as_str()),
        Some("Greetings.HowAreYou")
    );
    assert!(!library.event("Timeout").unwrap().is_intent());
    assert_eq!(library.intents().count(), 3);
}

#[test]
fn test_error_position() {
    let err = parse_document("platform Slack {\n  provider }", "bad").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    assert_eq!(err.span.start.line, 1);
    assert_eq!(err.span.start.column, 11);
}

#[test]
fn test_block_comment_with_starred_close() {
    let document = parse_document("/* note **/ platform Slack", "x").unwrap();
    assert_eq!(document.kind(), DocumentKind::Platform);
}
