// Syntax definitions for the platform, intent and execution languages
pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{
    BinaryOp, Document, DocumentKind, EventDefinition, EventProviderDefinition, ExecutionModel,
    ExecutionRule, Expression, ImportDeclaration, ImportKind, IntentDetails, Library, Literal,
    Name, PlatformDefinition, Reference, State, Transition,
};
pub use error::{ParseError, ParseErrorKind};
pub use parser::parse_document;

// Re-export Position and Span from base for convenience
pub use crate::base::{Position, Span};
