//! Document trees for the platform, intent and execution languages.
//!
//! The parser produces these; the resolver only ever reads them. Every
//! reference to another definition is kept as raw [`Reference`] text and is
//! bound later by the `hir` layer.

use std::fmt;

use smol_str::SmolStr;

use crate::base::Span;
use crate::base::constants::{LIBRARY_EXTENSION, PLATFORM_EXTENSION};

/// A declared name with its location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Name {
    pub text: SmolStr,
    pub span: Span,
}

impl Name {
    pub fn new(text: impl Into<SmolStr>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Raw text of a reference awaiting resolution (possibly dotted).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub text: SmolStr,
    pub span: Span,
}

impl Reference {
    pub fn new(text: impl Into<SmolStr>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }

    /// Build a reference without a source location (embedders, tests).
    pub fn detached(text: impl Into<SmolStr>) -> Self {
        Self::new(text, Span::default())
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

// ============================================================================
// IMPORTS
// ============================================================================

/// What an import declaration asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImportKind {
    Platform,
    Library,
}

impl ImportKind {
    /// File extension of documents of this kind.
    pub fn extension(self) -> &'static str {
        match self {
            ImportKind::Platform => PLATFORM_EXTENSION,
            ImportKind::Library => LIBRARY_EXTENSION,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ImportKind::Platform => "platform",
            ImportKind::Library => "library",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// `import platform "<path>" [as <alias>]` / `import library "<path>" [as <alias>]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDeclaration {
    pub kind: ImportKind,
    pub path: SmolStr,
    pub alias: Option<SmolStr>,
    pub span: Span,
}

impl ImportDeclaration {
    pub fn new(kind: ImportKind, path: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            path: path.into(),
            alias: None,
            span: Span::default(),
        }
    }

    pub fn platform(path: impl Into<SmolStr>) -> Self {
        Self::new(ImportKind::Platform, path)
    }

    pub fn library(path: impl Into<SmolStr>) -> Self {
        Self::new(ImportKind::Library, path)
    }

    pub fn with_alias(mut self, alias: impl Into<SmolStr>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The alias, treating an empty alias as absent.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref().filter(|alias| !alias.is_empty())
    }
}

impl fmt::Display for ImportDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import {} \"{}\"", self.kind, self.path)?;
        if let Some(alias) = self.alias() {
            write!(f, " as {alias}")?;
        }
        Ok(())
    }
}

// ============================================================================
// EVENTS AND INTENTS
// ============================================================================

/// An event that can be received by an execution model.
///
/// Intents are events too: `intent` carries their extra data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventDefinition {
    pub name: Name,
    pub parameters: Vec<Name>,
    pub intent: Option<IntentDetails>,
}

impl EventDefinition {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn is_intent(&self) -> bool {
        self.intent.is_some()
    }

    /// The `follows` back-link of an intent, if any.
    pub fn follows(&self) -> Option<&Reference> {
        self.intent.as_ref().and_then(|intent| intent.follows.as_ref())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntentDetails {
    pub follows: Option<Reference>,
    pub inputs: Vec<SmolStr>,
}

// ============================================================================
// PLATFORMS
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventProviderDefinition {
    pub name: Name,
    pub events: Vec<EventDefinition>,
}

impl EventProviderDefinition {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn event(&self, name: &str) -> Option<&EventDefinition> {
        self.events.iter().find(|event| event.name() == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformDefinition {
    pub name: Name,
    pub is_abstract: bool,
    pub extends: Option<Reference>,
    pub imports: Vec<ImportDeclaration>,
    pub providers: Vec<EventProviderDefinition>,
    /// Location of the owning document.
    pub location: SmolStr,
}

impl PlatformDefinition {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn event_provider(&self, name: &str) -> Option<&EventProviderDefinition> {
        self.providers.iter().find(|provider| provider.name() == name)
    }

    /// Events of every provider, in declaration order.
    pub fn events(&self) -> impl Iterator<Item = &EventDefinition> {
        self.providers.iter().flat_map(|provider| provider.events.iter())
    }
}

// ============================================================================
// LIBRARIES
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Library {
    pub name: Name,
    pub imports: Vec<ImportDeclaration>,
    pub events: Vec<EventDefinition>,
    /// Location of the owning document.
    pub location: SmolStr,
}

impl Library {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn event(&self, name: &str) -> Option<&EventDefinition> {
        self.events.iter().find(|event| event.name() == name)
    }

    pub fn intents(&self) -> impl Iterator<Item = &EventDefinition> {
        self.events.iter().filter(|event| event.is_intent())
    }
}

// ============================================================================
// EXECUTION MODELS
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionModel {
    pub imports: Vec<ImportDeclaration>,
    /// `use provider Platform.Provider` clauses.
    pub event_providers: Vec<Reference>,
    pub states: Vec<State>,
    pub rules: Vec<ExecutionRule>,
    /// Location of the owning document.
    pub location: SmolStr,
}

impl ExecutionModel {
    pub fn state(&self, name: &str) -> Option<(usize, &State)> {
        self.states
            .iter()
            .enumerate()
            .find(|(_, state)| state.name.as_str() == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub name: Name,
}

/// `on <Event> { transition* }`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionRule {
    pub event: Reference,
    pub transitions: Vec<Transition>,
    pub span: Span,
}

/// `-> <State> [when <condition>]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: Reference,
    pub condition: Option<Expression>,
    pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    String(SmolStr),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expression {
    Literal(Literal),
    /// `Event` or `Event.field`
    Access {
        target: Reference,
        field: Option<Name>,
    },
    Not(Box<Expression>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
}

impl Expression {
    /// Every access target in this expression tree, left to right.
    pub fn accesses(&self) -> Vec<&Reference> {
        let mut out = Vec::new();
        self.collect_accesses(&mut out);
        out
    }

    fn collect_accesses<'a>(&'a self, out: &mut Vec<&'a Reference>) {
        match self {
            Expression::Literal(_) => {}
            Expression::Access { target, .. } => out.push(target),
            Expression::Not(inner) => inner.collect_accesses(out),
            Expression::Binary { lhs, rhs, .. } => {
                lhs.collect_accesses(out);
                rhs.collect_accesses(out);
            }
        }
    }
}

// ============================================================================
// DOCUMENTS
// ============================================================================

/// Kind of a document's top-level element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Platform,
    Library,
    Execution,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Platform => f.write_str("platform"),
            DocumentKind::Library => f.write_str("library"),
            DocumentKind::Execution => f.write_str("execution model"),
        }
    }
}

/// A parsed document: exactly one top-level element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Document {
    Platform(PlatformDefinition),
    Library(Library),
    Execution(ExecutionModel),
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Platform(_) => DocumentKind::Platform,
            Document::Library(_) => DocumentKind::Library,
            Document::Execution(_) => DocumentKind::Execution,
        }
    }

    pub fn imports(&self) -> &[ImportDeclaration] {
        match self {
            Document::Platform(platform) => &platform.imports,
            Document::Library(library) => &library.imports,
            Document::Execution(model) => &model.imports,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            Document::Platform(platform) => &platform.location,
            Document::Library(library) => &library.location,
            Document::Execution(model) => &model.location,
        }
    }

    /// Re-home the document, e.g. under an alias or core namespace.
    pub fn set_location(&mut self, location: impl Into<SmolStr>) {
        let location = location.into();
        match self {
            Document::Platform(platform) => platform.location = location,
            Document::Library(library) => library.location = location,
            Document::Execution(model) => model.location = location,
        }
    }
}
