//! Recursive-descent parser for platform, intent and execution documents.
//!
//! The top-level element is chosen from the first token after the imports:
//! `platform`/`abstract` starts a platform, `library` starts an intent
//! library, anything else is an execution model.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::ast::*;
use super::error::{ParseError, ParseErrorKind};
use super::lexer::{Token, TokenKind, tokenize};
use crate::base::{LineIndex, Span};

/// Maximum depth of `!` and parenthesised sub-conditions.
const MAX_NESTING: usize = 64;

/// Parse `source` into a [`Document`] whose location is `location`.
pub fn parse_document(source: &str, location: impl Into<SmolStr>) -> Result<Document, ParseError> {
    let mut document = Parser::new(source).document()?;
    document.set_location(location);
    Ok(document)
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    index: LineIndex,
    source_len: TextSize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            tokens: tokenize(source),
            pos: 0,
            index: LineIndex::new(source),
            source_len: TextSize::of(source),
            depth: 0,
        }
    }

    // ============================================================
    // Token cursor
    // ============================================================

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|token| token.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token<'a>> {
        if self.at(kind) { self.bump() } else { None }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token<'a>, ParseError> {
        match self.eat(kind) {
            Some(token) => Ok(token),
            None => Err(self.error_here(kind.describe())),
        }
    }

    /// Start offset of the next token (or end of input).
    fn start(&self) -> TextSize {
        self.tokens
            .get(self.pos)
            .map(|token| token.range.start())
            .unwrap_or(self.source_len)
    }

    /// Span from `start` up to the end of the last consumed token.
    fn span_from(&self, start: TextSize) -> Span {
        let end = self
            .pos
            .checked_sub(1)
            .and_then(|prev| self.tokens.get(prev))
            .map(|token| token.range.end())
            .unwrap_or(start)
            .max(start);
        self.index.span(TextRange::new(start, end))
    }

    fn token_span(&self, token: &Token<'_>) -> Span {
        self.index.span(token.range)
    }

    fn error_here(&self, expected: &str) -> ParseError {
        match self.tokens.get(self.pos) {
            Some(token) if token.kind == TokenKind::Error => ParseError::new(
                ParseErrorKind::InvalidToken,
                format!("unrecognised input '{}'", token.text),
                self.token_span(token),
            ),
            Some(token) => ParseError::new(
                ParseErrorKind::UnexpectedToken,
                format!("expected {expected}, found {}", token.kind.describe()),
                self.token_span(token),
            ),
            None => {
                let end = self.index.span(TextRange::empty(self.source_len));
                ParseError::new(
                    ParseErrorKind::UnexpectedEof,
                    format!("expected {expected}, found end of input"),
                    end,
                )
            }
        }
    }

    // ============================================================
    // Shared pieces
    // ============================================================

    fn name(&mut self) -> Result<Name, ParseError> {
        let token = self.expect(TokenKind::Ident)?;
        Ok(Name::new(token.text, self.token_span(&token)))
    }

    /// `IDENT ('.' IDENT)*`, kept as raw text.
    fn qualified(&mut self) -> Result<Reference, ParseError> {
        let start = self.start();
        let first = self.expect(TokenKind::Ident)?;
        let mut text = String::from(first.text);
        while self.eat(TokenKind::Dot).is_some() {
            let segment = self.expect(TokenKind::Ident)?;
            text.push('.');
            text.push_str(segment.text);
        }
        Ok(Reference::new(text, self.span_from(start)))
    }

    fn string(&mut self) -> Result<SmolStr, ParseError> {
        let token = self.expect(TokenKind::String)?;
        Ok(unescape(token.text))
    }

    fn parameters(&mut self) -> Result<Vec<Name>, ParseError> {
        let mut parameters = Vec::new();
        if self.eat(TokenKind::LParen).is_none() {
            return Ok(parameters);
        }
        if !self.at(TokenKind::RParen) {
            loop {
                parameters.push(self.name()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(parameters)
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        if self.pos < self.tokens.len() {
            Err(self.error_here("end of document"))
        } else {
            Ok(())
        }
    }

    // ============================================================
    // Documents
    // ============================================================

    fn document(&mut self) -> Result<Document, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::empty_document());
        }

        let mut imports = Vec::new();
        while self.at(TokenKind::Import) {
            imports.push(self.import()?);
        }

        let document = match self.peek_kind() {
            Some(TokenKind::Platform | TokenKind::Abstract) => {
                Document::Platform(self.platform(imports)?)
            }
            Some(TokenKind::Library) => Document::Library(self.library(imports)?),
            _ => Document::Execution(self.execution(imports)?),
        };
        self.expect_end()?;
        Ok(document)
    }

    fn import(&mut self) -> Result<ImportDeclaration, ParseError> {
        let start = self.start();
        self.expect(TokenKind::Import)?;
        let kind = if self.eat(TokenKind::Platform).is_some() {
            ImportKind::Platform
        } else if self.eat(TokenKind::Library).is_some() {
            ImportKind::Library
        } else {
            return Err(self.error_here("'platform' or 'library'"));
        };
        let path = self.string()?;
        let alias = if self.eat(TokenKind::As).is_some() {
            if self.at(TokenKind::String) {
                Some(self.string()?)
            } else {
                Some(self.name()?.text)
            }
        } else {
            None
        };
        Ok(ImportDeclaration {
            kind,
            path,
            alias,
            span: self.span_from(start),
        })
    }

    // ============================================================
    // Platforms
    // ============================================================

    fn platform(
        &mut self,
        imports: Vec<ImportDeclaration>,
    ) -> Result<PlatformDefinition, ParseError> {
        let is_abstract = self.eat(TokenKind::Abstract).is_some();
        self.expect(TokenKind::Platform)?;
        let name = self.name()?;
        let extends = if self.eat(TokenKind::Extends).is_some() {
            Some(self.qualified()?)
        } else {
            None
        };

        let mut providers = Vec::new();
        if self.eat(TokenKind::LBrace).is_some() {
            while !self.at(TokenKind::RBrace) {
                providers.push(self.provider()?);
            }
            self.expect(TokenKind::RBrace)?;
        }

        Ok(PlatformDefinition {
            name,
            is_abstract,
            extends,
            imports,
            providers,
            location: SmolStr::default(),
        })
    }

    fn provider(&mut self) -> Result<EventProviderDefinition, ParseError> {
        self.expect(TokenKind::Provider)?;
        let name = self.name()?;
        let mut events = Vec::new();
        if self.eat(TokenKind::LBrace).is_some() {
            while !self.at(TokenKind::RBrace) {
                events.push(self.event()?);
            }
            self.expect(TokenKind::RBrace)?;
        }
        Ok(EventProviderDefinition { name, events })
    }

    fn event(&mut self) -> Result<EventDefinition, ParseError> {
        self.expect(TokenKind::Event)?;
        let name = self.name()?;
        let parameters = self.parameters()?;
        Ok(EventDefinition {
            name,
            parameters,
            intent: None,
        })
    }

    // ============================================================
    // Libraries
    // ============================================================

    fn library(&mut self, imports: Vec<ImportDeclaration>) -> Result<Library, ParseError> {
        self.expect(TokenKind::Library)?;
        let name = self.name()?;
        let mut events = Vec::new();
        if self.eat(TokenKind::LBrace).is_some() {
            loop {
                match self.peek_kind() {
                    Some(TokenKind::Event) => events.push(self.event()?),
                    Some(TokenKind::Intent) => events.push(self.intent()?),
                    _ => break,
                }
            }
            self.expect(TokenKind::RBrace)?;
        }
        Ok(Library {
            name,
            imports,
            events,
            location: SmolStr::default(),
        })
    }

    fn intent(&mut self) -> Result<EventDefinition, ParseError> {
        self.expect(TokenKind::Intent)?;
        let name = self.name()?;
        let follows = if self.eat(TokenKind::Follows).is_some() {
            Some(self.qualified()?)
        } else {
            None
        };
        let parameters = self.parameters()?;

        let mut inputs = Vec::new();
        if self.eat(TokenKind::LBrace).is_some() {
            if self.eat(TokenKind::Inputs).is_some() {
                self.expect(TokenKind::LBrace)?;
                if !self.at(TokenKind::RBrace) {
                    loop {
                        inputs.push(self.string()?);
                        if self.eat(TokenKind::Comma).is_none() {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RBrace)?;
            }
            self.expect(TokenKind::RBrace)?;
        }

        Ok(EventDefinition {
            name,
            parameters,
            intent: Some(IntentDetails { follows, inputs }),
        })
    }

    // ============================================================
    // Execution models
    // ============================================================

    fn execution(&mut self, imports: Vec<ImportDeclaration>) -> Result<ExecutionModel, ParseError> {
        let mut model = ExecutionModel {
            imports,
            event_providers: Vec::new(),
            states: Vec::new(),
            rules: Vec::new(),
            location: SmolStr::default(),
        };

        while let Some(kind) = self.peek_kind() {
            match kind {
                TokenKind::Use => {
                    self.bump();
                    self.expect(TokenKind::Provider)?;
                    model.event_providers.push(self.qualified()?);
                }
                TokenKind::State => {
                    self.bump();
                    model.states.push(State { name: self.name()? });
                }
                TokenKind::On => model.rules.push(self.rule()?),
                _ => return Err(self.error_here("'use', 'state' or 'on'")),
            }
        }
        Ok(model)
    }

    fn rule(&mut self) -> Result<ExecutionRule, ParseError> {
        let start = self.start();
        self.expect(TokenKind::On)?;
        let event = self.qualified()?;
        self.expect(TokenKind::LBrace)?;
        let mut transitions = Vec::new();
        while self.at(TokenKind::Arrow) {
            transitions.push(self.transition()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(ExecutionRule {
            event,
            transitions,
            span: self.span_from(start),
        })
    }

    fn transition(&mut self) -> Result<Transition, ParseError> {
        let start = self.start();
        self.expect(TokenKind::Arrow)?;
        let target = self.name()?;
        let state = Reference::new(target.text, target.span);
        let condition = if self.eat(TokenKind::When).is_some() {
            Some(self.expression()?)
        } else {
            None
        };
        Ok(Transition {
            state,
            condition,
            span: self.span_from(start),
        })
    }

    // ============================================================
    // Conditions
    // ============================================================

    fn expression(&mut self) -> Result<Expression, ParseError> {
        let mut lhs = self.conjunction()?;
        while self.eat(TokenKind::PipePipe).is_some() {
            let rhs = self.conjunction()?;
            lhs = binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn conjunction(&mut self) -> Result<Expression, ParseError> {
        let mut lhs = self.unary()?;
        while self.eat(TokenKind::AmpAmp).is_some() {
            let rhs = self.unary()?;
            lhs = binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expression, ParseError> {
        if self.at(TokenKind::Bang) {
            let inner = self.nested(|p| {
                p.bump();
                p.unary()
            })?;
            return Ok(Expression::Not(Box::new(inner)));
        }
        self.comparison()
    }

    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Expression, ParseError>,
    ) -> Result<Expression, ParseError> {
        if self.depth >= MAX_NESTING {
            let start = self.start();
            let end = start + TextSize::of("(");
            return Err(ParseError::new(
                ParseErrorKind::TooDeeplyNested,
                format!("condition nested deeper than {MAX_NESTING} levels"),
                self.index.span(TextRange::new(start, end)),
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn comparison(&mut self) -> Result<Expression, ParseError> {
        let lhs = self.atom()?;
        let op = match self.peek_kind() {
            Some(TokenKind::EqEq) => BinaryOp::Eq,
            Some(TokenKind::BangEq) => BinaryOp::Ne,
            Some(TokenKind::Lt) => BinaryOp::Lt,
            Some(TokenKind::LtEq) => BinaryOp::Le,
            Some(TokenKind::Gt) => BinaryOp::Gt,
            Some(TokenKind::GtEq) => BinaryOp::Ge,
            _ => return Ok(lhs),
        };
        self.bump();
        let rhs = self.atom()?;
        Ok(binary(op, lhs, rhs))
    }

    fn atom(&mut self) -> Result<Expression, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::True) => {
                self.bump();
                Ok(Expression::Literal(Literal::Bool(true)))
            }
            Some(TokenKind::False) => {
                self.bump();
                Ok(Expression::Literal(Literal::Bool(false)))
            }
            Some(TokenKind::String) => Ok(Expression::Literal(Literal::String(self.string()?))),
            Some(TokenKind::Integer) => {
                let token = self.expect(TokenKind::Integer)?;
                let value = token.text.parse::<i64>().map_err(|_| {
                    ParseError::new(
                        ParseErrorKind::InvalidLiteral,
                        format!("integer literal '{}' is out of range", token.text),
                        self.token_span(&token),
                    )
                })?;
                Ok(Expression::Literal(Literal::Int(value)))
            }
            Some(TokenKind::LParen) => self.nested(|p| {
                p.bump();
                let inner = p.expression()?;
                p.expect(TokenKind::RParen)?;
                Ok(inner)
            }),
            Some(TokenKind::Ident) => {
                let target = self.name()?;
                let field = if self.eat(TokenKind::Dot).is_some() {
                    Some(self.name()?)
                } else {
                    None
                };
                Ok(Expression::Access {
                    target: Reference::new(target.text, target.span),
                    field,
                })
            }
            _ => Err(self.error_here("expression")),
        }
    }
}

fn binary(op: BinaryOp, lhs: Expression, rhs: Expression) -> Expression {
    Expression::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

/// Strip the quotes of a string literal and resolve escapes.
fn unescape(raw: &str) -> SmolStr {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    SmolStr::from(out)
}
