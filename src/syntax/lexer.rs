//! Logos-based lexer shared by the platform, intent and execution languages.

use logos::Logos;
use text_size::{TextRange, TextSize};

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let span = self.inner.span();
        let range = TextRange::new(
            TextSize::new(span.start as u32),
            TextSize::new(span.end as u32),
        );

        let kind = logos_token.unwrap_or(TokenKind::Error);

        Some(Token { kind, text, range })
    }
}

/// Tokenize an entire string, dropping comments.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input)
        .filter(|token| !token.kind.is_trivia())
        .collect()
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*[^*]*\*+([^*/][^*]*\*+)*/")]
    BlockComment,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("import")]
    Import,
    #[token("platform")]
    Platform,
    #[token("library")]
    Library,
    #[token("as")]
    As,
    #[token("abstract")]
    Abstract,
    #[token("extends")]
    Extends,
    #[token("provider")]
    Provider,
    #[token("event")]
    Event,
    #[token("intent")]
    Intent,
    #[token("follows")]
    Follows,
    #[token("inputs")]
    Inputs,
    #[token("use")]
    Use,
    #[token("state")]
    State,
    #[token("on")]
    On,
    #[token("when")]
    When,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    // =========================================================================
    // PUNCTUATION (multi-character first)
    // =========================================================================
    #[token("->")]
    Arrow,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("!")]
    Bang,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    /// Produced for input the lexer does not recognise.
    Error,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Human readable description used in parse errors.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::LineComment | TokenKind::BlockComment => "comment",
            TokenKind::Import => "'import'",
            TokenKind::Platform => "'platform'",
            TokenKind::Library => "'library'",
            TokenKind::As => "'as'",
            TokenKind::Abstract => "'abstract'",
            TokenKind::Extends => "'extends'",
            TokenKind::Provider => "'provider'",
            TokenKind::Event => "'event'",
            TokenKind::Intent => "'intent'",
            TokenKind::Follows => "'follows'",
            TokenKind::Inputs => "'inputs'",
            TokenKind::Use => "'use'",
            TokenKind::State => "'state'",
            TokenKind::On => "'on'",
            TokenKind::When => "'when'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Ident => "identifier",
            TokenKind::Integer => "integer",
            TokenKind::String => "string",
            TokenKind::Arrow => "'->'",
            TokenKind::AmpAmp => "'&&'",
            TokenKind::PipePipe => "'||'",
            TokenKind::EqEq => "'=='",
            TokenKind::BangEq => "'!='",
            TokenKind::LtEq => "'<='",
            TokenKind::GtEq => "'>='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Bang => "'!'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Error => "invalid token",
        }
    }
}
