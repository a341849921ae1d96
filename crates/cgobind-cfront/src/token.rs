//! Preprocessing tokens.

use crate::error::Location;

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    /// A preprocessing number (`42`, `0x7FFFFFFFu`, `1.0e-3f`).
    Number,
    /// A character constant, including any encoding prefix.
    CharLiteral,
    /// A string literal, including quotes and any encoding prefix.
    StringLiteral,
    Punct,
}

/// A single token with its spelling and origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: Location,
    /// First token on its source line (directives start here).
    pub line_start: bool,
    /// Preceded by whitespace or a comment.
    pub leading_space: bool,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
            line_start: false,
            leading_space: false,
        }
    }

    /// Whether this is the punctuator `p`.
    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == p
    }

    /// Whether this is the identifier (or keyword) `name`.
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == name
    }

    /// The identifier spelling, if this is an identifier.
    pub fn ident(&self) -> Option<&str> {
        (self.kind == TokenKind::Identifier).then_some(self.text.as_str())
    }

    /// Copy of this token moved to `location`, used when macro bodies are
    /// spliced into the invocation site.
    pub(crate) fn relocated(&self, location: &Location, leading_space: bool) -> Self {
        Self {
            kind: self.kind,
            text: self.text.clone(),
            location: location.clone(),
            line_start: false,
            leading_space,
        }
    }
}
