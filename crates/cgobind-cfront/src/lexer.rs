//! Hand-written C lexer producing preprocessing tokens.
//!
//! Handles line splices, both comment styles, identifiers, pp-numbers,
//! character and string literals with encoding prefixes, and punctuators.
//! Characters that start no C token are passed through as single-character
//! punctuators so the preprocessor can skip them inside inactive groups.

use std::path::Path;
use std::sync::Arc;

use crate::error::{CParseError, Location, Result};
use crate::token::{Token, TokenKind};

/// Punctuators, longest first so the first match is the longest.
const PUNCTUATORS: &[&str] = &[
    "...", "<<=", ">>=", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "*=",
    "/=", "%=", "+=", "-=", "&=", "^=", "|=", "##",
];

/// Encoding prefixes that may precede a character or string literal.
const LITERAL_PREFIXES: &[&str] = &["L", "u", "U", "u8"];

/// Tokenize the contents of a source file.
pub fn tokenize(source: &str, file: Arc<Path>) -> Result<Vec<Token>> {
    Lexer::new(source, file).run()
}

struct Lexer {
    /// Source characters with their original line/column, line splices removed.
    chars: Vec<(char, u32, u32)>,
    pos: usize,
    file: Arc<Path>,
    line_start: bool,
    leading_space: bool,
}

impl Lexer {
    fn new(source: &str, file: Arc<Path>) -> Self {
        let mut chars = Vec::with_capacity(source.len());
        let raw: Vec<char> = source.chars().collect();
        let (mut line, mut column) = (1u32, 1u32);
        let mut i = 0;
        while i < raw.len() {
            let c = raw[i];
            if c == '\\' {
                let splice_len = match (raw.get(i + 1), raw.get(i + 2)) {
                    (Some('\n'), _) => Some(2),
                    (Some('\r'), Some('\n')) => Some(3),
                    _ => None,
                };
                if let Some(len) = splice_len {
                    i += len;
                    line += 1;
                    column = 1;
                    continue;
                }
            }
            chars.push((c, line, column));
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
            i += 1;
        }
        Self {
            chars,
            pos: 0,
            file,
            line_start: true,
            leading_space: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).map(|&(c, _, _)| c)
    }

    fn location(&self) -> Location {
        match self.chars.get(self.pos).or_else(|| self.chars.last()) {
            Some(&(_, line, column)) => Location::new(self.file.clone(), line, column),
            None => Location::start_of(self.file.clone()),
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn run(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            match c {
                '\n' => {
                    self.pos += 1;
                    self.line_start = true;
                    self.leading_space = false;
                }
                ' ' | '\t' | '\r' | '\x0b' | '\x0c' => {
                    self.pos += 1;
                    self.leading_space = true;
                }
                '/' if self.peek_at(1) == Some('/') => {
                    while matches!(self.peek(), Some(c) if c != '\n') {
                        self.pos += 1;
                    }
                    self.leading_space = true;
                }
                '/' if self.peek_at(1) == Some('*') => {
                    let location = self.location();
                    self.pos += 2;
                    loop {
                        match self.peek() {
                            None => {
                                return Err(CParseError::Syntax {
                                    location,
                                    detail: "unterminated comment".to_string(),
                                })
                            }
                            Some('*') if self.peek_at(1) == Some('/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(_) => self.pos += 1,
                        }
                    }
                    self.leading_space = true;
                }
                _ => {
                    let token = self.token()?;
                    tokens.push(token);
                    self.line_start = false;
                    self.leading_space = false;
                }
            }
        }
        Ok(tokens)
    }

    fn token(&mut self) -> Result<Token> {
        let location = self.location();
        let start = self.pos;
        let c = self.peek().unwrap_or_default();

        let kind = if is_ident_start(c) {
            let prefix = LITERAL_PREFIXES
                .iter()
                .find(|p| self.starts_with(p) && matches!(self.peek_at(p.len()), Some('\'' | '"')));
            match prefix {
                Some(p) => {
                    self.pos += p.len();
                    let quote = self.peek().unwrap_or('"');
                    self.quoted(quote, &location)?
                }
                None => {
                    while matches!(self.peek(), Some(c) if is_ident_continue(c)) {
                        self.pos += 1;
                    }
                    TokenKind::Identifier
                }
            }
        } else if c.is_ascii_digit() || (c == '.' && matches!(self.peek_at(1), Some(d) if d.is_ascii_digit())) {
            self.pos += 1;
            while let Some(c) = self.peek() {
                if matches!(c, 'e' | 'E' | 'p' | 'P') && matches!(self.peek_at(1), Some('+' | '-')) {
                    self.pos += 2;
                } else if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            TokenKind::Number
        } else if c == '\'' || c == '"' {
            self.quoted(c, &location)?
        } else {
            let len = PUNCTUATORS
                .iter()
                .find(|p| self.starts_with(p))
                .map_or(1, |p| p.len());
            self.pos += len;
            TokenKind::Punct
        };

        let text: String = self.chars[start..self.pos].iter().map(|&(c, _, _)| c).collect();
        Ok(Token {
            kind,
            text,
            location,
            line_start: self.line_start,
            leading_space: self.leading_space,
        })
    }

    /// Consume a quoted literal starting at the opening `quote`.
    fn quoted(&mut self, quote: char, location: &Location) -> Result<TokenKind> {
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(CParseError::Syntax {
                        location: location.clone(),
                        detail: format!("missing terminating {quote} character"),
                    })
                }
                Some('\\') => self.pos += 2,
                Some(c) => {
                    self.pos += 1;
                    if c == quote {
                        break;
                    }
                }
            }
        }
        Ok(if quote == '\'' {
            TokenKind::CharLiteral
        } else {
            TokenKind::StringLiteral
        })
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
