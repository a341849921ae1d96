//! Front-end error types.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A position in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// File the token was read from.
    pub file: Arc<Path>,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl Location {
    /// Create a location at the given line and column of `file`.
    pub fn new(file: Arc<Path>, line: u32, column: u32) -> Self {
        Self { file, line, column }
    }

    /// The first position of `file`.
    pub fn start_of(file: Arc<Path>) -> Self {
        Self::new(file, 1, 1)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// Errors produced while reading, preprocessing or parsing C headers.
#[derive(Debug, thiserror::Error)]
pub enum CParseError {
    /// A header file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// The file that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A quoted `#include` named a file that exists nowhere on the search path.
    #[error("{location}: header not found: {name}")]
    IncludeNotFound {
        /// Where the `#include` appeared.
        location: Location,
        /// The header name as written.
        name: String,
    },

    /// Malformed preprocessor directive or macro invocation.
    #[error("{location}: preprocessor: {detail}")]
    Preprocessor {
        /// Where the problem was detected.
        location: Location,
        /// Description of the problem.
        detail: String,
    },

    /// An active `#error` directive.
    #[error("{location}: #error {message}")]
    ErrorDirective {
        /// Where the directive appeared.
        location: Location,
        /// The directive's text.
        message: String,
    },

    /// The token stream does not form a declaration the parser understands.
    #[error("{location}: syntax error: {detail}")]
    Syntax {
        /// Where the problem was detected.
        location: Location,
        /// Description of the problem.
        detail: String,
    },

    /// A constant expression (enumerator value, array length, `#if`) could
    /// not be evaluated.
    #[error("{location}: constant expression: {detail}")]
    ConstantExpression {
        /// Where the expression starts.
        location: Location,
        /// Description of the problem.
        detail: String,
    },
}

/// Result type alias for front-end operations.
pub type Result<T> = std::result::Result<T, CParseError>;
