//! Generator error types.

use std::path::PathBuf;

use cgobind_cfront::CParseError;

/// Errors that can occur while generating a binding module.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The C front end rejected the headers.
    #[error("parse error: {0}")]
    Parse(#[from] CParseError),

    /// The output file could not be created or written.
    #[error("cannot write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GenerateError>;
