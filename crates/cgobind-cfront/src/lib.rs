//! C header front end for cgobind.
//!
//! Turns one or more C headers into a typed declaration tree: a
//! preprocessor with include search and macro expansion, a declaration
//! parser with typedef resolution, and an arithmetic data model used for
//! `sizeof` in constant expressions.
//!
//! ## Modules
//!
//! - [`lexer`]: preprocessing tokens
//! - [`preprocess`]: directives, includes and macro expansion
//! - [`expr`]: integer constant expressions
//! - [`parser`]: declarations into an [`ast::TranslationUnit`]
//! - [`types`]: the C type tree
//! - [`model`]: scalar sizes and fixed-width typedefs

pub mod ast;
pub mod error;
pub mod expr;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod preprocess;
pub mod token;
pub mod types;

use std::path::Path;

use tracing::debug;

pub use ast::{
    Declaration, DeclarationSpecifiers, Declarator, DirectDeclarator, ExternalDeclaration,
    ParameterDeclaration, ParameterTypeList, StorageClass, TranslationUnit,
};
pub use error::{CParseError, Location, Result};
pub use model::Model;
pub use preprocess::ParseOptions;
pub use types::{Enumerator, Kind, Type};

/// Parse the headers at `paths` as one translation unit, in order.
///
/// Headers share macro and typedef state, as if each were `#include`d in
/// turn from an empty source file.
pub fn parse<P: AsRef<Path>>(
    paths: &[P],
    model: &Model,
    options: &ParseOptions,
) -> Result<TranslationUnit> {
    let mut pp = preprocess::Preprocessor::new(options)?;
    for path in paths {
        pp.run_file(path.as_ref())?;
    }
    let tokens = pp.finish();
    debug!(headers = paths.len(), tokens = tokens.len(), "parsing declarations");
    parser::Parser::new(tokens, model).parse_translation_unit()
}

/// Parse in-memory header text as if it were read from `path`.
pub fn parse_source(
    path: &Path,
    source: &str,
    model: &Model,
    options: &ParseOptions,
) -> Result<TranslationUnit> {
    let mut pp = preprocess::Preprocessor::new(options)?;
    pp.run_source(path, source)?;
    parser::Parser::new(pp.finish(), model).parse_translation_unit()
}
