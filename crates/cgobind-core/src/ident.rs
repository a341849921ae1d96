//! Identifier resolution for declarator nodes and typedef'd types.

use cgobind_cfront::{DirectDeclarator, Type};

use crate::sanitize::bless_name;

/// Declared name of a direct declarator, sanitized for Go.
///
/// Recurses through parenthesized, array and function derivations down to
/// the identifier. Abstract declarators yield an empty string.
pub fn identifier_of(direct: &DirectDeclarator) -> String {
    match direct {
        DirectDeclarator::Identifier(Some(token)) => bless_name(&token.text),
        DirectDeclarator::Identifier(None) => String::new(),
        DirectDeclarator::Parenthesized(inner) => identifier_of(&inner.direct),
        DirectDeclarator::Array { base, .. }
        | DirectDeclarator::Function { base, .. }
        | DirectDeclarator::IdentifierList { base, .. } => identifier_of(base),
    }
}

/// Typedef name `ty` was spelled through, sanitized; empty when it has none.
pub fn typedef_name_of(ty: &Type) -> String {
    ty.typedef_name().map(bless_name).unwrap_or_default()
}
