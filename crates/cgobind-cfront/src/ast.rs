//! Declaration tree produced by the parser.
//!
//! The shapes follow the C grammar closely enough that a consumer can walk
//! declarators the way the standard describes them, while every declarator
//! also carries its fully derived [`Type`].

use crate::error::Location;
use crate::token::Token;
use crate::types::Type;

/// All top-level declarations of the parsed headers, in source order.
#[derive(Debug, Clone, Default)]
pub struct TranslationUnit {
    pub external_declarations: Vec<ExternalDeclaration>,
}

/// One top-level item.
#[derive(Debug, Clone)]
pub enum ExternalDeclaration {
    Declaration(Declaration),
    /// A function with a body (`static inline` helpers in headers). The body
    /// itself is skipped.
    FunctionDefinition(FunctionDefinition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Typedef,
    Extern,
    Static,
    Auto,
    Register,
    ThreadLocal,
}

/// Storage class, qualifiers and base type shared by a declaration's declarators.
#[derive(Debug, Clone)]
pub struct DeclarationSpecifiers {
    pub storage: Option<StorageClass>,
    pub is_inline: bool,
    /// Base type before any declarator derivation.
    pub ty: Type,
    /// The specifiers contain a struct, union or enum body (`{ ... }`).
    pub defines_body: bool,
}

/// A declaration such as `typedef float VGfloat;` or `void vgFlush(void);`.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub specifiers: DeclarationSpecifiers,
    /// Declarators in source order; empty for `enum Tag { ... };`.
    pub declarators: Vec<Declarator>,
    pub location: Location,
}

#[derive(Debug, Clone)]
pub struct FunctionDefinition {
    pub specifiers: DeclarationSpecifiers,
    pub declarator: Declarator,
    pub location: Location,
}

/// Pointer prefix plus direct declarator, with the type it derives.
#[derive(Debug, Clone)]
pub struct Declarator {
    /// Number of leading `*`.
    pub pointer_depth: usize,
    pub direct: DirectDeclarator,
    /// Type of the declared entity.
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub enum DirectDeclarator {
    /// The declared name; `None` in an abstract declarator.
    Identifier(Option<Token>),
    /// `( Declarator )`
    Parenthesized(Box<Declarator>),
    /// `DirectDeclarator [ length ]`
    Array {
        base: Box<DirectDeclarator>,
        length: Option<u64>,
    },
    /// `DirectDeclarator ( ParameterTypeList )`
    Function {
        base: Box<DirectDeclarator>,
        parameters: ParameterTypeList,
    },
    /// `DirectDeclarator ( a, b, c )`, an old-style identifier list.
    IdentifierList {
        base: Box<DirectDeclarator>,
        identifiers: Vec<Token>,
    },
}

/// A prototype's parameters.
#[derive(Debug, Clone, Default)]
pub struct ParameterTypeList {
    pub parameters: Vec<ParameterDeclaration>,
    /// Ends with `...`.
    pub variadic: bool,
}

#[derive(Debug, Clone)]
pub struct ParameterDeclaration {
    pub specifiers: DeclarationSpecifiers,
    /// `None` when the parameter is a bare type such as `(void)` or `(int)`.
    pub declarator: Option<Declarator>,
    pub ty: Type,
}

/// Derivation closest to the declared name.
enum Derivation<'a> {
    Pointer,
    Array,
    Function(&'a ParameterTypeList),
    IdentifierList,
}

impl Declarator {
    /// The declared name, if the declarator is not abstract.
    pub fn name(&self) -> Option<&str> {
        self.direct.name()
    }

    /// Parameter list of the declared function, if this declarator declares a
    /// function (as opposed to, say, a pointer to one).
    pub fn parameter_type_list(&self) -> Option<&ParameterTypeList> {
        match self.nearest_derivation()? {
            Derivation::Function(list) => Some(list),
            Derivation::Pointer | Derivation::Array | Derivation::IdentifierList => None,
        }
    }

    fn nearest_derivation(&self) -> Option<Derivation<'_>> {
        self.direct
            .nearest_derivation()
            .or_else(|| (self.pointer_depth > 0).then_some(Derivation::Pointer))
    }
}

impl DirectDeclarator {
    pub fn name(&self) -> Option<&str> {
        match self {
            DirectDeclarator::Identifier(token) => token.as_ref().map(|t| t.text.as_str()),
            DirectDeclarator::Parenthesized(inner) => inner.name(),
            DirectDeclarator::Array { base, .. }
            | DirectDeclarator::Function { base, .. }
            | DirectDeclarator::IdentifierList { base, .. } => base.name(),
        }
    }

    fn nearest_derivation(&self) -> Option<Derivation<'_>> {
        match self {
            DirectDeclarator::Identifier(_) => None,
            DirectDeclarator::Parenthesized(inner) => inner.nearest_derivation(),
            DirectDeclarator::Array { base, .. } => {
                base.nearest_derivation().or(Some(Derivation::Array))
            }
            DirectDeclarator::Function { base, parameters } => base
                .nearest_derivation()
                .or(Some(Derivation::Function(parameters))),
            DirectDeclarator::IdentifierList { base, .. } => {
                base.nearest_derivation().or(Some(Derivation::IdentifierList))
            }
        }
    }
}

impl ParameterTypeList {
    /// Whether this is the `(void)` list, which declares no parameters.
    pub fn is_void(&self) -> bool {
        matches!(self.parameters.as_slice(), [only] if only.declarator.is_none() && only.ty.is_void())
    }
}
