//! Declaration parser.
//!
//! Parses the preprocessed token stream of a header into a
//! [`TranslationUnit`]. Only declarations are understood in depth: struct and
//! union bodies, initializers and function bodies are skipped by brace
//! matching. Typedef names are resolved as they are declared, enumerator
//! values are evaluated in declaration order, and identifiers in type position
//! with no visible definition become unresolved typedef names.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::trace;

use crate::ast::{
    Declaration, DeclarationSpecifiers, Declarator, DirectDeclarator, ExternalDeclaration,
    FunctionDefinition, ParameterDeclaration, ParameterTypeList, StorageClass, TranslationUnit,
};
use crate::error::{CParseError, Location, Result};
use crate::expr::{self, ConstScope};
use crate::model::Model;
use crate::token::{Token, TokenKind};
use crate::types::{Enumerator, Kind, Type};

const QUALIFIERS: &[&str] = &[
    "const", "__const", "__const__", "volatile", "__volatile", "__volatile__", "restrict",
    "__restrict", "__restrict__", "_Atomic", "_Nullable", "_Nonnull", "_Null_unspecified",
    "__unaligned",
];

const FUNCTION_SPECIFIERS: &[&str] = &["inline", "__inline", "__inline__", "_Noreturn", "__forceinline"];

/// Tokens with no meaning for declarations that may appear anywhere.
const NOISE: &[&str] = &[
    "__extension__", "__cdecl", "__stdcall", "__fastcall", "__vectorcall", "__thiscall",
];

/// Keywords followed by a parenthesized argument that is skipped.
const NOISE_WITH_ARGS: &[&str] = &[
    "__attribute__", "__attribute", "__declspec", "__asm__", "__asm", "asm", "_Alignas",
    "alignas",
];

const TYPE_SPECIFIERS: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "__signed", "__signed__",
    "unsigned", "_Bool", "_Complex", "__complex__", "struct", "union", "enum",
];

fn storage_class(name: &str) -> Option<StorageClass> {
    let class = match name {
        "typedef" => StorageClass::Typedef,
        "extern" => StorageClass::Extern,
        "static" => StorageClass::Static,
        "auto" => StorageClass::Auto,
        "register" => StorageClass::Register,
        "_Thread_local" | "__thread" => StorageClass::ThreadLocal,
        _ => return None,
    };
    Some(class)
}

fn is_reserved(name: &str) -> bool {
    storage_class(name).is_some()
        || QUALIFIERS.contains(&name)
        || FUNCTION_SPECIFIERS.contains(&name)
        || NOISE.contains(&name)
        || NOISE_WITH_ARGS.contains(&name)
        || TYPE_SPECIFIERS.contains(&name)
}

/// Type specifiers collected from one declaration-specifier sequence.
#[derive(Default)]
struct SpecifierSet {
    storage: Option<StorageClass>,
    is_inline: bool,
    is_const: bool,
    void: bool,
    char: bool,
    int: bool,
    float: bool,
    double: bool,
    boolean: bool,
    complex: bool,
    signed: bool,
    unsigned: bool,
    short: bool,
    long: u8,
    named: Option<Type>,
    defines_body: bool,
}

impl SpecifierSet {
    fn has_type(&self) -> bool {
        self.void
            || self.char
            || self.int
            || self.float
            || self.double
            || self.boolean
            || self.complex
            || self.signed
            || self.unsigned
            || self.short
            || self.long > 0
            || self.named.is_some()
    }

    fn resolve(self) -> Option<DeclarationSpecifiers> {
        let ty = if let Some(named) = self.named {
            named
        } else {
            let kind = if self.void {
                Kind::Void
            } else if self.boolean {
                Kind::Bool
            } else if self.float {
                if self.complex {
                    Kind::FloatComplex
                } else {
                    Kind::Float
                }
            } else if self.double || self.complex {
                match (self.long > 0, self.complex) {
                    (true, true) => Kind::LongDoubleComplex,
                    (true, false) => Kind::LongDouble,
                    (false, true) => Kind::DoubleComplex,
                    (false, false) => Kind::Double,
                }
            } else if self.char {
                if self.unsigned {
                    Kind::UChar
                } else if self.signed {
                    Kind::SChar
                } else {
                    Kind::Char
                }
            } else if self.short {
                if self.unsigned {
                    Kind::UShort
                } else {
                    Kind::Short
                }
            } else if self.long >= 2 {
                if self.unsigned {
                    Kind::ULongLong
                } else {
                    Kind::LongLong
                }
            } else if self.long == 1 {
                if self.unsigned {
                    Kind::ULong
                } else {
                    Kind::Long
                }
            } else if self.int || self.signed || self.unsigned {
                if self.unsigned {
                    Kind::UInt
                } else {
                    Kind::Int
                }
            } else {
                return None;
            };
            Type::scalar(kind)
        };
        let ty = if self.is_const { ty.with_const() } else { ty };
        Some(DeclarationSpecifiers {
            storage: self.storage,
            is_inline: self.is_inline,
            ty,
            defines_body: self.defines_body,
        })
    }
}

/// Constant lookup for enumerator values and array lengths.
struct Scope<'p> {
    constants: &'p HashMap<String, i128>,
    typedefs: &'p HashMap<String, Type>,
}

impl ConstScope for Scope<'_> {
    fn constant(&self, name: &str) -> Option<i128> {
        self.constants.get(name).copied()
    }

    fn is_type_name(&self, name: &str) -> bool {
        self.typedefs.contains_key(name)
    }
}

/// Recursive-descent parser over preprocessed tokens.
pub struct Parser<'m> {
    tokens: Vec<Token>,
    pos: usize,
    model: &'m Model,
    typedefs: HashMap<String, Type>,
    constants: HashMap<String, i128>,
    enum_tags: HashMap<String, Vec<Enumerator>>,
    eof: Location,
}

impl<'m> Parser<'m> {
    pub fn new(tokens: Vec<Token>, model: &'m Model) -> Self {
        let eof = tokens.last().map_or_else(
            || Location::start_of(Arc::from(Path::new("<input>"))),
            |t| t.location.clone(),
        );
        Self {
            tokens,
            pos: 0,
            model,
            typedefs: HashMap::new(),
            constants: HashMap::new(),
            enum_tags: HashMap::new(),
            eof,
        }
    }

    /// Parse every external declaration in the stream.
    pub fn parse_translation_unit(mut self) -> Result<TranslationUnit> {
        let mut unit = TranslationUnit::default();
        while self.peek().is_some() {
            if self.eat_punct(";") {
                continue;
            }
            if self.peek_ident_in(&["_Static_assert", "static_assert"]) {
                self.skip_until_semicolon()?;
                continue;
            }
            let decl = self.external_declaration()?;
            unit.external_declarations.push(decl);
        }
        Ok(unit)
    }

    // --- token helpers ---

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn peek_punct(&self, p: &str) -> bool {
        self.peek().is_some_and(|t| t.is_punct(p))
    }

    fn peek_ident_in(&self, names: &[&str]) -> bool {
        self.peek()
            .and_then(Token::ident)
            .is_some_and(|name| names.contains(&name))
    }

    fn eat_punct(&mut self, p: &str) -> bool {
        if self.peek_punct(p) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, p: &str) -> Result<()> {
        if self.eat_punct(p) {
            Ok(())
        } else {
            let found = self.peek().map_or_else(|| "end of input".to_string(), |t| format!("'{}'", t.text));
            Err(self.error(&format!("expected '{p}', found {found}")))
        }
    }

    fn location(&self) -> Location {
        self.peek().map_or_else(|| self.eof.clone(), |t| t.location.clone())
    }

    fn error(&self, detail: &str) -> CParseError {
        CParseError::Syntax {
            location: self.location(),
            detail: detail.to_string(),
        }
    }

    /// Skip a bracketed group starting at the current `open` token.
    fn skip_balanced(&mut self, open: &str, close: &str) -> Result<()> {
        let start = self.location();
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            if tok.is_punct(open) {
                depth += 1;
            } else if tok.is_punct(close) {
                depth -= 1;
                if depth == 0 {
                    self.pos += 1;
                    return Ok(());
                }
            }
            self.pos += 1;
        }
        Err(CParseError::Syntax {
            location: start,
            detail: format!("unbalanced '{open}'"),
        })
    }

    /// Skip tokens up to the next top-level `,` or `;` (not consumed).
    fn skip_initializer(&mut self) -> Result<()> {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            if depth == 0 && (tok.is_punct(",") || tok.is_punct(";")) {
                return Ok(());
            }
            if tok.is_punct("(") || tok.is_punct("{") || tok.is_punct("[") {
                depth += 1;
            } else if tok.is_punct(")") || tok.is_punct("}") || tok.is_punct("]") {
                depth = depth.saturating_sub(1);
            }
            self.pos += 1;
        }
        Err(self.error("unterminated initializer"))
    }

    fn skip_until_semicolon(&mut self) -> Result<()> {
        while let Some(tok) = self.peek() {
            let end = tok.is_punct(";");
            self.pos += 1;
            if end {
                return Ok(());
            }
        }
        Err(self.error("expected ';'"))
    }

    /// Skip attributes, calling conventions and similar decorations.
    fn skip_noise(&mut self) -> Result<()> {
        loop {
            if self.peek_ident_in(NOISE) {
                self.pos += 1;
            } else if self.peek_ident_in(NOISE_WITH_ARGS) {
                self.pos += 1;
                if self.peek_punct("(") {
                    self.skip_balanced("(", ")")?;
                }
            } else if self.peek_punct("[") && self.peek_at(1).is_some_and(|t| t.is_punct("[")) {
                self.skip_balanced("[", "]")?;
            } else {
                return Ok(());
            }
        }
    }

    // --- declarations ---

    fn external_declaration(&mut self) -> Result<ExternalDeclaration> {
        let location = self.location();
        let specifiers = self.declaration_specifiers()?;
        self.skip_noise()?;
        if self.eat_punct(";") {
            return Ok(ExternalDeclaration::Declaration(Declaration {
                specifiers,
                declarators: Vec::new(),
                location,
            }));
        }

        let mut first = self.declarator(false)?;
        derive(&mut first, specifiers.ty.clone());
        self.skip_noise()?;
        let old_style = matches!(first.direct, DirectDeclarator::IdentifierList { .. });
        if self.peek_punct("{") || (old_style && !self.peek_punct(";")) {
            // Old-style parameter declarations run up to the body.
            while !self.peek_punct("{") {
                if self.peek().is_none() {
                    return Err(self.error("expected function body"));
                }
                self.pos += 1;
            }
            self.skip_balanced("{", "}")?;
            trace!(name = first.name().unwrap_or_default(), "skipping function definition");
            return Ok(ExternalDeclaration::FunctionDefinition(FunctionDefinition {
                specifiers,
                declarator: first,
                location,
            }));
        }

        let mut declarators = vec![first];
        loop {
            self.skip_noise()?;
            if self.eat_punct("=") {
                self.skip_initializer()?;
            }
            if !self.eat_punct(",") {
                break;
            }
            let mut next = self.declarator(false)?;
            derive(&mut next, specifiers.ty.clone());
            declarators.push(next);
        }
        self.expect_punct(";")?;

        if specifiers.storage == Some(StorageClass::Typedef) {
            for declarator in &mut declarators {
                let Some(name) = declarator.name().map(str::to_string) else {
                    continue;
                };
                declarator.ty = declarator.ty.clone().with_typedef_name(name.as_str());
                trace!(name = %name, ty = %declarator.ty, "typedef");
                self.typedefs.insert(name, declarator.ty.clone());
            }
        }

        Ok(ExternalDeclaration::Declaration(Declaration {
            specifiers,
            declarators,
            location,
        }))
    }

    fn declaration_specifiers(&mut self) -> Result<DeclarationSpecifiers> {
        let mut set = SpecifierSet::default();
        while let Some(name) = self.peek().and_then(Token::ident).map(str::to_string) {
            let name = name.as_str();
            if let Some(class) = storage_class(name) {
                set.storage = Some(class);
                self.pos += 1;
            } else if FUNCTION_SPECIFIERS.contains(&name) {
                set.is_inline = true;
                self.pos += 1;
            } else if QUALIFIERS.contains(&name) {
                set.is_const |= name.contains("const");
                self.pos += 1;
            } else if NOISE.contains(&name) || NOISE_WITH_ARGS.contains(&name) {
                self.skip_noise()?;
            } else if TYPE_SPECIFIERS.contains(&name) {
                self.pos += 1;
                match name {
                    "void" => set.void = true,
                    "char" => set.char = true,
                    "short" => set.short = true,
                    "int" => set.int = true,
                    "long" => set.long += 1,
                    "float" => set.float = true,
                    "double" => set.double = true,
                    "signed" | "__signed" | "__signed__" => set.signed = true,
                    "unsigned" => set.unsigned = true,
                    "_Bool" => set.boolean = true,
                    "_Complex" | "__complex__" => set.complex = true,
                    "struct" | "union" => {
                        let ty = self.struct_or_union(name == "struct", &mut set.defines_body)?;
                        set.named = Some(ty);
                    }
                    _ => {
                        let ty = self.enum_specifier(&mut set.defines_body)?;
                        set.named = Some(ty);
                    }
                }
            } else if !set.has_type() {
                set.named = Some(self.typedef_name(name));
                self.pos += 1;
            } else {
                break;
            }
        }

        let location = self.location();
        set.resolve().ok_or(CParseError::Syntax {
            location,
            detail: "expected type specifier".to_string(),
        })
    }

    /// Type named by an identifier in type position.
    fn typedef_name(&self, name: &str) -> Type {
        if let Some(ty) = self.typedefs.get(name) {
            ty.clone().with_typedef_name(name)
        } else if let Some(kind) = self.model.builtin_typedef(name) {
            Type::scalar(kind).with_typedef_name(name)
        } else {
            trace!(name, "unresolved typedef name");
            Type::unresolved_typedef(name)
        }
    }

    fn struct_or_union(&mut self, is_struct: bool, defines_body: &mut bool) -> Result<Type> {
        self.skip_noise()?;
        let tag = self.take_identifier();
        if self.peek_punct("{") {
            self.skip_balanced("{", "}")?;
            *defines_body = true;
        } else if tag.is_none() {
            return Err(self.error("expected tag or body after struct/union"));
        }
        Ok(if is_struct {
            Type::structure(tag)
        } else {
            Type::union(tag)
        })
    }

    fn enum_specifier(&mut self, defines_body: &mut bool) -> Result<Type> {
        self.skip_noise()?;
        let tag = self.take_identifier();
        if !self.eat_punct("{") {
            let tag = tag.ok_or_else(|| self.error("expected tag or body after enum"))?;
            let enumerators = self.enum_tags.get(&tag).cloned().unwrap_or_default();
            return Ok(Type::enumeration(Some(tag), enumerators));
        }

        let mut enumerators = Vec::new();
        let mut next: i128 = 0;
        loop {
            if self.eat_punct("}") {
                break;
            }
            let name = self
                .take_identifier()
                .ok_or_else(|| self.error("expected enumerator name"))?;
            self.skip_noise()?;
            let value = if self.eat_punct("=") {
                self.constant_expression(&[",", "}"])?
            } else {
                next
            };
            self.constants.insert(name.clone(), value);
            enumerators.push(Enumerator { name, value });
            next = value.wrapping_add(1);
            if !self.eat_punct(",") {
                self.expect_punct("}")?;
                break;
            }
        }

        *defines_body = true;
        if let Some(tag) = &tag {
            self.enum_tags.insert(tag.clone(), enumerators.clone());
        }
        Ok(Type::enumeration(tag, enumerators))
    }

    fn take_identifier(&mut self) -> Option<String> {
        let name = self.peek().and_then(Token::ident)?.to_string();
        self.pos += 1;
        Some(name)
    }

    /// Evaluate the constant expression ending at one of `terminators`
    /// (left unconsumed). `sizeof(type)` is computed from the model.
    fn constant_expression(&mut self, terminators: &[&str]) -> Result<i128> {
        let start = self.location();
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        loop {
            let Some(tok) = self.peek() else {
                return Err(self.error("unterminated constant expression"));
            };
            if depth == 0 && tok.kind == TokenKind::Punct && terminators.contains(&tok.text.as_str()) {
                break;
            }
            if tok.is_ident("sizeof") {
                let location = tok.location.clone();
                self.pos += 1;
                self.expect_punct("(")?;
                let ty = self.type_name()?;
                self.expect_punct(")")?;
                let size = self.model.size_of(&ty).ok_or_else(|| CParseError::ConstantExpression {
                    location: location.clone(),
                    detail: format!("size of '{ty}' is unknown"),
                })?;
                tokens.push(Token::new(TokenKind::Number, size.to_string(), location));
                continue;
            }
            if tok.is_punct("(") || tok.is_punct("[") || tok.is_punct("{") {
                depth += 1;
            } else if tok.is_punct(")") || tok.is_punct("]") || tok.is_punct("}") {
                depth = depth.saturating_sub(1);
            }
            tokens.push(tok.clone());
            self.pos += 1;
        }

        let scope = Scope {
            constants: &self.constants,
            typedefs: &self.typedefs,
        };
        expr::evaluate(&tokens, &scope, &start)
    }

    /// A type name as used in `sizeof(...)`: specifiers plus an abstract declarator.
    fn type_name(&mut self) -> Result<Type> {
        let specifiers = self.declaration_specifiers()?;
        let mut declarator = self.declarator(true)?;
        Ok(derive(&mut declarator, specifiers.ty))
    }

    // --- declarators ---

    fn declarator(&mut self, abstract_ok: bool) -> Result<Declarator> {
        self.skip_noise()?;
        let mut pointer_depth = 0;
        while self.eat_punct("*") {
            pointer_depth += 1;
            while self.peek_ident_in(QUALIFIERS) {
                self.pos += 1;
            }
            self.skip_noise()?;
        }
        let direct = self.direct_declarator(abstract_ok)?;
        Ok(Declarator {
            pointer_depth,
            direct,
            ty: Type::undefined(),
        })
    }

    fn direct_declarator(&mut self, abstract_ok: bool) -> Result<DirectDeclarator> {
        self.skip_noise()?;
        let mut direct = match self.peek() {
            Some(tok) if tok.kind == TokenKind::Identifier && !is_reserved(&tok.text) => {
                let tok = tok.clone();
                self.pos += 1;
                DirectDeclarator::Identifier(Some(tok))
            }
            Some(tok) if tok.is_punct("(") && self.paren_starts_declarator(abstract_ok) => {
                self.pos += 1;
                let inner = self.declarator(abstract_ok)?;
                self.expect_punct(")")?;
                DirectDeclarator::Parenthesized(Box::new(inner))
            }
            _ if abstract_ok => DirectDeclarator::Identifier(None),
            _ => return Err(self.error("expected identifier in declarator")),
        };

        loop {
            self.skip_noise()?;
            if self.eat_punct("[") {
                while self.peek_ident_in(QUALIFIERS) || self.peek_ident_in(&["static"]) {
                    self.pos += 1;
                }
                let length = if self.eat_punct("]") {
                    None
                } else if self.peek_punct("*") && self.peek_at(1).is_some_and(|t| t.is_punct("]")) {
                    self.pos += 2;
                    None
                } else {
                    let location = self.location();
                    let value = self.constant_expression(&["]"])?;
                    self.expect_punct("]")?;
                    let length = u64::try_from(value).map_err(|_| CParseError::Syntax {
                        location,
                        detail: format!("array length {value} is negative"),
                    })?;
                    Some(length)
                };
                direct = DirectDeclarator::Array {
                    base: Box::new(direct),
                    length,
                };
            } else if self.eat_punct("(") {
                if !abstract_ok && self.starts_identifier_list() {
                    let identifiers = self.identifier_list()?;
                    direct = DirectDeclarator::IdentifierList {
                        base: Box::new(direct),
                        identifiers,
                    };
                    continue;
                }
                let parameters = self.parameter_type_list()?;
                direct = DirectDeclarator::Function {
                    base: Box::new(direct),
                    parameters,
                };
            } else {
                return Ok(direct);
            }
        }
    }

    /// Whether the `(` at the cursor opens a nested declarator rather than a
    /// parameter list.
    fn paren_starts_declarator(&self, abstract_ok: bool) -> bool {
        let Some(next) = self.peek_at(1) else {
            return false;
        };
        if next.is_punct("*") || next.is_punct("(") || next.is_punct("[") {
            return true;
        }
        match next.ident() {
            Some(name) if !abstract_ok => {
                !TYPE_SPECIFIERS.contains(&name) && !QUALIFIERS.contains(&name)
            }
            Some(name) => !self.starts_type(name),
            None => false,
        }
    }

    fn starts_type(&self, name: &str) -> bool {
        TYPE_SPECIFIERS.contains(&name)
            || QUALIFIERS.contains(&name)
            || self.typedefs.contains_key(name)
            || self.model.builtin_typedef(name).is_some()
    }

    /// Whether the tokens after a consumed `(` are an old-style identifier
    /// list such as `(a, b)`.
    fn starts_identifier_list(&self) -> bool {
        let Some(name) = self.peek().and_then(Token::ident) else {
            return false;
        };
        !is_reserved(name)
            && !self.starts_type(name)
            && self.peek_at(1).is_some_and(|t| t.is_punct(",") || t.is_punct(")"))
    }

    fn identifier_list(&mut self) -> Result<Vec<Token>> {
        let mut identifiers = Vec::new();
        loop {
            match self.peek() {
                Some(tok) if tok.kind == TokenKind::Identifier => {
                    identifiers.push(tok.clone());
                    self.pos += 1;
                }
                _ => return Err(self.error("expected identifier in identifier list")),
            }
            if !self.eat_punct(",") {
                self.expect_punct(")")?;
                return Ok(identifiers);
            }
        }
    }

    /// Parameters after a consumed `(`, through the closing `)`.
    fn parameter_type_list(&mut self) -> Result<ParameterTypeList> {
        let mut list = ParameterTypeList::default();
        if self.eat_punct(")") {
            return Ok(list);
        }
        loop {
            if self.eat_punct("...") {
                list.variadic = true;
                self.expect_punct(")")?;
                return Ok(list);
            }
            let specifiers = self.declaration_specifiers()?;
            self.skip_noise()?;
            let mut declarator = if self.peek_punct(",") || self.peek_punct(")") {
                None
            } else {
                Some(self.declarator(true)?)
            };
            self.skip_noise()?;
            let ty = match declarator.as_mut() {
                Some(d) => derive(d, specifiers.ty.clone()),
                None => specifiers.ty.clone(),
            };
            list.parameters.push(ParameterDeclaration {
                specifiers,
                declarator,
                ty,
            });
            if !self.eat_punct(",") {
                self.expect_punct(")")?;
                return Ok(list);
            }
        }
    }
}

/// Apply the declarator's derivations to `base`, recording the result on
/// every declarator level, and return the declared entity's type.
fn derive(declarator: &mut Declarator, base: Type) -> Type {
    let mut ty = base;
    for _ in 0..declarator.pointer_depth {
        ty = Type::pointer_to(ty);
    }
    let ty = derive_direct(&mut declarator.direct, ty);
    declarator.ty = ty.clone();
    ty
}

fn derive_direct(direct: &mut DirectDeclarator, ty: Type) -> Type {
    match direct {
        DirectDeclarator::Identifier(_) => ty,
        DirectDeclarator::Parenthesized(inner) => derive(inner, ty),
        DirectDeclarator::Array { base, length } => {
            let array = Type::array_of(ty, *length);
            derive_direct(base, array)
        }
        DirectDeclarator::Function { base, parameters } => {
            let params = if parameters.is_void() {
                Vec::new()
            } else {
                parameters.parameters.iter().map(|p| p.ty.clone()).collect()
            };
            let function = Type::function(ty, params, parameters.variadic);
            derive_direct(base, function)
        }
        DirectDeclarator::IdentifierList { base, .. } => {
            derive_direct(base, Type::function(ty, Vec::new(), false))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(src: &str) -> TranslationUnit {
        try_parse(src).unwrap()
    }

    fn try_parse(src: &str) -> Result<TranslationUnit> {
        let tokens = tokenize(src, Arc::from(Path::new("test.h")))?;
        let model = Model::lp64();
        Parser::new(tokens, &model).parse_translation_unit()
    }

    fn declarations(unit: &TranslationUnit) -> Vec<&Declaration> {
        unit.external_declarations
            .iter()
            .filter_map(|d| match d {
                ExternalDeclaration::Declaration(decl) => Some(decl),
                ExternalDeclaration::FunctionDefinition(_) => None,
            })
            .collect()
    }

    fn first_declarator(unit: &TranslationUnit, index: usize) -> &Declarator {
        &declarations(unit)[index].declarators[0]
    }

    #[test]
    fn parse_function_prototype() {
        let unit = parse("int add(int a, int b);");
        let d = first_declarator(&unit, 0);
        assert_eq!(d.name(), Some("add"));
        assert_eq!(d.ty.kind(), Kind::Function);
        assert_eq!(d.ty.result().unwrap().kind(), Kind::Int);
        let params = d.parameter_type_list().unwrap();
        assert_eq!(params.parameters.len(), 2);
        assert_eq!(params.parameters[1].declarator.as_ref().unwrap().name(), Some("b"));
    }

    #[test]
    fn void_parameter_list() {
        let unit = parse("void vgFlush(void);");
        let params = first_declarator(&unit, 0).parameter_type_list().unwrap();
        assert!(params.is_void());
        assert!(first_declarator(&unit, 0).ty.params().is_empty());
    }

    #[test]
    fn typedefs_resolve_with_names() {
        let unit = parse("typedef float VGfloat;\nvoid f(const VGfloat *values);");
        let d = first_declarator(&unit, 1);
        let param = &d.parameter_type_list().unwrap().parameters[0];
        assert_eq!(param.ty.kind(), Kind::Ptr);
        assert!(!param.ty.is_typedef());
        let element = param.ty.element().unwrap();
        assert_eq!(element.kind(), Kind::Float);
        assert_eq!(element.typedef_name(), Some("VGfloat"));
        assert!(element.is_const());
    }

    #[test]
    fn typedef_enum_with_values() {
        let unit = parse(
            "typedef enum {\n  VG_A = 0x1000,\n  VG_B,\n  VG_C = VG_A + 16,\n  VG_MAX = 0x7FFFFFFF\n} VGMode;",
        );
        let d = first_declarator(&unit, 0);
        assert_eq!(d.name(), Some("VGMode"));
        assert_eq!(d.ty.kind(), Kind::Enum);
        let values: Vec<(String, i128)> =
            d.ty.enumerators().iter().map(|e| (e.name.clone(), e.value)).collect();
        assert_eq!(
            values,
            vec![
                ("VG_A".to_string(), 0x1000),
                ("VG_B".to_string(), 0x1001),
                ("VG_C".to_string(), 0x1010),
                ("VG_MAX".to_string(), 0x7FFF_FFFF),
            ]
        );
        assert!(declarations(&unit)[0].specifiers.defines_body);
    }

    #[test]
    fn tagged_enum_without_declarator() {
        let unit = parse("enum Color { RED, GREEN, BLUE };\nenum Color paint(enum Color c);");
        let decl = declarations(&unit)[0];
        assert!(decl.declarators.is_empty());
        assert_eq!(decl.specifiers.ty.tag(), Some("Color"));
        assert_eq!(decl.specifiers.ty.enumerators().len(), 3);
        let f = first_declarator(&unit, 1);
        assert_eq!(f.ty.result().unwrap().enumerators()[2].value, 2);
        assert!(!declarations(&unit)[1].specifiers.defines_body);
    }

    #[test]
    fn array_parameter() {
        let unit = parse("void setColor(const float rgba[4]);");
        let param = &first_declarator(&unit, 0).parameter_type_list().unwrap().parameters[0];
        assert_eq!(param.ty.kind(), Kind::Array);
        assert_eq!(param.ty.elements(), Some(4));
        assert_eq!(param.ty.element().unwrap().kind(), Kind::Float);
    }

    #[test]
    fn array_length_uses_sizeof_and_constants() {
        let unit = parse("enum { N = 3 };\nvoid f(int m[N * 2], char b[sizeof(int)], int open[]);");
        let params = &first_declarator(&unit, 1).parameter_type_list().unwrap().parameters;
        assert_eq!(params[0].ty.elements(), Some(6));
        assert_eq!(params[1].ty.elements(), Some(4));
        assert_eq!(params[2].ty.elements(), None);
    }

    #[test]
    fn function_pointer_is_not_a_function() {
        let unit = parse("int (*callback)(int);\nint *make(void);");
        let fp = first_declarator(&unit, 0);
        assert!(fp.parameter_type_list().is_none());
        assert_eq!(fp.ty.kind(), Kind::Ptr);
        assert_eq!(fp.ty.element().unwrap().kind(), Kind::Function);

        let make = first_declarator(&unit, 1);
        assert!(make.parameter_type_list().is_some());
        assert_eq!(make.ty.result().unwrap().kind(), Kind::Ptr);
    }

    #[test]
    fn function_returning_function_pointer() {
        let unit = parse("void (*getHandler(int code))(int);");
        let d = first_declarator(&unit, 0);
        assert_eq!(d.name(), Some("getHandler"));
        let params = d.parameter_type_list().unwrap();
        assert_eq!(params.parameters.len(), 1);
        assert_eq!(params.parameters[0].declarator.as_ref().unwrap().name(), Some("code"));
        assert_eq!(d.ty.result().unwrap().kind(), Kind::Ptr);
    }

    #[test]
    fn abstract_parameters() {
        let unit = parse("void f(int, float *, char [8]);");
        let params = &first_declarator(&unit, 0).parameter_type_list().unwrap().parameters;
        assert!(params[0].declarator.is_none());
        assert_eq!(params[1].ty.kind(), Kind::Ptr);
        assert_eq!(params[1].declarator.as_ref().unwrap().name(), None);
        assert_eq!(params[2].ty.elements(), Some(8));
    }

    #[test]
    fn arithmetic_specifier_combinations() {
        let unit = parse(
            "unsigned long long a; long double b; signed char c; unsigned short d; long e; unsigned f; _Bool g; double _Complex h;",
        );
        let kinds: Vec<Kind> = declarations(&unit)
            .iter()
            .map(|d| d.declarators[0].ty.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                Kind::ULongLong,
                Kind::LongDouble,
                Kind::SChar,
                Kind::UShort,
                Kind::Long,
                Kind::UInt,
                Kind::Bool,
                Kind::DoubleComplex,
            ]
        );
    }

    #[test]
    fn unknown_type_names_are_unresolved_typedefs() {
        let unit = parse("void f(khronos_float_t x, uint32_t y);");
        let params = &first_declarator(&unit, 0).parameter_type_list().unwrap().parameters;
        assert_eq!(params[0].ty.kind(), Kind::TypedefName);
        assert_eq!(params[1].ty.kind(), Kind::UInt);
        assert_eq!(params[1].ty.typedef_name(), Some("uint32_t"));
    }

    #[test]
    fn struct_bodies_and_definitions_are_skipped() {
        let unit = parse(
            "typedef struct VGPath { int x; struct { int y; } inner; } *VGPathPtr;\nstatic inline int twice(int v) { return v * 2; }\nvoid g(VGPathPtr p);",
        );
        assert_eq!(unit.external_declarations.len(), 3);
        assert!(matches!(
            unit.external_declarations[1],
            ExternalDeclaration::FunctionDefinition(_)
        ));
        let p = &first_declarator(&unit, 1).parameter_type_list().unwrap().parameters[0];
        assert_eq!(p.ty.kind(), Kind::Ptr);
        assert_eq!(p.ty.typedef_name(), Some("VGPathPtr"));
        assert_eq!(p.ty.element().unwrap().tag(), Some("VGPath"));
    }

    #[test]
    fn attributes_and_initializers_are_ignored() {
        let unit = parse(
            "__attribute__((visibility(\"default\"))) void f(void) __attribute__((deprecated));\nstatic const int table[2] = { 1, 2 }, other = 3;",
        );
        assert_eq!(first_declarator(&unit, 0).name(), Some("f"));
        assert_eq!(declarations(&unit)[1].declarators.len(), 2);
    }

    #[test]
    fn variadic_prototype() {
        let unit = parse("int printf(const char *fmt, ...);");
        let d = first_declarator(&unit, 0);
        assert!(d.parameter_type_list().unwrap().variadic);
        assert!(d.ty.is_variadic());
    }

    #[test]
    fn old_style_definition_is_skipped() {
        let unit = parse("int legacy(a, b) int a; char *b; { return a; }\nint sum(x, y);");
        assert!(matches!(
            unit.external_declarations[0],
            ExternalDeclaration::FunctionDefinition(_)
        ));
        let sum = first_declarator(&unit, 0);
        assert_eq!(sum.name(), Some("sum"));
        assert!(sum.parameter_type_list().is_none());
        assert_eq!(sum.ty.kind(), Kind::Function);
    }

    #[test]
    fn syntax_errors_carry_location() {
        let err = try_parse("int f(int a;\n").unwrap_err();
        match err {
            CParseError::Syntax { location, .. } => assert_eq!(location.line, 1),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }
}
