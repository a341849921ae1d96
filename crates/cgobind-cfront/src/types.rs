//! C type representation.
//!
//! A [`Type`] is an immutable tree. Besides its structure it remembers the
//! typedef name it was spelled through, which binding generators need to
//! name the native type at a call boundary.

use std::fmt;

/// Closed set of C type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Undefined,
    Void,
    Ptr,
    /// Unsigned integer wide enough to hold a pointer (`uintptr_t`).
    UintPtr,
    Char,
    SChar,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Float,
    Double,
    LongDouble,
    Bool,
    FloatComplex,
    DoubleComplex,
    LongDoubleComplex,
    Struct,
    Union,
    Enum,
    /// A typedef name whose definition was never seen.
    TypedefName,
    Function,
    Array,
}

impl Kind {
    /// Every arithmetic kind, in declaration order.
    pub const ARITHMETIC: [Kind; 19] = [
        Kind::UintPtr,
        Kind::Char,
        Kind::SChar,
        Kind::UChar,
        Kind::Short,
        Kind::UShort,
        Kind::Int,
        Kind::UInt,
        Kind::Long,
        Kind::ULong,
        Kind::LongLong,
        Kind::ULongLong,
        Kind::Float,
        Kind::Double,
        Kind::LongDouble,
        Kind::Bool,
        Kind::FloatComplex,
        Kind::DoubleComplex,
        Kind::LongDoubleComplex,
    ];

    /// Whether this is an integer, floating, complex or boolean kind.
    pub fn is_arithmetic(self) -> bool {
        Self::ARITHMETIC.contains(&self)
    }
}

/// One named constant of an enumerated type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerator {
    pub name: String,
    pub value: i128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Repr {
    Scalar(Kind),
    Pointer(Box<Type>),
    Array {
        element: Box<Type>,
        length: Option<u64>,
    },
    Function {
        result: Box<Type>,
        params: Vec<Type>,
        variadic: bool,
    },
    Struct(Option<String>),
    Union(Option<String>),
    Enum {
        tag: Option<String>,
        enumerators: Vec<Enumerator>,
    },
    TypedefName(String),
}

/// A C type as seen at one point of use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    repr: Repr,
    typedef_name: Option<String>,
    is_const: bool,
}

impl Type {
    fn from_repr(repr: Repr) -> Self {
        Self {
            repr,
            typedef_name: None,
            is_const: false,
        }
    }

    /// An arithmetic type, `void`, or the undefined type.
    pub fn scalar(kind: Kind) -> Self {
        debug_assert!(kind.is_arithmetic() || matches!(kind, Kind::Void | Kind::Undefined));
        Self::from_repr(Repr::Scalar(kind))
    }

    pub fn void() -> Self {
        Self::scalar(Kind::Void)
    }

    pub fn undefined() -> Self {
        Self::scalar(Kind::Undefined)
    }

    pub fn pointer_to(element: Type) -> Self {
        Self::from_repr(Repr::Pointer(Box::new(element)))
    }

    /// Array of `length` elements; `None` for `[]`.
    pub fn array_of(element: Type, length: Option<u64>) -> Self {
        Self::from_repr(Repr::Array {
            element: Box::new(element),
            length,
        })
    }

    pub fn function(result: Type, params: Vec<Type>, variadic: bool) -> Self {
        Self::from_repr(Repr::Function {
            result: Box::new(result),
            params,
            variadic,
        })
    }

    pub fn structure(tag: Option<String>) -> Self {
        Self::from_repr(Repr::Struct(tag))
    }

    pub fn union(tag: Option<String>) -> Self {
        Self::from_repr(Repr::Union(tag))
    }

    pub fn enumeration(tag: Option<String>, enumerators: Vec<Enumerator>) -> Self {
        Self::from_repr(Repr::Enum { tag, enumerators })
    }

    /// A typedef name with no visible definition.
    pub fn unresolved_typedef(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::from_repr(Repr::TypedefName(name.clone())).with_typedef_name(name)
    }

    /// The same type, spelled through the typedef `name`.
    pub fn with_typedef_name(mut self, name: impl Into<String>) -> Self {
        self.typedef_name = Some(name.into());
        self
    }

    /// The same type with a `const` qualifier.
    pub fn with_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn kind(&self) -> Kind {
        match &self.repr {
            Repr::Scalar(kind) => *kind,
            Repr::Pointer(_) => Kind::Ptr,
            Repr::Array { .. } => Kind::Array,
            Repr::Function { .. } => Kind::Function,
            Repr::Struct(_) => Kind::Struct,
            Repr::Union(_) => Kind::Union,
            Repr::Enum { .. } => Kind::Enum,
            Repr::TypedefName(_) => Kind::TypedefName,
        }
    }

    /// Pointee or array element type.
    pub fn element(&self) -> Option<&Type> {
        match &self.repr {
            Repr::Pointer(element) | Repr::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Declared array length; `None` for non-arrays and `[]`.
    pub fn elements(&self) -> Option<u64> {
        match &self.repr {
            Repr::Array { length, .. } => *length,
            _ => None,
        }
    }

    /// Result type of a function type.
    pub fn result(&self) -> Option<&Type> {
        match &self.repr {
            Repr::Function { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Parameter types of a function type (empty otherwise).
    pub fn params(&self) -> &[Type] {
        match &self.repr {
            Repr::Function { params, .. } => params,
            _ => &[],
        }
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self.repr, Repr::Function { variadic: true, .. })
    }

    /// Constants of an enumerated type, in declaration order.
    pub fn enumerators(&self) -> &[Enumerator] {
        match &self.repr {
            Repr::Enum { enumerators, .. } => enumerators,
            _ => &[],
        }
    }

    /// Tag of a struct, union or enum type.
    pub fn tag(&self) -> Option<&str> {
        match &self.repr {
            Repr::Struct(tag) | Repr::Union(tag) | Repr::Enum { tag, .. } => tag.as_deref(),
            _ => None,
        }
    }

    /// The typedef name this type was spelled through, if any.
    pub fn typedef_name(&self) -> Option<&str> {
        self.typedef_name.as_deref()
    }

    pub fn is_typedef(&self) -> bool {
        self.typedef_name.is_some()
    }

    pub fn is_const(&self) -> bool {
        self.is_const
    }

    pub fn is_void(&self) -> bool {
        self.kind() == Kind::Void
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        if let Some(name) = &self.typedef_name {
            return write!(f, "{name}");
        }
        match &self.repr {
            Repr::Scalar(kind) => write!(f, "{}", scalar_spelling(*kind)),
            Repr::Pointer(element) => write!(f, "{element}*"),
            Repr::Array { element, length } => match length {
                Some(n) => write!(f, "{element}[{n}]"),
                None => write!(f, "{element}[]"),
            },
            Repr::Function {
                result,
                params,
                variadic,
            } => {
                write!(f, "{result}(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                if *variadic {
                    write!(f, "{}...", if params.is_empty() { "" } else { ", " })?;
                }
                write!(f, ")")
            }
            Repr::Struct(tag) => write!(f, "struct {}", tag.as_deref().unwrap_or("<anonymous>")),
            Repr::Union(tag) => write!(f, "union {}", tag.as_deref().unwrap_or("<anonymous>")),
            Repr::Enum { tag, .. } => write!(f, "enum {}", tag.as_deref().unwrap_or("<anonymous>")),
            Repr::TypedefName(name) => write!(f, "{name}"),
        }
    }
}

fn scalar_spelling(kind: Kind) -> &'static str {
    match kind {
        Kind::Void => "void",
        Kind::UintPtr => "uintptr_t",
        Kind::Char => "char",
        Kind::SChar => "signed char",
        Kind::UChar => "unsigned char",
        Kind::Short => "short",
        Kind::UShort => "unsigned short",
        Kind::Int => "int",
        Kind::UInt => "unsigned int",
        Kind::Long => "long",
        Kind::ULong => "unsigned long",
        Kind::LongLong => "long long",
        Kind::ULongLong => "unsigned long long",
        Kind::Float => "float",
        Kind::Double => "double",
        Kind::LongDouble => "long double",
        Kind::Bool => "_Bool",
        Kind::FloatComplex => "float _Complex",
        Kind::DoubleComplex => "double _Complex",
        Kind::LongDoubleComplex => "long double _Complex",
        _ => "<undefined>",
    }
}
