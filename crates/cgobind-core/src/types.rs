//! Mapping of C types to Go types at the cgo boundary.
//!
//! [`BindType`] answers three independent questions about a C type: the Go
//! type exposed in a binding's signature ([`BindType::go_type`]), whether a
//! value must be converted when passed to or returned from the native call
//! ([`BindType::requires_cast`]), and the cgo type to convert it to
//! ([`BindType::cgo_type`]). The answers differ for typedefs: a typedef is
//! exposed as its Go equivalent but the native symbol still expects the C
//! typedef.
//!
//! `long` and `unsigned long` map to 32-bit Go integers regardless of the
//! data model. Arrays declared without a length, or with length zero, are
//! treated as pointers to their element.

use cgobind_cfront::{Kind, Type};

use crate::ident::typedef_name_of;
use crate::naming::Namer;
use crate::record::Enum;
use crate::sanitize::bless_name;

/// Borrowed view of a C type with all mapping decisions derived on demand.
#[derive(Debug, Clone, Copy)]
pub struct BindType<'a> {
    ty: &'a Type,
}

impl<'a> BindType<'a> {
    pub fn new(ty: &'a Type) -> Self {
        Self { ty }
    }

    /// Kind used for mapping. Unsized and zero-length arrays report
    /// [`Kind::Ptr`].
    pub fn kind(&self) -> Kind {
        match self.ty.kind() {
            Kind::Array if self.array_length().is_none() => Kind::Ptr,
            kind => kind,
        }
    }

    /// Pointee or array element.
    pub fn element(&self) -> Option<BindType<'a>> {
        self.ty.element().map(BindType::new)
    }

    pub fn is_typedef(&self) -> bool {
        self.ty.is_typedef()
    }

    pub fn is_void(&self) -> bool {
        self.kind() == Kind::Void
    }

    fn array_length(&self) -> Option<u64> {
        self.ty.elements().filter(|&n| n > 0)
    }

    /// Go type exposed in binding signatures.
    pub fn go_type(&self, namer: &dyn Namer) -> String {
        match self.kind() {
            Kind::Ptr => match self.element() {
                Some(element) => format!("*{}", element.go_type(namer)),
                None => "unsafe.Pointer".to_string(),
            },
            Kind::Array => match (self.array_length(), self.element()) {
                (Some(n), Some(element)) => format!("[{n}]{}", element.go_type(namer)),
                _ => "undefined".to_string(),
            },
            Kind::Enum => match self.enum_identifier() {
                Some(identifier) => namer.enum_name(&Enum::named(identifier)),
                None => "int32".to_string(),
            },
            Kind::TypedefName => namer.type_name(&typedef_name_of(self.ty)),
            Kind::Struct => "struct".to_string(),
            Kind::Union => "union".to_string(),
            Kind::Function => "func".to_string(),
            Kind::Undefined => "undefined".to_string(),
            Kind::Void
            | Kind::UintPtr
            | Kind::Char
            | Kind::SChar
            | Kind::UChar
            | Kind::Short
            | Kind::UShort
            | Kind::Int
            | Kind::UInt
            | Kind::Long
            | Kind::ULong
            | Kind::LongLong
            | Kind::ULongLong
            | Kind::Float
            | Kind::Double
            | Kind::LongDouble
            | Kind::Bool
            | Kind::FloatComplex
            | Kind::DoubleComplex
            | Kind::LongDoubleComplex => scalar_go_type(self.kind()).to_string(),
        }
    }

    /// Whether a value of this type must be converted at the native call.
    pub fn requires_cast(&self) -> bool {
        if self.is_typedef() {
            return true;
        }
        match self.kind() {
            Kind::Ptr | Kind::Array => self.element().is_some_and(|e| e.requires_cast()),
            Kind::Struct | Kind::Union | Kind::Enum | Kind::TypedefName | Kind::Function => true,
            Kind::Undefined
            | Kind::Void
            | Kind::UintPtr
            | Kind::Char
            | Kind::SChar
            | Kind::UChar
            | Kind::Short
            | Kind::UShort
            | Kind::Int
            | Kind::UInt
            | Kind::Long
            | Kind::ULong
            | Kind::LongLong
            | Kind::ULongLong
            | Kind::Float
            | Kind::Double
            | Kind::LongDouble
            | Kind::Bool
            | Kind::FloatComplex
            | Kind::DoubleComplex
            | Kind::LongDoubleComplex => false,
        }
    }

    /// The cgo type a value is converted to before the native call.
    pub fn cgo_type(&self) -> String {
        if let Some(name) = self.ty.typedef_name() {
            return format!("C.{}", bless_name(name));
        }
        match self.kind() {
            Kind::Array => match (self.array_length(), self.element()) {
                (Some(n), Some(element)) => format!("[{n}]{}", element.cgo_type()),
                _ => "undefined".to_string(),
            },
            Kind::Ptr => match self.element() {
                Some(element) => format!("*{}", element.cgo_type()),
                None => "unsafe.Pointer".to_string(),
            },
            Kind::Enum => match self.ty.tag() {
                Some(tag) => format!("C.enum_{tag}"),
                None => "C.int".to_string(),
            },
            Kind::Struct => match self.ty.tag() {
                Some(tag) => format!("C.struct_{tag}"),
                None => "struct".to_string(),
            },
            Kind::Union => match self.ty.tag() {
                Some(tag) => format!("C.union_{tag}"),
                None => "union".to_string(),
            },
            Kind::TypedefName => format!("C.{}", typedef_name_of(self.ty)),
            Kind::Function => "func".to_string(),
            Kind::Undefined => "undefined".to_string(),
            kind => scalar_go_type(kind).to_string(),
        }
    }

    /// Whether the argument is passed as `unsafe.Pointer`: an untyped
    /// pointer that needs no other conversion.
    pub fn passes_unsafe_pointer(&self) -> bool {
        !self.requires_cast() && self.kind() == Kind::Ptr && !self.is_typedef()
    }

    /// Name identifying an enum type: its typedef name, else its tag.
    fn enum_identifier(&self) -> Option<String> {
        let name = typedef_name_of(self.ty);
        if !name.is_empty() {
            return Some(name);
        }
        self.ty.tag().map(bless_name)
    }
}

/// Go primitive for a scalar kind.
fn scalar_go_type(kind: Kind) -> &'static str {
    match kind {
        Kind::Void => "byte",
        Kind::UintPtr => "uintptr",
        Kind::Char | Kind::SChar => "int8",
        Kind::UChar => "uint8",
        Kind::Short => "int16",
        Kind::UShort => "uint16",
        Kind::Int | Kind::Long => "int32",
        Kind::UInt | Kind::ULong => "uint32",
        Kind::LongLong => "int64",
        Kind::ULongLong => "uint64",
        Kind::Float => "float32",
        Kind::Double | Kind::LongDouble => "float64",
        Kind::Bool => "bool",
        Kind::FloatComplex => "complex64",
        Kind::DoubleComplex | Kind::LongDoubleComplex => "complex128",
        _ => "???",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::naming::{DefaultNamer, PrefixNamer};

    fn go(ty: &Type) -> String {
        BindType::new(ty).go_type(&DefaultNamer)
    }

    fn scalar(kind: Kind) -> Type {
        Type::scalar(kind)
    }

    #[test]
    fn arithmetic_mapping_is_total_and_distinct() {
        let mut seen = HashSet::new();
        for kind in Kind::ARITHMETIC {
            let name = go(&scalar(kind));
            assert_ne!(name, "???", "{kind:?} unmapped");
            assert_eq!(name, go(&scalar(kind)));
            seen.insert((name, kind_class(kind)));
        }
        // Aliased kinds share a name only when width and signedness agree.
        let names: HashSet<String> = seen.iter().map(|(name, _)| name.clone()).collect();
        assert_eq!(names.len(), seen.len());
    }

    /// Width and signedness class used to check that only equivalent kinds
    /// share a Go primitive.
    fn kind_class(kind: Kind) -> &'static str {
        match kind {
            Kind::Char | Kind::SChar => "i8",
            Kind::Int | Kind::Long => "i32",
            Kind::UInt | Kind::ULong => "u32",
            Kind::Double | Kind::LongDouble => "f64",
            Kind::DoubleComplex | Kind::LongDoubleComplex => "c128",
            other => scalar_go_type(other),
        }
    }

    #[test]
    fn long_is_thirty_two_bits() {
        assert_eq!(go(&scalar(Kind::Long)), "int32");
        assert_eq!(go(&scalar(Kind::ULong)), "uint32");
        assert_eq!(go(&scalar(Kind::LongLong)), "int64");
    }

    #[test]
    fn pointers_and_arrays() {
        let ptr = Type::pointer_to(Type::pointer_to(scalar(Kind::UChar)));
        assert_eq!(go(&ptr), "**uint8");
        assert_eq!(go(&Type::pointer_to(Type::void())), "*byte");
        let arr = Type::array_of(scalar(Kind::Float).with_const(), Some(4));
        assert_eq!(go(&arr), "[4]float32");
        assert_eq!(BindType::new(&arr).cgo_type(), "[4]float32");
    }

    #[test]
    fn unsized_arrays_decay() {
        for length in [None, Some(0)] {
            let arr = Type::array_of(scalar(Kind::Int), length);
            let bind = BindType::new(&arr);
            assert_eq!(bind.kind(), Kind::Ptr);
            assert_eq!(bind.go_type(&DefaultNamer), "*int32");
            assert_eq!(bind.cgo_type(), "*int32");
            assert!(bind.passes_unsafe_pointer());
        }
    }

    #[test]
    fn typedefs_require_cast_and_name_c_type() {
        let vgfloat = scalar(Kind::Float).with_typedef_name("VGfloat");
        let bind = BindType::new(&vgfloat);
        assert_eq!(bind.go_type(&DefaultNamer), "float32");
        assert!(bind.requires_cast());
        assert_eq!(bind.cgo_type(), "C.VGfloat");

        let arr = Type::array_of(vgfloat.clone(), Some(4));
        assert!(BindType::new(&arr).requires_cast());
        assert_eq!(BindType::new(&arr).cgo_type(), "[4]C.VGfloat");
        assert_eq!(BindType::new(&Type::pointer_to(vgfloat)).cgo_type(), "*C.VGfloat");
    }

    #[test]
    fn typedef_of_pointer_casts_to_typedef() {
        let handle = Type::pointer_to(Type::structure(Some("VGPath".into())))
            .with_typedef_name("VGPathPtr");
        let bind = BindType::new(&handle);
        assert_eq!(bind.cgo_type(), "C.VGPathPtr");
        assert!(!bind.passes_unsafe_pointer());
    }

    #[test]
    fn cast_requirement_is_monotone() {
        let plain = scalar(Kind::Short);
        let named = Type::enumeration(Some("Color".into()), Vec::new());
        for element in [plain, named] {
            let expected = BindType::new(&element).requires_cast();
            let ptr = Type::pointer_to(element.clone());
            let arr = Type::array_of(element.clone(), Some(3));
            assert_eq!(BindType::new(&ptr).requires_cast(), expected);
            assert_eq!(BindType::new(&arr).requires_cast(), expected);
        }
    }

    #[test]
    fn enums_use_the_namer() {
        let color = Type::enumeration(Some("Color".into()), Vec::new());
        assert_eq!(go(&color), "Color");
        assert_eq!(BindType::new(&color).cgo_type(), "C.enum_Color");

        let mode = Type::enumeration(None, Vec::new()).with_typedef_name("VGFillRule");
        assert_eq!(BindType::new(&mode).go_type(&PrefixNamer::openvg()), "FillRuleEnum");
        assert_eq!(BindType::new(&mode).cgo_type(), "C.VGFillRule");

        assert_eq!(go(&Type::enumeration(None, Vec::new())), "int32");
    }

    #[test]
    fn opaque_kinds_degrade_to_placeholders() {
        assert_eq!(go(&Type::structure(Some("S".into()))), "struct");
        assert_eq!(go(&Type::union(None)), "union");
        assert_eq!(go(&Type::function(Type::void(), Vec::new(), false)), "func");
        assert_eq!(go(&Type::undefined()), "undefined");
        assert_eq!(BindType::new(&Type::structure(Some("S".into()))).cgo_type(), "C.struct_S");
        assert!(BindType::new(&Type::structure(None)).requires_cast());
        assert!(!BindType::new(&Type::undefined()).requires_cast());
    }

    #[test]
    fn unresolved_typedef_names() {
        let ty = Type::unresolved_typedef("khronos_float_t");
        assert_eq!(go(&ty), "Khronos_float_t");
        assert!(BindType::new(&ty).requires_cast());
        assert_eq!(BindType::new(&ty).cgo_type(), "C.khronos_float_t");
    }
}
