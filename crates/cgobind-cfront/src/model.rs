//! Arithmetic data model: sizes of the C scalar kinds on the target.

use std::collections::HashMap;

use crate::types::{Kind, Type};

/// Size and alignment of one kind, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelItem {
    pub size: u64,
    pub align: u64,
}

/// Sizes of scalar kinds plus the fixed-width typedefs a header may use
/// without including `<stdint.h>`.
#[derive(Debug, Clone)]
pub struct Model {
    items: HashMap<Kind, ModelItem>,
    builtin_typedefs: HashMap<&'static str, Kind>,
}

impl Model {
    /// The 64-bit LP64 model (`long` and pointers are 8 bytes).
    pub fn lp64() -> Self {
        let items = [
            (Kind::Void, 1, 1),
            (Kind::Ptr, 8, 8),
            (Kind::UintPtr, 8, 8),
            (Kind::Char, 1, 1),
            (Kind::SChar, 1, 1),
            (Kind::UChar, 1, 1),
            (Kind::Short, 2, 2),
            (Kind::UShort, 2, 2),
            (Kind::Int, 4, 4),
            (Kind::UInt, 4, 4),
            (Kind::Long, 8, 8),
            (Kind::ULong, 8, 8),
            (Kind::LongLong, 8, 8),
            (Kind::ULongLong, 8, 8),
            (Kind::Float, 4, 4),
            (Kind::Double, 8, 8),
            (Kind::LongDouble, 16, 16),
            (Kind::Bool, 1, 1),
            (Kind::FloatComplex, 8, 4),
            (Kind::DoubleComplex, 16, 8),
            (Kind::LongDoubleComplex, 32, 16),
            (Kind::Enum, 4, 4),
        ]
        .into_iter()
        .map(|(kind, size, align)| (kind, ModelItem { size, align }))
        .collect();

        // 64-bit names go through `long long` so their width never depends on
        // how `long` is mapped downstream.
        let builtin_typedefs = HashMap::from([
            ("int8_t", Kind::SChar),
            ("uint8_t", Kind::UChar),
            ("int16_t", Kind::Short),
            ("uint16_t", Kind::UShort),
            ("int32_t", Kind::Int),
            ("uint32_t", Kind::UInt),
            ("int64_t", Kind::LongLong),
            ("uint64_t", Kind::ULongLong),
            ("intptr_t", Kind::LongLong),
            ("uintptr_t", Kind::UintPtr),
            ("size_t", Kind::ULongLong),
            ("ssize_t", Kind::LongLong),
            ("ptrdiff_t", Kind::LongLong),
            ("wchar_t", Kind::Int),
        ]);

        Self {
            items,
            builtin_typedefs,
        }
    }

    /// Size and alignment of `kind`, if the model defines it.
    pub fn item(&self, kind: Kind) -> Option<ModelItem> {
        self.items.get(&kind).copied()
    }

    /// Arithmetic kind behind a well-known fixed-width typedef name.
    pub fn builtin_typedef(&self, name: &str) -> Option<Kind> {
        self.builtin_typedefs.get(name).copied()
    }

    /// `sizeof` for types whose layout the model knows. Structs, unions,
    /// functions and unresolved typedefs have no size here.
    pub fn size_of(&self, ty: &Type) -> Option<u64> {
        match ty.kind() {
            Kind::Array => {
                let element = self.size_of(ty.element()?)?;
                element.checked_mul(ty.elements()?)
            }
            Kind::Struct | Kind::Union | Kind::Function | Kind::TypedefName | Kind::Undefined => {
                None
            }
            kind => self.item(kind).map(|item| item.size),
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::lp64()
    }
}
