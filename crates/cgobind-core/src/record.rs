//! Records produced by classification and consumed by the emitter.

use cgobind_cfront::{Kind, Type};
use serde::{Serialize, Serializer};

/// A function prototype to bind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    /// C name of the function, used for the native call.
    pub identifier: String,
    pub parameters: Vec<Parameter>,
    #[serde(serialize_with = "c_spelling")]
    pub result_type: Type,
}

/// One parameter of a [`Function`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub identifier: String,
    #[serde(rename = "type", serialize_with = "c_spelling")]
    pub ty: Type,
}

/// An enumerated type to bind as a named integer type plus constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    pub identifier: String,
    /// Members in declaration order.
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub identifier: String,
    pub value: i128,
}

impl Function {
    /// Whether the C result type is `void`.
    pub fn returns_void(&self) -> bool {
        self.result_type.kind() == Kind::Void
    }
}

impl Enum {
    /// An enum record with no members, as used to name an enum type.
    pub fn named(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            members: Vec::new(),
        }
    }
}

/// Serialize a type as its C spelling, such as `const VGfloat[4]`.
fn c_spelling<S: Serializer>(ty: &Type, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(ty)
}
