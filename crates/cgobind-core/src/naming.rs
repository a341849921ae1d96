//! Naming policies: exported Go spelling of C names and record filtering.

use crate::record::{Enum, EnumMember, Function, Parameter};

/// Decides the Go spelling of bound declarations and which ones to keep.
///
/// Implementations must be deterministic and return non-empty, valid Go
/// identifiers for every record they keep.
pub trait Namer {
    fn enum_name(&self, e: &Enum) -> String;

    fn enum_member_name(&self, member: &EnumMember) -> String;

    fn function_name(&self, f: &Function) -> String;

    fn parameter_name(&self, p: &Parameter) -> String;

    /// Go spelling of a typedef name whose definition was never seen.
    fn type_name(&self, c_name: &str) -> String {
        export(c_name)
    }

    /// Whether to drop the enum with C name `name`.
    fn ignore_enum(&self, _name: &str) -> bool {
        false
    }

    /// Whether to drop the function with C name `name`.
    fn ignore_function(&self, _name: &str) -> bool {
        false
    }
}

/// Exported spelling of `name`: the first letter upper-cased.
pub fn export(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `SCREAMING_SNAKE` to `CamelCase`: each `_`-separated word lower-cased and
/// exported.
pub fn camel_case(name: &str) -> String {
    let joined: String = name
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| export(&part.to_lowercase()))
        .collect();
    if joined.is_empty() {
        name.to_string()
    } else {
        joined
    }
}

/// `name` without `prefix`, unless stripping would leave something that
/// cannot start a Go identifier.
fn strip<'n>(name: &'n str, prefix: &str) -> &'n str {
    match name.strip_prefix(prefix) {
        Some(rest) if rest.starts_with(|c: char| c.is_alphabetic() || c == '_') => rest,
        _ => name,
    }
}

/// Exports every name unchanged apart from capitalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNamer;

impl Namer for DefaultNamer {
    fn enum_name(&self, e: &Enum) -> String {
        export(&e.identifier)
    }

    fn enum_member_name(&self, member: &EnumMember) -> String {
        camel_case(&member.identifier)
    }

    fn function_name(&self, f: &Function) -> String {
        export(&f.identifier)
    }

    fn parameter_name(&self, p: &Parameter) -> String {
        p.identifier.clone()
    }
}

/// Strips API prefixes from C names, as in `VGPaintMode` to
/// `PaintModeEnum`, `VG_FILL_PATH` to `FillPath` and `vgDrawPath` to
/// `DrawPath`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixNamer {
    /// Stripped from enum and typedef names.
    pub type_prefix: String,
    /// Appended to enum type names.
    pub enum_suffix: String,
    /// Stripped from enum member names before camel-casing.
    pub member_prefix: String,
    /// Stripped from function names.
    pub function_prefix: String,
    /// Drop enums and functions that lack the respective prefix.
    pub filter: bool,
}

impl PrefixNamer {
    /// Naming for `VG/openvg.h`.
    pub fn openvg() -> Self {
        Self {
            type_prefix: "VG".into(),
            enum_suffix: "Enum".into(),
            member_prefix: "VG_".into(),
            function_prefix: "vg".into(),
            filter: false,
        }
    }

    /// Naming for `VG/vgu.h`.
    pub fn vgu() -> Self {
        Self {
            type_prefix: "VGU".into(),
            enum_suffix: "Enum".into(),
            member_prefix: "VGU_".into(),
            function_prefix: "vgu".into(),
            filter: false,
        }
    }

    pub fn with_filter(mut self, filter: bool) -> Self {
        self.filter = filter;
        self
    }
}

impl Namer for PrefixNamer {
    fn enum_name(&self, e: &Enum) -> String {
        export(strip(&e.identifier, &self.type_prefix)) + &self.enum_suffix
    }

    fn enum_member_name(&self, member: &EnumMember) -> String {
        camel_case(strip(&member.identifier, &self.member_prefix))
    }

    fn function_name(&self, f: &Function) -> String {
        export(strip(&f.identifier, &self.function_prefix))
    }

    fn parameter_name(&self, p: &Parameter) -> String {
        p.identifier.clone()
    }

    fn type_name(&self, c_name: &str) -> String {
        export(strip(c_name, &self.type_prefix))
    }

    fn ignore_enum(&self, name: &str) -> bool {
        self.filter && !name.starts_with(&self.type_prefix)
    }

    fn ignore_function(&self, name: &str) -> bool {
        self.filter && !name.starts_with(&self.function_prefix)
    }
}
