//! Go source rendering for enum and function records.

use std::io::{self, Write};

use cgobind_cfront::Kind;

use crate::naming::Namer;
use crate::record::{Enum, Function, Parameter};
use crate::types::BindType;

/// Render `e` as a named `int32` type followed by a constant block.
pub fn emit_enum<W: Write + ?Sized>(out: &mut W, e: &Enum, namer: &dyn Namer) -> io::Result<()> {
    let name = namer.enum_name(e);
    writeln!(out, "type {name} int32")?;
    writeln!(out, "const (")?;
    for member in &e.members {
        writeln!(out, "\t{} {name} = {}", namer.enum_member_name(member), member.value)?;
    }
    writeln!(out, ")")
}

/// Render `f` as a Go function calling through to the native symbol.
pub fn emit_function<W: Write + ?Sized>(
    out: &mut W,
    f: &Function,
    namer: &dyn Namer,
) -> io::Result<()> {
    let result = BindType::new(&f.result_type);

    write!(out, "func {}(", namer.function_name(f))?;
    if !f.parameters.is_empty() {
        writeln!(out)?;
        for p in &f.parameters {
            writeln!(out, "\t{} {},", namer.parameter_name(p), BindType::new(&p.ty).go_type(namer))?;
        }
    }
    write!(out, ")")?;
    if !result.is_void() {
        write!(out, " {}", result.go_type(namer))?;
    }
    writeln!(out, " {{")?;

    write!(out, "\t")?;
    if !result.is_void() {
        write!(out, "ret := ")?;
    }
    write!(out, "C.{}(", f.identifier)?;
    if f.parameters.is_empty() {
        writeln!(out, ")")?;
    } else {
        writeln!(out)?;
        for p in &f.parameters {
            writeln!(out, "\t\t{},", argument_expression(p, namer))?;
        }
        writeln!(out, "\t)")?;
    }

    if !result.is_void() {
        if result.requires_cast() {
            writeln!(out, "\treturn ({})(ret)", result.go_type(namer))?;
        } else {
            writeln!(out, "\treturn ret")?;
        }
    }
    writeln!(out, "}}")
}

/// Expression passing parameter `p` to the native call.
pub fn argument_expression(p: &Parameter, namer: &dyn Namer) -> String {
    let name = namer.parameter_name(p);
    let ty = BindType::new(&p.ty);
    match (ty.kind(), ty.element()) {
        // Go arrays are values; the native side takes a pointer to the first element.
        (Kind::Array, Some(element)) => format!("(*{})(&{name}[0])", element.cgo_type()),
        _ if ty.requires_cast() => format!("({})({name})", ty.cgo_type()),
        _ if ty.passes_unsafe_pointer() => format!("unsafe.Pointer({name})"),
        _ => name,
    }
}

/// One-line Go signature of `f`, such as `Add(a int32, b int32) int32`.
pub fn go_signature(f: &Function, namer: &dyn Namer) -> String {
    let params: Vec<String> = f
        .parameters
        .iter()
        .map(|p| format!("{} {}", namer.parameter_name(p), BindType::new(&p.ty).go_type(namer)))
        .collect();
    let mut signature = format!("{}({})", namer.function_name(f), params.join(", "));
    let result = BindType::new(&f.result_type);
    if !result.is_void() {
        signature.push(' ');
        signature.push_str(&result.go_type(namer));
    }
    signature
}

/// Whether any argument of `f` is passed as `unsafe.Pointer`.
pub fn uses_unsafe(f: &Function) -> bool {
    f.parameters
        .iter()
        .any(|p| BindType::new(&p.ty).passes_unsafe_pointer())
}

#[cfg(test)]
mod tests {
    use cgobind_cfront::Type;

    use super::*;
    use crate::naming::DefaultNamer;
    use crate::record::EnumMember;

    fn render_function(f: &Function) -> String {
        let mut out = Vec::new();
        emit_function(&mut out, f, &DefaultNamer).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn param(name: &str, ty: Type) -> Parameter {
        Parameter {
            identifier: name.to_string(),
            ty,
        }
    }

    #[test]
    fn color_enum() {
        let e = Enum {
            identifier: "Color".into(),
            members: ["RED", "GREEN", "BLUE"]
                .iter()
                .zip(0..)
                .map(|(name, value)| EnumMember {
                    identifier: name.to_string(),
                    value,
                })
                .collect(),
        };
        let mut out = Vec::new();
        emit_enum(&mut out, &e, &DefaultNamer).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "type Color int32\nconst (\n\tRed Color = 0\n\tGreen Color = 1\n\tBlue Color = 2\n)\n"
        );
    }

    #[test]
    fn add_passes_arguments_unconverted() {
        let int = Type::scalar(Kind::Int);
        let f = Function {
            identifier: "add".into(),
            parameters: vec![param("a", int.clone()), param("b", int.clone())],
            result_type: int,
        };
        assert_eq!(
            render_function(&f),
            "func Add(\n\ta int32,\n\tb int32,\n) int32 {\n\tret := C.add(\n\t\ta,\n\t\tb,\n\t)\n\treturn ret\n}\n"
        );
        assert_eq!(go_signature(&f, &DefaultNamer), "Add(a int32, b int32) int32");
        assert!(!uses_unsafe(&f));
    }

    #[test]
    fn typedef_enum_argument_is_cast() {
        let color = Type::enumeration(None, Vec::new()).with_typedef_name("ColorEnum");
        let f = Function {
            identifier: "setColor".into(),
            parameters: vec![param("c", color)],
            result_type: Type::void(),
        };
        assert_eq!(
            render_function(&f),
            "func SetColor(\n\tc ColorEnum,\n) {\n\tC.setColor(\n\t\t(C.ColorEnum)(c),\n\t)\n}\n"
        );
    }

    #[test]
    fn array_arguments_pass_first_element() {
        let plain = Type::array_of(Type::scalar(Kind::Float).with_const(), Some(4));
        let p = param("arr", plain);
        assert_eq!(BindType::new(&p.ty).go_type(&DefaultNamer), "[4]float32");
        assert_eq!(argument_expression(&p, &DefaultNamer), "(*float32)(&arr[0])");

        let vgfloat = Type::scalar(Kind::Float).with_typedef_name("VGfloat");
        let p = param("arr", Type::array_of(vgfloat, Some(4)));
        assert_eq!(argument_expression(&p, &DefaultNamer), "(*C.VGfloat)(&arr[0])");
    }

    #[test]
    fn pointer_arguments() {
        let raw = param("data", Type::pointer_to(Type::void()));
        assert_eq!(argument_expression(&raw, &DefaultNamer), "unsafe.Pointer(data)");

        let typed = param("v", Type::pointer_to(Type::scalar(Kind::Int).with_typedef_name("VGint")));
        assert_eq!(argument_expression(&typed, &DefaultNamer), "(*C.VGint)(v)");

        let f = Function {
            identifier: "upload".into(),
            parameters: vec![raw],
            result_type: Type::void(),
        };
        assert!(uses_unsafe(&f));
    }

    #[test]
    fn empty_parameter_list_and_cast_result() {
        let handle = Type::scalar(Kind::UInt).with_typedef_name("VGHandle");
        let f = Function {
            identifier: "vgCreate".into(),
            parameters: Vec::new(),
            result_type: handle,
        };
        assert_eq!(
            render_function(&f),
            "func VgCreate() uint32 {\n\tret := C.vgCreate()\n\treturn (uint32)(ret)\n}\n"
        );
    }
}
