//! Classification of top-level declarations into function and enum records.

use cgobind_cfront::{
    Declaration, Declarator, ExternalDeclaration, Kind, ParameterTypeList, TranslationUnit, Type,
};
use tracing::{debug, instrument, trace};

use crate::ident::identifier_of;
use crate::naming::Namer;
use crate::record::{Enum, EnumMember, Function, Parameter};
use crate::sanitize::bless_name;

/// Records to bind, each list in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    pub enums: Vec<Enum>,
    pub functions: Vec<Function>,
}

enum Record {
    Function(Function),
    Enum(Enum),
}

/// Bucket every top-level declaration of `unit` as a function, an enum, or
/// nothing. `namer`, when given, may veto individual records.
#[instrument(skip_all, fields(declarations = unit.external_declarations.len()))]
pub fn classify(unit: &TranslationUnit, namer: Option<&dyn Namer>) -> Bindings {
    let mut bindings = Bindings::default();
    for external in &unit.external_declarations {
        let ExternalDeclaration::Declaration(decl) = external else {
            continue;
        };
        match classify_declaration(decl) {
            Some(Record::Function(f)) => {
                if namer.is_some_and(|n| n.ignore_function(&f.identifier)) {
                    trace!(name = %f.identifier, "function ignored by naming policy");
                    continue;
                }
                bindings.functions.push(f);
            }
            Some(Record::Enum(e)) => {
                if namer.is_some_and(|n| n.ignore_enum(&e.identifier)) {
                    trace!(name = %e.identifier, "enum ignored by naming policy");
                    continue;
                }
                bindings.enums.push(e);
            }
            None => {}
        }
    }
    debug!(
        enums = bindings.enums.len(),
        functions = bindings.functions.len(),
        "classified declarations"
    );
    bindings
}

fn classify_declaration(decl: &Declaration) -> Option<Record> {
    let Some(declarator) = decl.declarators.first() else {
        // `enum Tag { ... };`
        let ty = &decl.specifiers.ty;
        if ty.kind() == Kind::Enum && decl.specifiers.defines_body {
            let Some(tag) = ty.tag() else {
                debug!(
                    constants = ty.enumerators().len(),
                    "skipping anonymous enum with no declarator"
                );
                return None;
            };
            return Some(Record::Enum(enum_record(bless_name(tag), ty)));
        }
        return None;
    };

    if let Some(list) = declarator.parameter_type_list() {
        if list.variadic {
            debug!(name = declarator.name().unwrap_or_default(), "skipping variadic function");
            return None;
        }
        return Some(Record::Function(function_record(declarator, list)));
    }

    // Only the declaration carrying the enumerator list produces a record, so
    // later uses of the same type do not repeat its constants.
    if declarator.ty.kind() == Kind::Enum && decl.specifiers.defines_body {
        let identifier = identifier_of(&declarator.direct);
        return Some(Record::Enum(enum_record(identifier, &declarator.ty)));
    }

    trace!(name = declarator.name().unwrap_or_default(), "skipping declaration");
    None
}

fn function_record(declarator: &Declarator, list: &ParameterTypeList) -> Function {
    let parameters = if list.is_void() {
        Vec::new()
    } else {
        list.parameters
            .iter()
            .enumerate()
            .map(|(index, p)| {
                let identifier = p
                    .declarator
                    .as_ref()
                    .map(|d| identifier_of(&d.direct))
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| format!("arg{index}"));
                Parameter {
                    identifier,
                    ty: p.ty.clone(),
                }
            })
            .collect()
    };

    Function {
        identifier: identifier_of(&declarator.direct),
        parameters,
        result_type: declarator.ty.result().cloned().unwrap_or_else(Type::undefined),
    }
}

fn enum_record(identifier: String, ty: &Type) -> Enum {
    Enum {
        identifier,
        members: ty
            .enumerators()
            .iter()
            .map(|e| EnumMember {
                identifier: bless_name(&e.name),
                value: e.value,
            })
            .collect(),
    }
}
