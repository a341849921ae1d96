//! `cgobind inspect`: show what a target would bind without writing it.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use cgobind_core::{go_signature, Bindings, Function, Namer};
use serde::Serialize;

use super::{resolve_targets, TargetArgs};

/// Report format for `inspect`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct PackageReport {
    package: String,
    enums: Vec<EnumReport>,
    functions: Vec<FunctionReport>,
}

#[derive(Debug, Serialize)]
struct EnumReport {
    name: String,
    c_name: String,
    members: Vec<MemberReport>,
}

#[derive(Debug, Serialize)]
struct MemberReport {
    name: String,
    c_name: String,
    value: i128,
}

#[derive(Debug, Serialize)]
struct FunctionReport {
    name: String,
    signature: String,
    /// C declaration: `identifier`, `parameters` and `result_type`.
    #[serde(flatten)]
    declaration: Function,
}

impl PackageReport {
    fn new(package: &str, bindings: &Bindings, namer: &dyn Namer) -> Self {
        let enums = bindings
            .enums
            .iter()
            .map(|e| EnumReport {
                name: namer.enum_name(e),
                c_name: e.identifier.clone(),
                members: e
                    .members
                    .iter()
                    .map(|m| MemberReport {
                        name: namer.enum_member_name(m),
                        c_name: m.identifier.clone(),
                        value: m.value,
                    })
                    .collect(),
            })
            .collect();
        let functions = bindings
            .functions
            .iter()
            .map(|f| FunctionReport {
                name: namer.function_name(f),
                signature: go_signature(f, namer),
                declaration: f.clone(),
            })
            .collect();
        Self {
            package: package.to_string(),
            enums,
            functions,
        }
    }

    fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "package {}", self.package)?;
        writeln!(out, "  enums ({}):", self.enums.len())?;
        for e in &self.enums {
            writeln!(out, "    {} ({}, {} members)", e.name, e.c_name, e.members.len())?;
            for m in &e.members {
                writeln!(out, "      {} = {}", m.name, m.value)?;
            }
        }
        writeln!(out, "  functions ({}):", self.functions.len())?;
        for f in &self.functions {
            writeln!(out, "    {}    [{}]", f.signature, f.declaration.identifier)?;
        }
        Ok(())
    }
}

/// Parse every resolved target and report its bindings on stdout.
pub fn run(cwd: &Path, args: &TargetArgs, export: ExportFormat) -> Result<()> {
    let stdout = io::stdout();
    report(cwd, args, export, &mut stdout.lock())
}

fn report<W: Write>(cwd: &Path, args: &TargetArgs, export: ExportFormat, out: &mut W) -> Result<()> {
    let mut reports = Vec::new();
    for target in resolve_targets(cwd, args)? {
        let package = &target.options.package;
        let bindings = cgobind_core::collect(&target.options, target.namer.as_ref())
            .with_context(|| format!("inspecting package '{package}'"))?;
        reports.push(PackageReport::new(package, &bindings, target.namer.as_ref()));
    }

    match export {
        ExportFormat::Text => {
            for report in &reports {
                report.write_text(out)?;
            }
        }
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &reports).context("serializing report")?;
            writeln!(out)?;
        }
    }
    Ok(())
}
