//! Generator driver: parse headers, classify, and write the Go module.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use cgobind_cfront::{Model, ParseOptions};
use tracing::{debug, info, instrument};

use crate::classify::{classify, Bindings};
use crate::emit::{emit_enum, emit_function, uses_unsafe};
use crate::error::{GenerateError, Result};
use crate::naming::Namer;

/// Everything needed to produce one binding module.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Headers to parse, in order.
    pub headers: Vec<PathBuf>,
    /// Header names for the `#include` lines; the header paths when empty.
    pub includes: Vec<String>,
    /// Go package name.
    pub package: String,
    /// Output file, overwritten on every run.
    pub output: PathBuf,
    /// Value of the `#cgo LDFLAGS` line, if any.
    pub ldflags: Option<String>,
    /// Value of the `#cgo CFLAGS` line, if any.
    pub cflags: Option<String>,
    /// Directories searched for `#include`.
    pub include_dirs: Vec<PathBuf>,
    /// Macros predefined before parsing.
    pub defines: Vec<(String, Option<String>)>,
}

impl GenerateOptions {
    pub fn new(headers: Vec<PathBuf>, package: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            headers,
            package: package.into(),
            output: output.into(),
            ..Self::default()
        }
    }

    /// Names written in the `#include` lines.
    pub fn include_names(&self) -> Vec<String> {
        if self.includes.is_empty() {
            self.headers.iter().map(|h| h.display().to_string()).collect()
        } else {
            self.includes.clone()
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            include_dirs: self.include_dirs.clone(),
            defines: self.defines.clone(),
        }
    }
}

/// Parse and classify the configured headers without writing anything.
pub fn collect(options: &GenerateOptions, namer: &dyn Namer) -> Result<Bindings> {
    let unit = cgobind_cfront::parse(&options.headers, &Model::lp64(), &options.parse_options())?;
    Ok(classify(&unit, Some(namer)))
}

/// Generate the binding module described by `options`.
///
/// The headers are parsed before the output file is touched, so a parse
/// failure leaves any previous output in place.
#[instrument(skip_all, fields(package = %options.package))]
pub fn generate(options: &GenerateOptions, namer: &dyn Namer) -> Result<Bindings> {
    let bindings = collect(options, namer)?;

    let output_error = |source| GenerateError::Output {
        path: options.output.clone(),
        source,
    };
    let file = File::create(&options.output).map_err(output_error)?;
    let mut out = BufWriter::new(file);
    write_module(&mut out, options, &bindings, namer).map_err(output_error)?;
    out.flush().map_err(output_error)?;

    info!(
        output = %options.output.display(),
        enums = bindings.enums.len(),
        functions = bindings.functions.len(),
        "wrote bindings"
    );
    Ok(bindings)
}

/// Write the package clause, cgo prologue, and every record of `bindings`.
pub fn write_module<W: Write + ?Sized>(
    out: &mut W,
    options: &GenerateOptions,
    bindings: &Bindings,
    namer: &dyn Namer,
) -> io::Result<()> {
    writeln!(out, "package {}", options.package)?;
    writeln!(out)?;
    if let Some(cflags) = &options.cflags {
        writeln!(out, "//#cgo CFLAGS: {cflags}")?;
    }
    if let Some(ldflags) = &options.ldflags {
        writeln!(out, "//#cgo LDFLAGS: {ldflags}")?;
    }
    for include in options.include_names() {
        writeln!(out, "//#include \"{include}\"")?;
    }
    writeln!(out, "import \"C\"")?;
    if bindings.functions.iter().any(uses_unsafe) {
        writeln!(out)?;
        writeln!(out, "import \"unsafe\"")?;
    }

    for e in &bindings.enums {
        writeln!(out)?;
        emit_enum(out, e, namer)?;
    }
    for f in &bindings.functions {
        writeln!(out)?;
        emit_function(out, f, namer)?;
    }
    debug!(enums = bindings.enums.len(), functions = bindings.functions.len(), "rendered module");
    Ok(())
}
