//! CLI command implementations.

pub mod generate;
pub mod inspect;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cgobind_core::{GenerateOptions, Namer};
use tracing::debug;

use crate::manifest::{parse_define, CgobindManifest, NamingConfig, NamingPolicy};

/// Target selection and overrides shared by `generate` and `inspect`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TargetArgs {
    /// Header to parse; repeatable. Bypasses the manifest.
    #[arg(long = "header", value_name = "PATH")]
    pub headers: Vec<PathBuf>,
    /// Go package name (required with --header)
    #[arg(long)]
    pub package: Option<String>,
    /// Output Go file (default: <package>.go)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Header name written in an `#include` line; repeatable
    #[arg(long = "include", value_name = "NAME")]
    pub includes: Vec<String>,
    /// Directory searched for `#include`; repeatable
    #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
    pub include_dirs: Vec<PathBuf>,
    /// Predefined macro, NAME or NAME=VALUE; repeatable
    #[arg(short = 'D', long = "define", value_name = "MACRO")]
    pub defines: Vec<String>,
    /// Linker flags for the `#cgo LDFLAGS` line
    #[arg(long, allow_hyphen_values = true)]
    pub ldflags: Option<String>,
    /// Compiler flags for the `#cgo CFLAGS` line
    #[arg(long, allow_hyphen_values = true)]
    pub cflags: Option<String>,
    /// Naming policy
    #[arg(long, value_enum)]
    pub naming: Option<NamingPolicy>,
    /// Keep only declarations with the naming policy's prefixes
    #[arg(long)]
    pub filter: bool,
    /// Only the manifest target generating this package
    #[arg(long)]
    pub target: Option<String>,
}

/// A binding target ready to run.
pub struct Target {
    pub options: GenerateOptions,
    pub namer: Box<dyn Namer>,
}

/// Resolve the targets to process: a single target from `--header`, or the
/// manifest found from `cwd` upward with command-line overrides applied.
pub fn resolve_targets(cwd: &Path, args: &TargetArgs) -> Result<Vec<Target>> {
    if !args.headers.is_empty() {
        return Ok(vec![target_from_args(cwd, args)?]);
    }

    let Some((manifest, project_dir)) = CgobindManifest::find_and_load(cwd)? else {
        bail!("no cgobind.toml found (pass --header or create one)");
    };
    debug!(dir = %project_dir.display(), targets = manifest.bindings.len(), "loaded manifest");

    let selected = match &args.target {
        Some(name) => vec![manifest
            .target(name)
            .with_context(|| format!("no binding target for package '{name}' in cgobind.toml"))?],
        None => manifest.bindings.iter().collect(),
    };
    if selected.is_empty() {
        bail!("cgobind.toml defines no [[bindings]]");
    }
    if args.output.is_some() && selected.len() > 1 {
        bail!("--output needs a single target (use --target)");
    }

    Ok(selected
        .into_iter()
        .map(|binding| {
            let mut options = binding.to_options(&project_dir, &manifest.include_dirs);
            apply_overrides(&mut options, cwd, args);
            let mut naming = binding.naming.clone();
            if let Some(policy) = args.naming {
                naming.policy = policy;
            }
            naming.filter |= args.filter;
            Target {
                options,
                namer: naming.namer(),
            }
        })
        .collect())
}

fn target_from_args(cwd: &Path, args: &TargetArgs) -> Result<Target> {
    let Some(package) = &args.package else {
        bail!("--package is required with --header");
    };
    let headers = args.headers.iter().map(|h| cwd.join(h)).collect();
    let mut options = GenerateOptions::new(headers, package.clone(), cwd.join(format!("{package}.go")));
    options.includes = args.headers.iter().map(|h| h.display().to_string()).collect();
    apply_overrides(&mut options, cwd, args);
    let naming = NamingConfig {
        policy: args.naming.unwrap_or_default(),
        filter: args.filter,
        ..NamingConfig::default()
    };
    Ok(Target {
        options,
        namer: naming.namer(),
    })
}

fn apply_overrides(options: &mut GenerateOptions, cwd: &Path, args: &TargetArgs) {
    if let Some(output) = &args.output {
        options.output = cwd.join(output);
    }
    if !args.includes.is_empty() {
        options.includes = args.includes.clone();
    }
    options.include_dirs.extend(args.include_dirs.iter().map(|dir| cwd.join(dir)));
    options.defines.extend(args.defines.iter().map(|d| parse_define(d)));
    if args.ldflags.is_some() {
        options.ldflags = args.ldflags.clone();
    }
    if args.cflags.is_some() {
        options.cflags = args.cflags.clone();
    }
}
