//! `cgobind.toml` manifest parsing and binding target configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cgobind_core::{DefaultNamer, GenerateOptions, Namer, PrefixNamer};
use serde::{Deserialize, Serialize};

/// File name searched for by [`CgobindManifest::find_and_load`].
pub const MANIFEST_NAME: &str = "cgobind.toml";

/// The top-level manifest: one or more binding targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CgobindManifest {
    /// Include directories shared by every target.
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,
    /// Binding targets, generated in order.
    #[serde(default)]
    pub bindings: Vec<BindingTarget>,
}

/// One generated Go package.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BindingTarget {
    /// Go package name.
    pub package: String,
    /// Headers to parse, relative to the manifest directory.
    pub headers: Vec<PathBuf>,
    /// Output Go file, relative to the manifest directory.
    pub output: PathBuf,
    /// Names for the `#include` lines; the header paths when empty.
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ldflags: Option<String>,
    #[serde(default)]
    pub cflags: Option<String>,
    /// Additional include directories for this target.
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,
    /// Predefined macros, `NAME` or `NAME=VALUE`.
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(default)]
    pub naming: NamingConfig,
}

/// Built-in naming policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NamingPolicy {
    /// Export C names as they are.
    #[default]
    Default,
    /// OpenVG prefixes (`VG`, `VG_`, `vg`).
    Openvg,
    /// VGU prefixes (`VGU`, `VGU_`, `vgu`).
    Vgu,
    /// Prefixes given explicitly in the naming section.
    Prefix,
}

/// `[bindings.naming]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NamingConfig {
    #[serde(default)]
    pub policy: NamingPolicy,
    #[serde(default)]
    pub type_prefix: Option<String>,
    #[serde(default)]
    pub enum_suffix: Option<String>,
    #[serde(default)]
    pub member_prefix: Option<String>,
    #[serde(default)]
    pub function_prefix: Option<String>,
    /// Keep only declarations carrying the configured prefixes.
    #[serde(default)]
    pub filter: bool,
}

impl NamingConfig {
    /// Build the configured naming policy.
    pub fn namer(&self) -> Box<dyn Namer> {
        let base = match self.policy {
            NamingPolicy::Default => return Box::new(DefaultNamer),
            NamingPolicy::Openvg => PrefixNamer::openvg(),
            NamingPolicy::Vgu => PrefixNamer::vgu(),
            NamingPolicy::Prefix => PrefixNamer::default(),
        };
        let override_with = |value: &Option<String>, default: String| value.clone().unwrap_or(default);
        Box::new(PrefixNamer {
            type_prefix: override_with(&self.type_prefix, base.type_prefix),
            enum_suffix: override_with(&self.enum_suffix, base.enum_suffix),
            member_prefix: override_with(&self.member_prefix, base.member_prefix),
            function_prefix: override_with(&self.function_prefix, base.function_prefix),
            filter: self.filter,
        })
    }
}

impl BindingTarget {
    /// Generator options with paths resolved against `base_dir`.
    pub fn to_options(&self, base_dir: &Path, shared_include_dirs: &[PathBuf]) -> GenerateOptions {
        let mut options = GenerateOptions::new(
            self.headers.iter().map(|h| base_dir.join(h)).collect(),
            self.package.clone(),
            base_dir.join(&self.output),
        );
        options.includes = if self.includes.is_empty() {
            self.headers.iter().map(|h| h.display().to_string()).collect()
        } else {
            self.includes.clone()
        };
        options.ldflags = self.ldflags.clone();
        options.cflags = self.cflags.clone();
        options.include_dirs = shared_include_dirs
            .iter()
            .chain(&self.include_dirs)
            .map(|dir| base_dir.join(dir))
            .collect();
        options.defines = self.defines.iter().map(|d| parse_define(d)).collect();
        options
    }
}

/// Split `NAME=VALUE` into its parts; a bare `NAME` has no value.
pub fn parse_define(define: &str) -> (String, Option<String>) {
    match define.split_once('=') {
        Some((name, value)) => (name.trim().to_string(), Some(value.to_string())),
        None => (define.trim().to_string(), None),
    }
}

impl CgobindManifest {
    /// Search upward from `start_dir` for a `cgobind.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_NAME);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: CgobindManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing cgobind.toml")
    }

    /// The target generating `package`.
    pub fn target(&self, package: &str) -> Option<&BindingTarget> {
        self.bindings.iter().find(|b| b.package == package)
    }
}
