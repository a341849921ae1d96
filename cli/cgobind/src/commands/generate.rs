//! `cgobind generate`: parse headers and write Go binding modules.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::{resolve_targets, TargetArgs};

/// Generate every resolved target, stopping at the first failure.
pub fn run(cwd: &Path, args: &TargetArgs) -> Result<()> {
    let targets = resolve_targets(cwd, args)?;
    for target in &targets {
        let options = &target.options;
        info!(package = %options.package, headers = options.headers.len(), "generating");
        let bindings = cgobind_core::generate(options, target.namer.as_ref())
            .with_context(|| format!("generating package '{}'", options.package))?;
        println!(
            "Generated {} ({} enums, {} functions) → {}",
            options.package,
            bindings.enums.len(),
            bindings.functions.len(),
            options.output.display()
        );
    }
    Ok(())
}
