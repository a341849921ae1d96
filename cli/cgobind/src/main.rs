//! cgobind CLI: generate Go cgo bindings from C headers.

mod commands;
mod manifest;

use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

use commands::inspect::ExportFormat;
use commands::TargetArgs;

#[derive(Parser)]
#[command(name = "cgobind", version, about = "Go cgo bindings from C headers")]
struct Cli {
    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the Go binding module of each target
    Generate {
        #[command(flatten)]
        args: TargetArgs,
    },
    /// List the enums and functions a target would bind
    Inspect {
        #[command(flatten)]
        args: TargetArgs,
        /// Output format (text, json)
        #[arg(long, value_enum, default_value = "text")]
        export: ExportFormat,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn log_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(verbose, quiet))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Generate { args } => commands::generate::run(&cwd, &args),
        Commands::Inspect { args, export } => commands::inspect::run(&cwd, &args, export),
    }
}

#[cfg(test)]
mod integration_tests {
    use std::fs;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_flags() {
        let cli = Cli::parse_from([
            "cgobind",
            "-vv",
            "generate",
            "--header",
            "VG/openvg.h",
            "--package",
            "vg",
            "-I",
            "include",
            "-D",
            "VG_API_CALL=extern",
            "--ldflags",
            "-lAmanithVG",
            "--naming",
            "openvg",
        ]);
        assert_eq!(log_level(cli.verbose, cli.quiet), Level::DEBUG);
        let Commands::Generate { args } = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.package.as_deref(), Some("vg"));
        assert_eq!(args.defines, ["VG_API_CALL=extern"]);
        assert_eq!(args.ldflags.as_deref(), Some("-lAmanithVG"));
        assert_eq!(args.naming, Some(manifest::NamingPolicy::Openvg));
    }

    #[test]
    fn parse_inspect_export() {
        let cli = Cli::parse_from(["cgobind", "inspect", "--target", "vgu", "--export", "json", "-q"]);
        assert_eq!(log_level(cli.verbose, cli.quiet), Level::ERROR);
        let Commands::Inspect { args, export } = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.target.as_deref(), Some("vgu"));
        assert_eq!(export, ExportFormat::Json);
    }

    #[test]
    fn generate_openvg_style_project() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("include/VG")).unwrap();
        fs::write(
            dir.path().join("include/VG/openvg.h"),
            "#ifndef VG_API_CALL\n#define VG_API_CALL extern\n#endif\n\
             typedef float VGfloat;\n\
             typedef int VGint;\n\
             typedef unsigned int VGHandle;\n\
             typedef VGHandle VGPath;\n\
             typedef enum { VG_FILL_PATH = (1 << 1), VG_STROKE_PATH = (1 << 0) } VGPaintMode;\n\
             VG_API_CALL void vgDrawPath(VGPath path, VGint paintModes);\n\
             VG_API_CALL void vgClearColor(const VGfloat rgba[4]);\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("cgobind.toml"),
            r#"
include-dirs = ["include"]

[[bindings]]
package = "vg"
headers = ["include/VG/openvg.h"]
includes = ["VG/openvg.h"]
output = "vg.go"
ldflags = "-lOpenVG"

[bindings.naming]
policy = "openvg"
"#,
        )
        .unwrap();

        let cli = Cli::parse_from(["cgobind", "generate"]);
        let Commands::Generate { args } = cli.command else {
            panic!("expected generate");
        };
        commands::generate::run(dir.path(), &args).unwrap();

        let go = fs::read_to_string(dir.path().join("vg.go")).unwrap();
        let expected = "\
package vg

//#cgo LDFLAGS: -lOpenVG
//#include \"VG/openvg.h\"
import \"C\"

type PaintModeEnum int32
const (
\tFillPath PaintModeEnum = 2
\tStrokePath PaintModeEnum = 1
)

func DrawPath(
\tpath uint32,
\tpaintModes int32,
) {
\tC.vgDrawPath(
\t\t(C.VGPath)(path),
\t\t(C.VGint)(paintModes),
\t)
}

func ClearColor(
\trgba [4]float32,
) {
\tC.vgClearColor(
\t\t(*C.VGfloat)(&rgba[0]),
\t)
}
";
        assert_eq!(go, expected);
    }
}
