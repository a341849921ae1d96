use std::path::{Path, PathBuf};

use cgobind_core::{generate, BindType, DefaultNamer, GenerateError, GenerateOptions, PrefixNamer};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn openvg_options(output: PathBuf) -> GenerateOptions {
    let mut options = GenerateOptions::new(vec![fixtures().join("VG/openvg.h")], "vg", output);
    options.includes = vec!["VG/openvg.h".into()];
    options.include_dirs = vec![fixtures()];
    options.ldflags = Some("-lAmanithVG".into());
    options
}

#[test]
fn openvg_bindings() {
    let dir = tempfile::tempdir().unwrap();
    let options = openvg_options(dir.path().join("vg.go"));
    let bindings = generate(&options, &PrefixNamer::openvg()).unwrap();

    let enums: Vec<&str> = bindings.enums.iter().map(|e| e.identifier.as_str()).collect();
    assert_eq!(enums, ["VGboolean", "VGErrorCode", "VGPathDatatype", "VGPaintMode"]);
    assert_eq!(bindings.functions.len(), 10);
    assert_eq!(bindings.functions[0].identifier, "vgGetError");

    let text = std::fs::read_to_string(&options.output).unwrap();
    assert!(text.starts_with(
        "package vg\n\n//#cgo LDFLAGS: -lAmanithVG\n//#include \"VG/openvg.h\"\nimport \"C\"\n\nimport \"unsafe\"\n"
    ));
    assert!(text.contains(
        "\ntype ErrorCodeEnum int32\nconst (\n\tNoError ErrorCodeEnum = 0\n\tBadHandleError ErrorCodeEnum = 4096\n"
    ));
    assert!(text.contains("\tPathDatatypeS16 PathDatatypeEnum = 1\n"));
    assert!(text.contains("\tFillPath PaintModeEnum = 2\n"));
    assert!(text.contains("\tErrorCodeForceSize ErrorCodeEnum = 2147483647\n"));
    assert!(text.contains(
        "func GetError() ErrorCodeEnum {\n\tret := C.vgGetError()\n\treturn (ErrorCodeEnum)(ret)\n}\n"
    ));
    assert!(text.contains(
        "func Setfv(\n\t_type int32,\n\tcount int32,\n\tvalues *float32,\n) {\n\tC.vgSetfv(\n\t\t(C.VGint)(_type),\n\t\t(C.VGint)(count),\n\t\t(*C.VGfloat)(values),\n\t)\n}\n"
    ));
    assert!(text.contains("\t\tunsafe.Pointer(pathData),\n"));
    assert!(text.contains("\t\t(*C.VGubyte)(pathSegments),\n"));
    assert!(text.contains(") uint32 {\n\tret := C.vgCreatePath(\n"));
    assert!(text.contains("\t\t(C.VGPathDatatype)(datatype),\n"));
    assert!(text.contains("\treturn (BooleanEnum)(ret)\n"));
}

#[test]
fn generation_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let options = openvg_options(dir.path().join("vg.go"));
    generate(&options, &PrefixNamer::openvg()).unwrap();
    let first = std::fs::read(&options.output).unwrap();
    generate(&options, &PrefixNamer::openvg()).unwrap();
    let second = std::fs::read(&options.output).unwrap();
    assert_eq!(first, second);
}

#[test]
fn output_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("vg.go");
    std::fs::write(&output, "stale content that is much longer than nothing ".repeat(2000)).unwrap();
    let options = openvg_options(output.clone());
    generate(&options, &DefaultNamer).unwrap();
    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("package vg\n"));
    assert!(!text.contains("stale"));
}

#[test]
fn default_namer_keeps_c_spelling() {
    let dir = tempfile::tempdir().unwrap();
    let options = openvg_options(dir.path().join("vg.go"));
    let bindings = generate(&options, &DefaultNamer).unwrap();
    let text = std::fs::read_to_string(&options.output).unwrap();
    assert!(text.contains("func VgFlush() {\n\tC.vgFlush()\n}\n"));
    assert!(text.contains("type VGPaintMode int32\n"));

    let load = bindings.functions.iter().find(|f| f.identifier == "vgLoadMatrix").unwrap();
    let m = BindType::new(&load.parameters[0].ty);
    assert_eq!(m.go_type(&DefaultNamer), "*float32");
    assert!(m.requires_cast());
}

#[test]
fn parse_failure_leaves_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let header = dir.path().join("broken.h");
    std::fs::write(&header, "int broken(int a;\n").unwrap();
    let output = dir.path().join("out.go");
    std::fs::write(&output, "previous").unwrap();

    let options = GenerateOptions::new(vec![header], "broken", output.clone());
    let err = generate(&options, &DefaultNamer).unwrap_err();
    assert!(matches!(err, GenerateError::Parse(_)));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous");
}

#[test]
fn unwritable_output_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let header = dir.path().join("ok.h");
    std::fs::write(&header, "void ok(void);\n").unwrap();
    let options = GenerateOptions::new(vec![header], "ok", dir.path().join("missing/ok.go"));
    let err = generate(&options, &DefaultNamer).unwrap_err();
    assert!(matches!(err, GenerateError::Output { .. }));
}
