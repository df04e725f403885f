use super::*;

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be monotonic")
        .as_nanos();
    std::env::temp_dir().join(format!("ippcode-rs-{}-{}", name, nanos))
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent should be created");
    }
    fs::write(path, content).expect("file should be written");
}

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("ipp-interpret").chain(args.iter().copied()))
        .expect("arguments should parse")
}

const COUNTER_PROGRAM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<program language="IPPcode20">
  <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@n</arg1></instruction>
  <instruction order="2" opcode="READ"><arg1 type="var">GF@n</arg1><arg2 type="type">int</arg2></instruction>
  <instruction order="3" opcode="LABEL"><arg1 type="label">loop</arg1></instruction>
  <instruction order="4" opcode="SUB"><arg1 type="var">GF@n</arg1><arg2 type="var">GF@n</arg2><arg3 type="int">1</arg3></instruction>
  <instruction order="5" opcode="JUMPIFNEQ"><arg1 type="label">loop</arg1><arg2 type="var">GF@n</arg2><arg3 type="int">0</arg3></instruction>
  <instruction order="6" opcode="EXIT"><arg1 type="int">3</arg1></instruction>
</program>
"#;

#[test]
fn validate_requires_source_or_input() {
    let error = validate(&cli(&[])).expect_err("no files should fail");
    assert_eq!(error.kind, ErrorKind::Args);
    assert!(validate(&cli(&["--source=a.xml"])).is_ok());
    assert!(validate(&cli(&["--input", "in.txt"])).is_ok());
}

#[test]
fn validate_rejects_help_with_other_options() {
    assert!(validate(&cli(&["--help"])).is_ok());
    let error = validate(&cli(&["--help", "--source=a.xml"])).expect_err("help must be alone");
    assert_eq!(error.kind, ErrorKind::Args);
}

#[test]
fn validate_requires_stats_file_for_stat_flags() {
    let error = validate(&cli(&["--source=a.xml", "--insts"])).expect_err("missing --stats");
    assert_eq!(error.kind, ErrorKind::Args);
    assert!(validate(&cli(&["--source=a.xml", "--stats=s.txt", "--vars"])).is_ok());
    assert!(validate(&cli(&["--source=a.xml", "--stats=s.txt"])).is_ok());
}

#[test]
fn help_text_lists_every_exit_code() {
    let text = help_text();
    assert!(text.starts_with("Usage: ipp-interpret"));
    for kind in EXIT_CODES {
        assert!(text.contains(kind.name()), "missing {}", kind.name());
    }
    assert!(text.contains("  53  ERR_OP_TYPE"));
}

#[test]
fn run_cli_from_args_maps_argument_errors_to_exit_code_10() {
    assert_eq!(run_cli_from_args(["ipp-interpret", "--bogus"]), 10);
    assert_eq!(run_cli_from_args(["ipp-interpret"]), 10);
    assert_eq!(
        run_cli_from_args(["ipp-interpret", "--help", "--vars"]),
        10
    );
}

#[test]
fn run_cli_from_args_prints_help() {
    assert_eq!(run_cli_from_args(["ipp-interpret", "--help"]), 0);
}

#[test]
fn run_cli_from_args_reports_unreadable_files() {
    let missing = temp_path("missing-source.xml");
    let source_arg = format!("--source={}", missing.display());
    assert_eq!(run_cli_from_args(["ipp-interpret", source_arg.as_str()]), 11);

    let source = temp_path("source-ok.xml");
    write_file(&source, COUNTER_PROGRAM);
    let source_arg = format!("--source={}", source.display());
    let input_arg = format!("--input={}", temp_path("missing-input.txt").display());
    assert_eq!(
        run_cli_from_args(["ipp-interpret", source_arg.as_str(), input_arg.as_str()]),
        11
    );
}

#[test]
fn run_cli_from_args_writes_stats_in_flag_order() {
    let root = temp_path("stats");
    let source = root.join("program.xml");
    let input = root.join("input.txt");
    let stats = root.join("stats.txt");
    write_file(&source, COUNTER_PROGRAM);
    write_file(&input, "3\n");

    let code = run_cli_from_args([
        "ipp-interpret".to_string(),
        format!("--source={}", source.display()),
        format!("--input={}", input.display()),
        format!("--stats={}", stats.display()),
        "--vars".to_string(),
        "--insts".to_string(),
    ]);
    assert_eq!(code, 3);

    // DEFVAR, READ, 3 x (SUB, JUMPIFNEQ), EXIT; LABEL is not counted.
    let written = fs::read_to_string(&stats).expect("stats file should exist");
    assert_eq!(written, "1\n9\n");
}

#[test]
fn run_cli_from_args_returns_structure_errors() {
    let source = temp_path("bad-language.xml");
    write_file(&source, r#"<program language="Python"/>"#);
    let source_arg = format!("--source={}", source.display());
    let input_arg = format!("--input={}", source.display());
    assert_eq!(
        run_cli_from_args(["ipp-interpret", source_arg.as_str(), input_arg.as_str()]),
        32
    );
}
