use std::path::Path;

use ipp_api::{run_program_from_xml, RunProgramOptions};

use crate::source::{read_case_sources, read_test_case, CASE_FILE};
use crate::{IppToolError, TestCase};

const MAX_STEPS: u64 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub exit_code: i32,
    pub stdout: String,
    pub diagnostics: String,
    /// Executed instructions; only known when the run did not fail.
    pub instructions: Option<u64>,
    pub error: Option<String>,
}

/// Runs the case program. Interpreter failures are part of the report, not tool errors.
pub fn run_case(case_dir: &Path) -> Result<RunReport, IppToolError> {
    let sources = read_case_sources(case_dir)?;
    let mut stdout = Vec::new();
    let mut diagnostics = Vec::new();

    let result = run_program_from_xml(RunProgramOptions {
        source_xml: sources.program_xml,
        input: Box::new(sources.input.as_bytes()),
        output: Box::new(&mut stdout),
        diagnostics: Box::new(&mut diagnostics),
        step_limit: Some(MAX_STEPS),
    });

    let (exit_code, instructions, error) = match result {
        Ok(result) => (result.exit_code, Some(result.stats.instructions), None),
        Err(error) => (error.exit_code(), None, Some(error.to_string())),
    };

    Ok(RunReport {
        exit_code,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        diagnostics: String::from_utf8_lossy(&diagnostics).into_owned(),
        instructions,
        error,
    })
}

pub fn check_report(case: &TestCase, report: &RunReport) -> Result<(), IppToolError> {
    if report.exit_code != case.expected_exit_code {
        return Err(IppToolError::ExitCodeMismatch {
            expected: case.expected_exit_code,
            actual: report.exit_code,
            error: report.error.clone().unwrap_or_else(|| "none".to_string()),
        });
    }

    if report.stdout != case.expected_stdout {
        return Err(IppToolError::StdoutMismatch {
            expected: case.expected_stdout.clone(),
            actual: report.stdout.clone(),
        });
    }

    if let Some(expected) = case.expected_instructions {
        if report.instructions != Some(expected) {
            return Err(IppToolError::InstructionCountMismatch {
                expected,
                actual: report.instructions,
            });
        }
    }

    Ok(())
}

pub fn assert_case(case_dir: &Path) -> Result<RunReport, IppToolError> {
    let case = read_test_case(&case_dir.join(CASE_FILE))?;
    let report = run_case(case_dir)?;
    check_report(&case, &report)?;
    Ok(report)
}

#[cfg(test)]
mod runner_tests {
    use super::*;

    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::TESTCASE_SCHEMA_V1;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should move forward")
            .as_nanos();
        std::env::temp_dir().join(format!("ipp-tool-runner-{}-{}", name, nanos))
    }

    fn write_file(path: &Path, content: &str) {
        let parent = path.parent().expect("path should have parent");
        fs::create_dir_all(parent).expect("parent dir should be created");
        fs::write(path, content).expect("file should be written");
    }

    fn case(expected_exit_code: i32, expected_stdout: &str) -> TestCase {
        TestCase {
            schema_version: TESTCASE_SCHEMA_V1.to_string(),
            expected_exit_code,
            expected_stdout: expected_stdout.to_string(),
            expected_instructions: None,
        }
    }

    const ECHO_PROGRAM: &str = r#"<program language="IPPcode20" name="echo">
  <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@x</arg1></instruction>
  <instruction order="2" opcode="READ"><arg1 type="var">GF@x</arg1><arg2 type="type">string</arg2></instruction>
  <instruction order="3" opcode="WRITE"><arg1 type="var">GF@x</arg1></instruction>
</program>"#;

    #[test]
    fn run_case_feeds_input_and_captures_streams() {
        let root = temp_dir("echo");
        write_file(&root.join("program.xml"), ECHO_PROGRAM);
        write_file(&root.join("input.txt"), "hello\n");

        let report = run_case(&root).expect("run should pass");
        assert_eq!(report.exit_code, 0);
        assert_eq!(report.stdout, "hello");
        assert_eq!(report.diagnostics, "Name:   echo\n");
        assert_eq!(report.instructions, Some(3));
        assert_eq!(report.error, None);
        check_report(&case(0, "hello"), &report).expect("report should match");
    }

    #[test]
    fn run_case_reports_interpreter_errors_as_exit_codes() {
        let root = temp_dir("error");
        write_file(
            &root.join("program.xml"),
            r#"<program language="IPPcode20">
  <instruction order="1" opcode="WRITE"><arg1 type="var">GF@missing</arg1></instruction>
</program>"#,
        );

        let report = run_case(&root).expect("run should produce a report");
        assert_eq!(report.exit_code, 54);
        assert_eq!(report.instructions, None);
        assert!(report
            .error
            .as_deref()
            .is_some_and(|error| error.starts_with("ERR_VAR_NOT_FOUND")));
    }

    #[test]
    fn check_report_flags_each_mismatch() {
        let report = RunReport {
            exit_code: 0,
            stdout: "a".to_string(),
            diagnostics: String::new(),
            instructions: Some(2),
            error: None,
        };

        let error = check_report(&case(1, "a"), &report).expect_err("exit code differs");
        assert!(matches!(error, IppToolError::ExitCodeMismatch { .. }));

        let error = check_report(&case(0, "b"), &report).expect_err("stdout differs");
        assert!(matches!(error, IppToolError::StdoutMismatch { .. }));

        let mut counted = case(0, "a");
        counted.expected_instructions = Some(3);
        let error = check_report(&counted, &report).expect_err("count differs");
        assert!(matches!(
            error,
            IppToolError::InstructionCountMismatch { .. }
        ));
    }

    #[test]
    fn assert_case_reads_testcase_next_to_program() {
        let root = temp_dir("assert");
        write_file(&root.join("program.xml"), ECHO_PROGRAM);
        write_file(&root.join("input.txt"), "x\n");
        write_file(
            &root.join("testcase.json"),
            r#"{"schemaVersion":"ipp-tool-case.v1","expectedStdout":"x","expectedInstructions":3}"#,
        );
        assert_case(&root).expect("case should pass");

        write_file(
            &root.join("testcase.json"),
            r#"{"schemaVersion":"ipp-tool-case.v1","expectedStdout":"y"}"#,
        );
        let error = assert_case(&root).expect_err("stdout mismatch should fail");
        assert!(matches!(error, IppToolError::StdoutMismatch { .. }));
    }
}
