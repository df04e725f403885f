use std::io::{BufRead, Write};

use ipp_core::{IppError, Program};
use ipp_parser::parse_program_xml;
use ipp_runtime::{ExecStats, Interpreter, InterpreterOptions};
use tracing::debug;

pub struct RunProgramOptions<'io> {
    pub source_xml: String,
    pub input: Box<dyn BufRead + 'io>,
    pub output: Box<dyn Write + 'io>,
    pub diagnostics: Box<dyn Write + 'io>,
    pub step_limit: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunProgramResult {
    pub exit_code: i32,
    pub stats: ExecStats,
}

pub fn load_program_from_xml(source_xml: &str) -> Result<Program, IppError> {
    parse_program_xml(source_xml)
}

/// Loads the program, echoes its name and description to the diagnostic stream and builds
/// an interpreter ready to run.
pub fn create_interpreter_from_xml(
    options: RunProgramOptions<'_>,
) -> Result<Interpreter<'_>, IppError> {
    let RunProgramOptions {
        source_xml,
        input,
        output,
        mut diagnostics,
        step_limit,
    } = options;

    let program = load_program_from_xml(&source_xml)?;
    echo_header(&mut diagnostics, &program);

    Interpreter::new(InterpreterOptions {
        program,
        input,
        output,
        diagnostics,
        step_limit,
    })
}

pub fn run_program_from_xml(options: RunProgramOptions<'_>) -> Result<RunProgramResult, IppError> {
    let mut interpreter = create_interpreter_from_xml(options)?;
    let exit_code = interpreter.run()?;
    let stats = interpreter.stats();
    debug!(exit_code, instructions = stats.instructions, "program finished");
    Ok(RunProgramResult { exit_code, stats })
}

fn echo_header(diagnostics: &mut dyn Write, program: &Program) {
    if let Some(name) = &program.name {
        let _ = writeln!(diagnostics, "Name:   {}", name);
    }
    if let Some(description) = &program.description {
        let _ = writeln!(diagnostics, "Desc:   {}", description);
    }
}
