use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read};

use clap::Parser;
use ipp_api::{run_program_from_xml, RunProgramOptions};
use ipp_core::{ErrorKind, IppError};
use tracing::debug;

mod cli_args;
mod error_map;
mod stats_file;

pub(crate) use cli_args::{Cli, USAGE};
pub(crate) use error_map::{emit_error, map_args, map_input, map_output};
pub(crate) use stats_file::{requested_stats, write_stats_file, StatKind};

const EXIT_CODES: [ErrorKind; 13] = [
    ErrorKind::Args,
    ErrorKind::Input,
    ErrorKind::Output,
    ErrorKind::XmlParse,
    ErrorKind::XmlStruct,
    ErrorKind::Semantic,
    ErrorKind::OperandType,
    ErrorKind::VarNotFound,
    ErrorKind::FrameNotFound,
    ErrorKind::MissingValue,
    ErrorKind::OperandValue,
    ErrorKind::String,
    ErrorKind::Internal,
];

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = args.into_iter().map(Into::into).collect::<Vec<OsString>>();
    let cli = match Cli::try_parse_from(args.iter().cloned()) {
        Ok(cli) => cli,
        Err(error) => return emit_error(map_args(error)),
    };
    match run(cli, requested_stats(&args)) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

pub(crate) fn help_text() -> String {
    let mut text = USAGE.to_string();
    text.push_str("\nExit codes:\n  0   success, or the value given to EXIT (0-49)\n");
    for kind in EXIT_CODES {
        text.push_str(&format!("  {:<3} {}\n", kind.exit_code(), kind.name()));
    }
    text
}

fn run(cli: Cli, stat_kinds: Vec<StatKind>) -> Result<i32, IppError> {
    validate(&cli)?;
    if cli.help {
        print!("{}", help_text());
        return Ok(0);
    }

    let source_xml = read_source(&cli)?;
    let input = open_input(&cli)?;
    let result = run_program_from_xml(RunProgramOptions {
        source_xml,
        input,
        output: Box::new(BufWriter::new(io::stdout())),
        diagnostics: Box::new(io::stderr()),
        step_limit: None,
    })?;
    debug!(
        exit_code = result.exit_code,
        instructions = result.stats.instructions,
        "run finished"
    );

    if let Some(path) = &cli.stats {
        write_stats_file(path, &stat_kinds, &result.stats)?;
    }
    Ok(result.exit_code)
}

fn validate(cli: &Cli) -> Result<(), IppError> {
    let anything_else = cli.source.is_some()
        || cli.input.is_some()
        || cli.stats.is_some()
        || cli.insts
        || cli.vars;
    if cli.help {
        if anything_else {
            return Err(IppError::new(
                ErrorKind::Args,
                "--help cannot be combined with other options.",
            ));
        }
        return Ok(());
    }
    if cli.source.is_none() && cli.input.is_none() {
        return Err(IppError::new(
            ErrorKind::Args,
            "At least one of --source and --input is required.",
        ));
    }
    if (cli.insts || cli.vars) && cli.stats.is_none() {
        return Err(IppError::new(
            ErrorKind::Args,
            "--insts and --vars require --stats.",
        ));
    }
    Ok(())
}

fn read_source(cli: &Cli) -> Result<String, IppError> {
    match &cli.source {
        Some(path) => fs::read_to_string(path).map_err(|error| map_input(path, error)),
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|error| IppError::new(ErrorKind::Input, error.to_string()))?;
            Ok(source)
        }
    }
}

fn open_input(cli: &Cli) -> Result<Box<dyn BufRead>, IppError> {
    match &cli.input {
        Some(path) => {
            let file = File::open(path).map_err(|error| map_input(path, error))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

#[cfg(test)]
mod tests;
