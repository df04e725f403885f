use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Debug, Parser)]
#[command(name = "ipp-interpret")]
#[command(about = "Interpreter for IPPcode20 programs in XML form")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub(crate) struct Cli {
    #[arg(long = "help", action = ArgAction::SetTrue)]
    pub(crate) help: bool,
    /// XML program; read from standard input when omitted.
    #[arg(long = "source", value_name = "FILE")]
    pub(crate) source: Option<PathBuf>,
    /// Lines consumed by READ; read from standard input when omitted.
    #[arg(long = "input", value_name = "FILE")]
    pub(crate) input: Option<PathBuf>,
    #[arg(long = "stats", value_name = "FILE")]
    pub(crate) stats: Option<PathBuf>,
    #[arg(long = "insts", action = ArgAction::SetTrue)]
    pub(crate) insts: bool,
    #[arg(long = "vars", action = ArgAction::SetTrue)]
    pub(crate) vars: bool,
}

pub(crate) const USAGE: &str = "\
Usage: ipp-interpret [--source=FILE] [--input=FILE] [--stats=FILE [--insts] [--vars]]

Interprets an IPPcode20 program stored as XML.

Options:
  --help          Print this help and exit. Cannot be combined with other options.
  --source=FILE   XML program (standard input when omitted).
  --input=FILE    Input lines for READ (standard input when omitted).
  --stats=FILE    Write execution statistics to FILE.
  --insts         Record the number of executed instructions.
  --vars          Record the peak number of initialized variables.

At least one of --source and --input must be given.
";
