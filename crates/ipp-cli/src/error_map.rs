use std::fmt::Display;
use std::path::Path;

use ipp_core::{ErrorKind, IppError};

fn map_error(kind: ErrorKind, path: &Path, error: impl Display) -> IppError {
    IppError::new(kind, format!("{}: {}", path.display(), error))
}

pub(crate) fn emit_error(error: IppError) -> i32 {
    match error.order {
        Some(order) => eprintln!("Error: {} (instruction {})", error, order),
        None => eprintln!("Error: {}", error),
    }
    error.exit_code()
}

pub(crate) fn map_args(error: impl Display) -> IppError {
    IppError::new(ErrorKind::Args, error.to_string().trim_end().to_string())
}

pub(crate) fn map_input(path: &Path, error: std::io::Error) -> IppError {
    map_error(ErrorKind::Input, path, error)
}

pub(crate) fn map_output(path: &Path, error: std::io::Error) -> IppError {
    map_error(ErrorKind::Output, path, error)
}
