use std::ffi::OsString;
use std::fs;
use std::path::Path;

use ipp_core::IppError;
use ipp_runtime::ExecStats;

use crate::map_output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatKind {
    Insts,
    Vars,
}

/// Statistics flags in the order they first appear on the command line.
pub(crate) fn requested_stats(args: &[OsString]) -> Vec<StatKind> {
    let mut kinds = Vec::new();
    for arg in args {
        let kind = match arg.to_str() {
            Some("--insts") => StatKind::Insts,
            Some("--vars") => StatKind::Vars,
            _ => continue,
        };
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    kinds
}

pub(crate) fn render_stats(kinds: &[StatKind], stats: &ExecStats) -> String {
    kinds
        .iter()
        .map(|kind| match kind {
            StatKind::Insts => format!("{}\n", stats.instructions),
            StatKind::Vars => format!("{}\n", stats.max_initialized_vars),
        })
        .collect()
}

pub(crate) fn write_stats_file(
    path: &Path,
    kinds: &[StatKind],
    stats: &ExecStats,
) -> Result<(), IppError> {
    fs::write(path, render_stats(kinds, stats)).map_err(|error| map_output(path, error))
}
