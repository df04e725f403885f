mod case;
mod runner;
mod source;

pub use case::{TestCase, TESTCASE_SCHEMA_V1};
pub use runner::{assert_case, check_report, run_case, RunReport};
pub use source::{discover_cases, read_case_sources, read_test_case, CaseSources};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IppToolError {
    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse testcase {path}: {source}")]
    ParseCase {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid testcase schema version \"{found}\", expected \"{expected}\".")]
    InvalidSchemaVersion { expected: String, found: String },
    #[error("Failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("No testcase.json files under {path}.")]
    NoCases { path: PathBuf },
    #[error("Expected exit code {expected}, actual {actual}. error={error}")]
    ExitCodeMismatch {
        expected: i32,
        actual: i32,
        error: String,
    },
    #[error("Stdout mismatch. expected={expected:?} actual={actual:?}")]
    StdoutMismatch { expected: String, actual: String },
    #[error("Expected {expected} executed instructions, actual {actual:?}.")]
    InstructionCountMismatch { expected: u64, actual: Option<u64> },
}
