use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{IppToolError, TestCase, TESTCASE_SCHEMA_V1};

pub const PROGRAM_FILE: &str = "program.xml";
pub const INPUT_FILE: &str = "input.txt";
pub const CASE_FILE: &str = "testcase.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseSources {
    pub program_xml: String,
    /// Contents of `input.txt`, empty when the case has none.
    pub input: String,
}

fn read_file(path: &Path) -> Result<String, IppToolError> {
    fs::read_to_string(path).map_err(|source| IppToolError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_case_sources(case_dir: &Path) -> Result<CaseSources, IppToolError> {
    let program_xml = read_file(&case_dir.join(PROGRAM_FILE))?;
    let input_path = case_dir.join(INPUT_FILE);
    let input = if input_path.is_file() {
        read_file(&input_path)?
    } else {
        String::new()
    };
    Ok(CaseSources { program_xml, input })
}

pub fn read_test_case(case_path: &Path) -> Result<TestCase, IppToolError> {
    let raw = read_file(case_path)?;
    let parsed: TestCase = serde_json::from_str(&raw).map_err(|source| IppToolError::ParseCase {
        path: case_path.to_path_buf(),
        source,
    })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(IppToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}

/// Directories under `root` that hold a `testcase.json`, sorted by path.
pub fn discover_cases(root: &Path) -> Result<Vec<PathBuf>, IppToolError> {
    let mut cases = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|source| IppToolError::Scan {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && entry.file_name() == CASE_FILE {
            if let Some(parent) = entry.path().parent() {
                cases.push(parent.to_path_buf());
            }
        }
    }

    if cases.is_empty() {
        return Err(IppToolError::NoCases {
            path: root.to_path_buf(),
        });
    }
    cases.sort();
    Ok(cases)
}
