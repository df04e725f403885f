use std::path::PathBuf;

use ipp_tool::{assert_case, discover_cases};

#[test]
fn every_bundled_program_matches_its_testcase() {
    let programs_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("programs");
    let cases = discover_cases(&programs_root).expect("bundled programs should exist");

    let failures = cases
        .iter()
        .filter_map(|case_dir| {
            assert_case(case_dir)
                .err()
                .map(|error| format!("{}: {}", case_dir.display(), error))
        })
        .collect::<Vec<_>>();

    assert!(failures.is_empty(), "failing cases:\n{}", failures.join("\n"));
}
