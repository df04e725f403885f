use serde::{Deserialize, Serialize};

pub const TESTCASE_SCHEMA_V1: &str = "ipp-tool-case.v1";

/// Expected outcome of one program under `programs/<case>/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    #[serde(default)]
    pub expected_exit_code: i32,
    #[serde(default)]
    pub expected_stdout: String,
    /// Checked only when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_instructions: Option<u64>,
}

#[cfg(test)]
mod case_tests {
    use super::*;

    #[test]
    fn testcase_deserialize_applies_defaults() {
        let parsed: TestCase = serde_json::from_str(r#"{"schemaVersion": "ipp-tool-case.v1"}"#)
            .expect("testcase should deserialize");

        assert_eq!(parsed.schema_version, TESTCASE_SCHEMA_V1);
        assert_eq!(parsed.expected_exit_code, 0);
        assert_eq!(parsed.expected_stdout, "");
        assert_eq!(parsed.expected_instructions, None);
    }

    #[test]
    fn testcase_deserialize_reads_every_field() {
        let parsed: TestCase = serde_json::from_str(
            r#"{
  "schemaVersion": "ipp-tool-case.v1",
  "expectedExitCode": 58,
  "expectedStdout": "partial\n",
  "expectedInstructions": 4
}"#,
        )
        .expect("testcase should deserialize");

        assert_eq!(parsed.expected_exit_code, 58);
        assert_eq!(parsed.expected_stdout, "partial\n");
        assert_eq!(parsed.expected_instructions, Some(4));
    }

    #[test]
    fn testcase_serialize_omits_missing_instruction_count() {
        let case = TestCase {
            schema_version: TESTCASE_SCHEMA_V1.to_string(),
            expected_exit_code: 0,
            expected_stdout: String::new(),
            expected_instructions: None,
        };
        let json = serde_json::to_string(&case).expect("testcase should serialize");
        assert!(!json.contains("expectedInstructions"));
        assert!(json.contains("\"expectedExitCode\":0"));
    }
}
