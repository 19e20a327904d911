use serde::{Deserialize, Serialize};

use crate::rewrite::EditSummary;

/// Generate a fresh execution id
pub fn generate_execution_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Machine-readable outcome of one run, printed with `--json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditResponse {
    pub success: bool,
    pub execution_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub modified_count: usize,
    pub record_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_ending: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_checksum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_checksum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl EditResponse {
    pub fn success(execution_id: String, summary: &EditSummary) -> Self {
        Self {
            success: true,
            execution_id,
            section: Some(summary.section.to_string()),
            field: Some(summary.field.clone()),
            token_index: Some(summary.token_index),
            value: Some(summary.value.clone()),
            modified_count: summary.modified_count,
            record_count: summary.record_count,
            line_ending: Some(summary.line_ending.clone()),
            input_checksum: Some(summary.input_checksum.clone()),
            output_checksum: Some(summary.output_checksum.clone()),
            output_path: summary.output_path.clone(),
            error: None,
            exit_code: None,
        }
    }

    pub fn failure(execution_id: String, error: String, exit_code: i32) -> Self {
        Self {
            success: false,
            execution_id,
            section: None,
            field: None,
            token_index: None,
            value: None,
            modified_count: 0,
            record_count: 0,
            line_ending: None,
            input_checksum: None,
            output_checksum: None,
            output_path: None,
            error: Some(error),
            exit_code: Some(exit_code),
        }
    }
}
