//! JSON envelope returned by every tool.

use rmcp::model::{CallToolResult, Content};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use wren_core::WrenError;

/// Outcome class of a tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Warning,
    Error,
}

/// Tool response envelope.
///
/// Only the fields relevant to a given tool are serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub status: ToolStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Backend response to a write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Search hits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
    /// Listed memories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memories: Option<Value>,
    /// A single memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<String>,
    /// Character count of the text before filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_length: Option<usize>,
    /// Character count of the text that was stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ToolResponse {
    fn with_status(status: ToolStatus) -> Self {
        Self {
            status,
            message: None,
            details: None,
            results: None,
            memories: None,
            memory: None,
            memory_type: None,
            original_length: None,
            processed_length: None,
            warnings: Vec::new(),
        }
    }

    pub fn success() -> Self {
        Self::with_status(ToolStatus::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::with_status(ToolStatus::Warning)
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::with_status(ToolStatus::Error)
        }
    }

    /// Error envelope carrying the error's message.
    pub fn from_error(err: &WrenError) -> Self {
        Self::error(err.message())
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_results(mut self, results: Value) -> Self {
        self.results = Some(results);
        self
    }

    pub fn with_memories(mut self, memories: Value) -> Self {
        self.memories = Some(memories);
        self
    }

    pub fn with_memory(mut self, memory: Value) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_memory_type(mut self, memory_type: impl Into<String>) -> Self {
        self.memory_type = Some(memory_type.into());
        self
    }

    pub fn with_lengths(mut self, original: usize, processed: usize) -> Self {
        self.original_length = Some(original);
        self.processed_length = Some(processed);
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn is_error(&self) -> bool {
        self.status == ToolStatus::Error
    }

    /// Pretty-printed JSON text of the envelope.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl From<ToolResponse> for CallToolResult {
    fn from(response: ToolResponse) -> Self {
        let content = vec![Content::text(response.to_json())];
        if response.is_error() {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_omits_unset_fields() {
        let value = serde_json::to_value(ToolResponse::success().with_details(json!({"id": "m1"})))
            .unwrap();
        assert_eq!(value, json!({"status": "success", "details": {"id": "m1"}}));
    }

    #[test]
    fn test_warning_envelope() {
        let value = serde_json::to_value(ToolResponse::warning("nothing left")).unwrap();
        assert_eq!(value, json!({"status": "warning", "message": "nothing left"}));
    }

    #[test]
    fn test_selective_fields() {
        let value = serde_json::to_value(
            ToolResponse::success()
                .with_details(json!([]))
                .with_lengths(12, 5)
                .with_warnings(vec!["Invalid include pattern '(': unclosed".to_string()]),
        )
        .unwrap();
        assert_eq!(value["original_length"], 12);
        assert_eq!(value["processed_length"], 5);
        assert_eq!(value["warnings"][0], "Invalid include pattern '(': unclosed");
    }

    #[test]
    fn test_error_becomes_tool_error() {
        let result: CallToolResult = ToolResponse::from_error(&WrenError::not_found("m1")).into();
        assert_eq!(result.is_error, Some(true));

        let response = ToolResponse::from_error(&WrenError::timeout("Timed out trying to add memory"));
        assert_eq!(response.message.as_deref(), Some("Timed out trying to add memory"));

        let result: CallToolResult = ToolResponse::success().into();
        assert_eq!(result.is_error, Some(false));
    }
}
