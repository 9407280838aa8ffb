//! MCP tool input type definitions.
//!
//! These types are used with `schemars::JsonSchema` to generate the JSON Schema
//! that MCP clients use to understand tool parameters. Empty strings and zero
//! numbers are accepted and mean "not provided".

use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_short_term_type() -> String {
    "conversation".to_string()
}

/// Input for memory_add tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddMemoryInput {
    /// The content to store as a memory.
    pub text: String,

    /// User ID for scoping the memory.
    pub user_id: String,

    /// Agent ID the memory belongs to.
    #[serde(default)]
    pub agent_id: Option<String>,

    /// Session/conversation identifier.
    #[serde(default)]
    pub run_id: Option<String>,

    /// Optional metadata as a JSON object.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,

    /// Enable knowledge-graph processing.
    #[serde(default)]
    pub enable_graph: bool,

    /// Guidance passed to the backend about what to extract.
    #[serde(default)]
    pub includes: Option<String>,

    /// Guidance passed to the backend about what to skip.
    #[serde(default)]
    pub excludes: Option<String>,

    /// Custom creation time as a Unix timestamp. 0 is ignored.
    #[serde(default)]
    pub timestamp: Option<i64>,

    /// Expiration date as an ISO 8601 string.
    #[serde(default)]
    pub expiration_date: Option<String>,
}

/// Input for memory_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchMemoryInput {
    /// The search query.
    pub query: String,

    /// User ID to scope search.
    pub user_id: String,

    #[serde(default)]
    pub agent_id: Option<String>,

    #[serde(default)]
    pub run_id: Option<String>,

    /// Filters as a JSON object string, e.g. `{"categories": ["work"]}`.
    #[serde(default)]
    pub filters: Option<String>,

    /// Minimum similarity score. 0.0 is ignored.
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Use graph retrieval.
    #[serde(default)]
    pub enable_graph: bool,

    /// Restrict to "short_term" or "long_term" memories.
    #[serde(default)]
    pub memory_duration: Option<String>,

    /// Restrict to one memory type: "conversation", "working", "attention",
    /// "episodic", "semantic" or "procedural".
    #[serde(default)]
    pub memory_type: Option<String>,
}

/// Input for memory_get_all tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetAllMemoriesInput {
    /// User ID whose memories to list.
    pub user_id: String,

    #[serde(default)]
    pub agent_id: Option<String>,

    #[serde(default)]
    pub run_id: Option<String>,

    /// Maximum number of memories. Ignored when `page` or `page_size` is set.
    #[serde(default)]
    pub limit: Option<u32>,

    /// Page number, starting at 1.
    #[serde(default)]
    pub page: Option<u32>,

    /// Memories per page.
    #[serde(default)]
    pub page_size: Option<u32>,

    /// Include graph relations in the result.
    #[serde(default)]
    pub enable_graph: bool,
}

/// Input for memory_get and memory_delete tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MemoryIdInput {
    /// The memory ID.
    pub memory_id: String,
}

/// Input for memory_update tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateMemoryInput {
    /// The memory ID to update.
    pub memory_id: String,

    /// Replacement text for the memory.
    pub data: String,
}

/// Input for memory_add_short_term tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShortTermMemoryInput {
    /// The content to remember for this session.
    pub text: String,

    pub user_id: String,

    /// Session/conversation identifier. Required.
    pub run_id: String,

    /// One of "conversation", "working" or "attention".
    #[serde(default = "default_short_term_type")]
    pub memory_type: String,

    #[serde(default)]
    pub metadata: Option<serde_json::Value>,

    #[serde(default)]
    pub enable_graph: bool,
}

/// Input for memory_add_episodic tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EpisodicMemoryInput {
    /// Description of the event or experience.
    pub text: String,

    pub user_id: String,

    /// When the event occurred, e.g. "2023-05-15".
    #[serde(default)]
    pub event_date: Option<String>,

    #[serde(default)]
    pub metadata: Option<serde_json::Value>,

    #[serde(default)]
    pub enable_graph: bool,
}

/// Input for memory_add_semantic tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SemanticMemoryInput {
    /// The fact or preference.
    pub text: String,

    pub user_id: String,

    /// Type of fact, e.g. "preference", "personal_info", "knowledge".
    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub metadata: Option<serde_json::Value>,

    /// Knowledge-graph processing, on unless disabled.
    #[serde(default = "default_true")]
    pub enable_graph: bool,
}

/// Input for memory_add_procedural tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProceduralMemoryInput {
    /// The skill or habit.
    pub text: String,

    pub user_id: String,

    /// Area of the skill, e.g. "coding", "communication", "workflow".
    #[serde(default)]
    pub skill_area: Option<String>,

    #[serde(default)]
    pub metadata: Option<serde_json::Value>,

    #[serde(default)]
    pub enable_graph: bool,
}

/// Input for memory_add_selective tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SelectiveMemoryInput {
    /// The text to filter and store.
    pub text: String,

    pub user_id: String,

    /// Regex for text to keep. Only matching portions are stored.
    #[serde(default)]
    pub includes: Option<String>,

    /// Regex for text to remove. Applied after `includes`.
    #[serde(default)]
    pub excludes: Option<String>,

    #[serde(default)]
    pub metadata: Option<serde_json::Value>,

    #[serde(default)]
    pub run_id: Option<String>,

    #[serde(default)]
    pub enable_graph: bool,
}
