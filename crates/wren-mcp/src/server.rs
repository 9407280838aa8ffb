//! MCP server implementation for the memory tools.
//!
//! Uses the rmcp SDK's macro-based approach for defining tools. Tool bodies
//! delegate to [`MemoryOperations`] and convert the envelope to a tool result.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};

use wren_client::MemoryBackend;

use crate::operations::MemoryOperations;
use crate::tools::*;

/// MCP server for hosted memory operations.
#[derive(Clone)]
pub struct MemoryServer {
    operations: MemoryOperations,
    tool_router: ToolRouter<MemoryServer>,
}

#[tool_router]
impl MemoryServer {
    /// Create a server backed by `backend`.
    pub fn new(backend: Arc<dyn MemoryBackend>) -> Self {
        Self {
            operations: MemoryOperations::new(backend),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "memory_add",
        description = "Add a memory. Requires user_id. Optional: agent_id, run_id, metadata (JSON object), includes/excludes (extraction guidance for the backend), timestamp (Unix seconds, 0 ignored), expiration_date (ISO 8601). Set enable_graph to activate graph processing."
    )]
    async fn memory_add(
        &self,
        Parameters(input): Parameters<AddMemoryInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.operations.add(input).await.into())
    }

    #[tool(
        name = "memory_search",
        description = "Search memories. Requires user_id and query. filters is a JSON object string, e.g. {\"categories\": [\"work\"]}. threshold is a minimum similarity score (0.0 ignored). memory_duration (short_term, long_term) and memory_type (conversation, working, attention, episodic, semantic, procedural) narrow the search."
    )]
    async fn memory_search(
        &self,
        Parameters(input): Parameters<SearchMemoryInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.operations.search(input).await.into())
    }

    #[tool(
        name = "memory_get_all",
        description = "List memories for a user. Use page/page_size for pagination; limit is ignored when either is given."
    )]
    async fn memory_get_all(
        &self,
        Parameters(input): Parameters<GetAllMemoriesInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.operations.get_all(input).await.into())
    }

    #[tool(name = "memory_get", description = "Get a specific memory by its ID.")]
    async fn memory_get(
        &self,
        Parameters(input): Parameters<MemoryIdInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.operations.get(input).await.into())
    }

    #[tool(name = "memory_update", description = "Replace the text of a memory by its ID.")]
    async fn memory_update(
        &self,
        Parameters(input): Parameters<UpdateMemoryInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.operations.update(input).await.into())
    }

    #[tool(
        name = "memory_delete",
        description = "Delete a memory by its ID. This permanently removes the memory."
    )]
    async fn memory_delete(
        &self,
        Parameters(input): Parameters<MemoryIdInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.operations.delete(input).await.into())
    }

    #[tool(
        name = "memory_add_short_term",
        description = "Add a short-term memory tied to a session. Requires user_id and run_id. memory_type is conversation (default), working or attention."
    )]
    async fn memory_add_short_term(
        &self,
        Parameters(input): Parameters<ShortTermMemoryInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.operations.add_short_term(input).await.into())
    }

    #[tool(
        name = "memory_add_episodic",
        description = "Add an episodic memory: a specific event or experience. Optional event_date, e.g. 2023-05-15."
    )]
    async fn memory_add_episodic(
        &self,
        Parameters(input): Parameters<EpisodicMemoryInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.operations.add_episodic(input).await.into())
    }

    #[tool(
        name = "memory_add_semantic",
        description = "Add a semantic memory: a fact or preference. Optional category, e.g. preference or knowledge. Graph processing is on by default."
    )]
    async fn memory_add_semantic(
        &self,
        Parameters(input): Parameters<SemanticMemoryInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.operations.add_semantic(input).await.into())
    }

    #[tool(
        name = "memory_add_procedural",
        description = "Add a procedural memory: a skill or habit. Optional skill_area, e.g. coding or workflow."
    )]
    async fn memory_add_procedural(
        &self,
        Parameters(input): Parameters<ProceduralMemoryInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.operations.add_procedural(input).await.into())
    }

    #[tool(
        name = "memory_add_selective",
        description = "Add a memory after filtering the text with regular expressions. includes keeps only matching portions (joined by blank lines); excludes then removes matching portions. Nothing is stored if no text remains."
    )]
    async fn memory_add_selective(
        &self,
        Parameters(input): Parameters<SelectiveMemoryInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.operations.add_selective(input).await.into())
    }
}

#[tool_handler]
impl ServerHandler for MemoryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Memory server backed by a hosted memory API. Use memory_add to store \
                 memories, memory_search to find relevant ones, memory_get_all to list them, \
                 and memory_get, memory_update or memory_delete to manage one by ID. \
                 Typed variants store short-term, episodic, semantic and procedural memories; \
                 memory_add_selective filters text with regular expressions before storing."
                    .to_string(),
            ),
        }
    }
}
