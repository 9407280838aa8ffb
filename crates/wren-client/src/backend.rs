//! Backend trait implemented by memory API clients.

use async_trait::async_trait;
use serde_json::Value;

use wren_core::error::WrenResult;
use wren_core::types::{AddRequest, GetAllRequest, SearchRequest};

/// Memory storage backend.
///
/// Responses are the backend's JSON, returned as-is so callers can relay them
/// without loss.
#[async_trait]
pub trait MemoryBackend: Send + Sync {
    /// Add a memory.
    async fn add(&self, request: AddRequest) -> WrenResult<Value>;

    /// Search memories.
    async fn search(&self, request: SearchRequest) -> WrenResult<Value>;

    /// List memories for an identity.
    async fn get_all(&self, request: GetAllRequest) -> WrenResult<Value>;

    /// Get a memory by ID. Returns `Ok(None)` if it does not exist.
    async fn get(&self, memory_id: &str) -> WrenResult<Option<Value>>;

    /// Replace the text of a memory.
    async fn update(&self, memory_id: &str, data: &str) -> WrenResult<Value>;

    /// Delete a memory.
    async fn delete(&self, memory_id: &str) -> WrenResult<Value>;
}
