//! Tool operations over an injected [`MemoryBackend`].
//!
//! Each operation turns tool input into a typed request, calls the backend and
//! wraps the outcome in a [`ToolResponse`]. Backend failures never escape as
//! Rust errors; they become `error` envelopes.

use std::sync::Arc;

use wren_client::MemoryBackend;
use wren_core::types::{metadata_object, search_filters, tag_metadata};
use wren_core::{
    AddRequest, GetAllRequest, MemoryKind, Pagination, PatternFilter, SearchRequest, WrenError,
};

use crate::response::ToolResponse;
use crate::tools::*;

const NOTHING_LEFT: &str = "No text remained after applying filters";
const MEMORY_NOT_FOUND: &str = "Memory not found.";

fn failure(action: &str, err: WrenError) -> ToolResponse {
    tracing::error!(
        error = %err,
        code = err.code().as_str(),
        suggestion = err.suggestion(),
        "Error {}",
        action
    );
    ToolResponse::from_error(&err)
}

/// Memory tool operations.
#[derive(Clone)]
pub struct MemoryOperations {
    backend: Arc<dyn MemoryBackend>,
}

impl MemoryOperations {
    pub fn new(backend: Arc<dyn MemoryBackend>) -> Self {
        Self { backend }
    }

    async fn store(&self, request: AddRequest, action: &str) -> Result<serde_json::Value, ToolResponse> {
        self.backend
            .add(request)
            .await
            .map_err(|e| failure(action, e))
    }

    pub async fn add(&self, input: AddMemoryInput) -> ToolResponse {
        tracing::info!(
            user_id = %input.user_id,
            agent_id = ?input.agent_id,
            run_id = ?input.run_id,
            enable_graph = input.enable_graph,
            "Add request"
        );

        let request = AddRequest::new(input.user_id, input.text)
            .with_agent_id(input.agent_id)
            .with_run_id(input.run_id)
            .with_metadata(metadata_object(input.metadata))
            .with_includes(input.includes)
            .with_excludes(input.excludes)
            .with_timestamp(input.timestamp)
            .with_expiration_date(input.expiration_date)
            .with_graph(input.enable_graph);

        match self.store(request, "adding memory").await {
            Ok(details) => ToolResponse::success().with_details(details),
            Err(response) => response,
        }
    }

    pub async fn search(&self, input: SearchMemoryInput) -> ToolResponse {
        tracing::info!(
            user_id = %input.user_id,
            memory_duration = ?input.memory_duration,
            memory_type = ?input.memory_type,
            enable_graph = input.enable_graph,
            "Search request"
        );

        let filters = search_filters(
            input.filters.as_deref(),
            input.memory_duration.as_deref(),
            input.memory_type.as_deref(),
        );
        let request = SearchRequest::new(input.user_id, input.query)
            .with_agent_id(input.agent_id)
            .with_run_id(input.run_id)
            .with_filters(filters)
            .with_threshold(input.threshold)
            .with_graph(input.enable_graph);

        match self.backend.search(request).await {
            Ok(results) => ToolResponse::success().with_results(results),
            Err(e) => failure("searching memories", e),
        }
    }

    pub async fn get_all(&self, input: GetAllMemoriesInput) -> ToolResponse {
        tracing::info!(user_id = %input.user_id, "Get all request");

        let request = GetAllRequest::new(input.user_id)
            .with_agent_id(input.agent_id)
            .with_run_id(input.run_id)
            .with_pagination(Pagination::resolve(input.limit, input.page, input.page_size))
            .with_graph(input.enable_graph);

        match self.backend.get_all(request).await {
            Ok(memories) => ToolResponse::success().with_memories(memories),
            Err(e) => failure("getting memories", e),
        }
    }

    pub async fn get(&self, input: MemoryIdInput) -> ToolResponse {
        match self.backend.get(&input.memory_id).await {
            Ok(Some(memory)) => ToolResponse::success().with_memory(memory),
            Ok(None) => {
                tracing::warn!(memory_id = %input.memory_id, "Memory not found");
                ToolResponse::error(MEMORY_NOT_FOUND)
            }
            Err(e) => failure("getting memory", e),
        }
    }

    pub async fn update(&self, input: UpdateMemoryInput) -> ToolResponse {
        tracing::info!(memory_id = %input.memory_id, "Update request");
        match self.backend.update(&input.memory_id, &input.data).await {
            Ok(details) => ToolResponse::success().with_details(details),
            Err(e) => failure("updating memory", e),
        }
    }

    pub async fn delete(&self, input: MemoryIdInput) -> ToolResponse {
        tracing::info!(memory_id = %input.memory_id, "Delete request");
        match self.backend.delete(&input.memory_id).await {
            Ok(details) => ToolResponse::success().with_details(details),
            Err(e) => failure("deleting memory", e),
        }
    }

    pub async fn add_short_term(&self, input: ShortTermMemoryInput) -> ToolResponse {
        tracing::info!(
            user_id = %input.user_id,
            run_id = %input.run_id,
            memory_type = %input.memory_type,
            "Short-term memory add request"
        );

        let kind = match MemoryKind::parse_short_term(&input.memory_type) {
            Ok(kind) => kind,
            Err(e) => return failure("validating memory type", e),
        };
        if input.run_id.is_empty() {
            return failure(
                "validating run_id",
                WrenError::validation("run_id is required for short-term memories"),
            );
        }

        let metadata = tag_metadata(kind, None, metadata_object(input.metadata));
        let request = AddRequest::new(input.user_id, input.text)
            .with_run_id(Some(input.run_id))
            .with_metadata(Some(metadata))
            .with_graph(input.enable_graph);

        match self.store(request, "adding short-term memory").await {
            Ok(details) => ToolResponse::success()
                .with_details(details)
                .with_memory_type(kind.to_string()),
            Err(response) => response,
        }
    }

    pub async fn add_episodic(&self, input: EpisodicMemoryInput) -> ToolResponse {
        self.add_long_term(
            MemoryKind::Episodic,
            input.user_id,
            input.text,
            input.event_date,
            input.metadata,
            input.enable_graph,
        )
        .await
    }

    pub async fn add_semantic(&self, input: SemanticMemoryInput) -> ToolResponse {
        self.add_long_term(
            MemoryKind::Semantic,
            input.user_id,
            input.text,
            input.category,
            input.metadata,
            input.enable_graph,
        )
        .await
    }

    pub async fn add_procedural(&self, input: ProceduralMemoryInput) -> ToolResponse {
        self.add_long_term(
            MemoryKind::Procedural,
            input.user_id,
            input.text,
            input.skill_area,
            input.metadata,
            input.enable_graph,
        )
        .await
    }

    async fn add_long_term(
        &self,
        kind: MemoryKind,
        user_id: String,
        text: String,
        detail: Option<String>,
        metadata: Option<serde_json::Value>,
        enable_graph: bool,
    ) -> ToolResponse {
        tracing::info!(user_id = %user_id, memory_type = %kind, "Adding long-term memory");

        let metadata = tag_metadata(kind, detail.as_deref(), metadata_object(metadata));
        let request = AddRequest::new(user_id, text)
            .with_metadata(Some(metadata))
            .with_graph(enable_graph);

        match self.store(request, "adding long-term memory").await {
            Ok(details) => ToolResponse::success().with_details(details),
            Err(response) => response,
        }
    }

    pub async fn add_selective(&self, input: SelectiveMemoryInput) -> ToolResponse {
        tracing::info!(
            user_id = %input.user_id,
            run_id = ?input.run_id,
            includes = ?input.includes,
            excludes = ?input.excludes,
            "Selective memory add request"
        );

        let filter = PatternFilter::new(input.includes.as_deref(), input.excludes.as_deref());
        let report = filter.apply(&input.text);
        let warnings: Vec<String> = report.warnings.iter().map(ToString::to_string).collect();

        if report.is_empty() {
            return ToolResponse::warning(NOTHING_LEFT).with_warnings(warnings);
        }

        let original_length = input.text.chars().count();
        let processed_length = report.text.chars().count();

        let request = AddRequest::new(input.user_id, report.into_text())
            .with_run_id(input.run_id)
            .with_metadata(metadata_object(input.metadata))
            .with_graph(input.enable_graph);

        match self.store(request, "adding selective memory").await {
            Ok(details) => ToolResponse::success()
                .with_details(details)
                .with_lengths(original_length, processed_length)
                .with_warnings(warnings),
            Err(response) => response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ToolStatus;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::eq;
    use serde_json::{json, Value};
    use wren_core::WrenResult;

    mock! {
        Backend {}

        #[async_trait]
        impl MemoryBackend for Backend {
            async fn add(&self, request: AddRequest) -> WrenResult<Value>;
            async fn search(&self, request: SearchRequest) -> WrenResult<Value>;
            async fn get_all(&self, request: GetAllRequest) -> WrenResult<Value>;
            async fn get(&self, memory_id: &str) -> WrenResult<Option<Value>>;
            async fn update(&self, memory_id: &str, data: &str) -> WrenResult<Value>;
            async fn delete(&self, memory_id: &str) -> WrenResult<Value>;
        }
    }

    fn operations(backend: MockBackend) -> MemoryOperations {
        MemoryOperations::new(Arc::new(backend))
    }

    fn add_input(text: &str) -> AddMemoryInput {
        AddMemoryInput {
            text: text.to_string(),
            user_id: "alice".to_string(),
            agent_id: None,
            run_id: None,
            metadata: None,
            enable_graph: false,
            includes: None,
            excludes: None,
            timestamp: None,
            expiration_date: None,
        }
    }

    fn selective_input(text: &str, includes: Option<&str>, excludes: Option<&str>) -> SelectiveMemoryInput {
        SelectiveMemoryInput {
            text: text.to_string(),
            user_id: "alice".to_string(),
            includes: includes.map(str::to_string),
            excludes: excludes.map(str::to_string),
            metadata: None,
            run_id: None,
            enable_graph: false,
        }
    }

    #[tokio::test]
    async fn test_add_drops_sentinels_and_marks_version() {
        let mut backend = MockBackend::new();
        backend
            .expect_add()
            .withf(|r| {
                r.version == "v2"
                    && r.agent_id.is_none()
                    && r.timestamp.is_none()
                    && r.metadata.is_none()
                    && r.includes.as_deref() == Some("preferences")
                    && r.output_format == Some("v1.1")
                    && r.text() == "I like green tea"
            })
            .times(1)
            .returning(|_| Ok(json!([{"id": "m1", "event": "ADD"}])));

        let mut input = add_input("I like green tea");
        input.agent_id = Some(String::new());
        input.timestamp = Some(0);
        input.metadata = Some(json!({}));
        input.includes = Some("preferences".to_string());
        input.enable_graph = true;

        let response = operations(backend).add(input).await;
        assert_eq!(response.status, ToolStatus::Success);
        assert_eq!(response.details.unwrap()[0]["id"], "m1");
    }

    #[tokio::test]
    async fn test_add_backend_error_is_error_envelope() {
        let mut backend = MockBackend::new();
        backend
            .expect_add()
            .returning(|_| Err(WrenError::from_http_status(401, "Invalid API key")));

        let response = operations(backend).add(add_input("x")).await;
        assert!(response.is_error());
        assert_eq!(response.message.as_deref(), Some("Invalid API key"));
    }

    #[tokio::test]
    async fn test_search_merges_filters() {
        let mut backend = MockBackend::new();
        backend
            .expect_search()
            .withf(|r| {
                Value::Object(r.filters.clone().unwrap_or_default())
                    == json!({
                        "categories": ["work"],
                        "metadata.memory_duration": "long_term"
                    })
                    && r.threshold.is_none()
            })
            .returning(|_| Ok(json!({"results": []})));

        let input = SearchMemoryInput {
            query: "projects".to_string(),
            user_id: "alice".to_string(),
            agent_id: None,
            run_id: None,
            filters: Some(r#"{"categories": ["work"]}"#.to_string()),
            threshold: Some(0.0),
            enable_graph: false,
            memory_duration: Some("long_term".to_string()),
            memory_type: Some(String::new()),
        };

        let response = operations(backend).search(input).await;
        assert_eq!(response.results, Some(json!({"results": []})));
    }

    #[tokio::test]
    async fn test_search_invalid_filters_json_is_ignored() {
        let mut backend = MockBackend::new();
        backend
            .expect_search()
            .withf(|r| r.filters.is_none())
            .returning(|_| Ok(json!([])));

        let input = SearchMemoryInput {
            query: "q".to_string(),
            user_id: "alice".to_string(),
            agent_id: None,
            run_id: None,
            filters: Some("{not json".to_string()),
            threshold: None,
            enable_graph: false,
            memory_duration: None,
            memory_type: None,
        };

        let response = operations(backend).search(input).await;
        assert_eq!(response.status, ToolStatus::Success);
    }

    #[tokio::test]
    async fn test_get_all_prefers_pagination_over_limit() {
        let mut backend = MockBackend::new();
        backend
            .expect_get_all()
            .withf(|r| {
                r.pagination
                    == Pagination {
                        page: Some(2),
                        page_size: Some(10),
                        limit: None,
                    }
            })
            .returning(|_| Ok(json!([{"id": "m1"}])));

        let input = GetAllMemoriesInput {
            user_id: "alice".to_string(),
            agent_id: None,
            run_id: None,
            limit: Some(50),
            page: Some(2),
            page_size: Some(10),
            enable_graph: false,
        };

        let response = operations(backend).get_all(input).await;
        assert_eq!(response.memories, Some(json!([{"id": "m1"}])));
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let mut backend = MockBackend::new();
        backend
            .expect_get()
            .with(eq("m-404"))
            .returning(|_| Ok(None));

        let response = operations(backend)
            .get(MemoryIdInput {
                memory_id: "m-404".to_string(),
            })
            .await;
        assert!(response.is_error());
        assert_eq!(response.message.as_deref(), Some("Memory not found."));
    }

    #[tokio::test]
    async fn test_get_found() {
        let mut backend = MockBackend::new();
        backend
            .expect_get()
            .returning(|_| Ok(Some(json!({"id": "m1", "memory": "likes tea"}))));

        let response = operations(backend)
            .get(MemoryIdInput {
                memory_id: "m1".to_string(),
            })
            .await;
        assert_eq!(response.memory.unwrap()["memory"], "likes tea");
    }

    #[tokio::test]
    async fn test_update_and_delete_relay_details() {
        let mut backend = MockBackend::new();
        backend
            .expect_update()
            .with(eq("m1"), eq("new text"))
            .returning(|_, _| Ok(json!({"message": "updated"})));
        backend
            .expect_delete()
            .with(eq("m1"))
            .returning(|_| Ok(json!({"message": "deleted"})));
        let ops = operations(backend);

        let updated = ops
            .update(UpdateMemoryInput {
                memory_id: "m1".to_string(),
                data: "new text".to_string(),
            })
            .await;
        assert_eq!(updated.details, Some(json!({"message": "updated"})));

        let deleted = ops
            .delete(MemoryIdInput {
                memory_id: "m1".to_string(),
            })
            .await;
        assert_eq!(deleted.details, Some(json!({"message": "deleted"})));
    }

    #[tokio::test]
    async fn test_short_term_rejects_long_term_kind() {
        let mut backend = MockBackend::new();
        backend.expect_add().never();

        let input = ShortTermMemoryInput {
            text: "t".to_string(),
            user_id: "alice".to_string(),
            run_id: "session-1".to_string(),
            memory_type: "semantic".to_string(),
            metadata: None,
            enable_graph: false,
        };

        let response = operations(backend).add_short_term(input).await;
        assert!(response.is_error());
        assert_eq!(
            response.message.as_deref(),
            Some("Invalid memory type. Must be one of: conversation, working, attention")
        );
    }

    #[tokio::test]
    async fn test_short_term_tags_win_over_caller_metadata() {
        let mut backend = MockBackend::new();
        backend
            .expect_add()
            .withf(|r| {
                let metadata = r.metadata.clone().unwrap_or_default();
                r.run_id.as_deref() == Some("session-1")
                    && metadata["memory_type"] == "working"
                    && metadata["memory_duration"] == "short_term"
                    && metadata["topic"] == "deploy"
            })
            .returning(|_| Ok(json!([])));

        let input = ShortTermMemoryInput {
            text: "current branch is main".to_string(),
            user_id: "alice".to_string(),
            run_id: "session-1".to_string(),
            memory_type: "working".to_string(),
            metadata: Some(json!({"memory_type": "semantic", "topic": "deploy"})),
            enable_graph: false,
        };

        let response = operations(backend).add_short_term(input).await;
        assert_eq!(response.status, ToolStatus::Success);
        assert_eq!(response.memory_type.as_deref(), Some("working"));
    }

    #[tokio::test]
    async fn test_semantic_caller_metadata_wins() {
        let mut backend = MockBackend::new();
        backend
            .expect_add()
            .withf(|r| {
                let metadata = r.metadata.clone().unwrap_or_default();
                metadata["memory_type"] == "semantic"
                    && metadata["memory_duration"] == "long_term"
                    && metadata["category"] == "override"
                    && r.enable_graph
            })
            .returning(|_| Ok(json!([])));

        let input = SemanticMemoryInput {
            text: "Prefers dark mode".to_string(),
            user_id: "alice".to_string(),
            category: Some("preference".to_string()),
            metadata: Some(json!({"category": "override"})),
            enable_graph: true,
        };

        let response = operations(backend).add_semantic(input).await;
        assert_eq!(response.status, ToolStatus::Success);
    }

    #[tokio::test]
    async fn test_episodic_and_procedural_detail_fields() {
        let mut backend = MockBackend::new();
        backend
            .expect_add()
            .withf(|r| {
                r.metadata
                    .as_ref()
                    .is_some_and(|m| m.get("event_date") == Some(&json!("2023-05-15")))
            })
            .times(1)
            .returning(|_| Ok(json!([])));
        backend
            .expect_add()
            .withf(|r| {
                r.metadata
                    .as_ref()
                    .is_some_and(|m| m.get("skill_area") == Some(&json!("coding")))
            })
            .times(1)
            .returning(|_| Ok(json!([])));
        let ops = operations(backend);

        let episodic = ops
            .add_episodic(EpisodicMemoryInput {
                text: "Shipped v1".to_string(),
                user_id: "alice".to_string(),
                event_date: Some("2023-05-15".to_string()),
                metadata: None,
                enable_graph: false,
            })
            .await;
        assert_eq!(episodic.status, ToolStatus::Success);

        let procedural = ops
            .add_procedural(ProceduralMemoryInput {
                text: "Runs tests before pushing".to_string(),
                user_id: "alice".to_string(),
                skill_area: Some("coding".to_string()),
                metadata: None,
                enable_graph: false,
            })
            .await;
        assert_eq!(procedural.status, ToolStatus::Success);
    }

    #[tokio::test]
    async fn test_selective_no_matches_skips_backend() {
        let mut backend = MockBackend::new();
        backend.expect_add().never();

        let response = operations(backend)
            .add_selective(selective_input("hello world", Some(r"\d+"), Some("hello")))
            .await;
        assert_eq!(response.status, ToolStatus::Warning);
        assert_eq!(
            response.message.as_deref(),
            Some("No text remained after applying filters")
        );
    }

    #[tokio::test]
    async fn test_selective_whitespace_result_skips_backend() {
        let mut backend = MockBackend::new();
        backend.expect_add().never();

        let response = operations(backend)
            .add_selective(selective_input("secret  secret", None, Some("secret")))
            .await;
        assert_eq!(response.status, ToolStatus::Warning);
    }

    #[tokio::test]
    async fn test_selective_stores_filtered_text() {
        let mut backend = MockBackend::new();
        backend
            .expect_add()
            .withf(|r| r.text() == "A1\n\nA2" && r.version == "v2")
            .times(1)
            .returning(|_| Ok(json!([{"id": "m1"}])));

        let response = operations(backend)
            .add_selective(selective_input("A1 B1 A2 B2", Some(r"A\d"), None))
            .await;
        assert_eq!(response.status, ToolStatus::Success);
        assert_eq!(response.original_length, Some(11));
        assert_eq!(response.processed_length, Some(6));
        assert!(response.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_selective_lengths_count_characters() {
        let mut backend = MockBackend::new();
        backend
            .expect_add()
            .withf(|r| r.text() == "café ")
            .returning(|_| Ok(json!([])));

        let response = operations(backend)
            .add_selective(selective_input("café olé", None, Some("olé")))
            .await;
        assert_eq!(response.original_length, Some(8));
        assert_eq!(response.processed_length, Some(5));
    }

    #[tokio::test]
    async fn test_selective_invalid_pattern_is_reported() {
        let mut backend = MockBackend::new();
        backend
            .expect_add()
            .withf(|r| r.text() == "keep this")
            .returning(|_| Ok(json!([])));

        let response = operations(backend)
            .add_selective(selective_input("keep this", Some("(unclosed"), None))
            .await;
        assert_eq!(response.status, ToolStatus::Success);
        assert_eq!(response.warnings.len(), 1);
        assert!(response.warnings[0].starts_with("Invalid include pattern '(unclosed'"));
    }
}
