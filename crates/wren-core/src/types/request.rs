//! Typed request records for the memory backend.
//!
//! Each record replaces a keyword-argument map. Optional inputs arrive from
//! tool callers with "not provided" sentinels (empty string, zero, `0.0`);
//! the `with_*` builders normalise those to `None` so they are never sent.

use serde::Serialize;

use super::message::Message;
use super::metadata::Metadata;

/// API version marker sent with every add request.
pub const API_VERSION: &str = "v2";

/// Output format requested whenever graph processing is enabled.
pub const GRAPH_OUTPUT_FORMAT: &str = "v1.1";

fn is_false(b: &bool) -> bool {
    !*b
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn non_zero<T: Default + PartialEq>(value: Option<T>) -> Option<T> {
    value.filter(|v| *v != T::default())
}

fn graph_format(enable_graph: bool) -> Option<&'static str> {
    enable_graph.then_some(GRAPH_OUTPUT_FORMAT)
}

/// Request body for adding a memory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddRequest {
    pub messages: Vec<Message>,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Backend-side extraction hint, forwarded uninterpreted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub includes: Option<String>,
    /// Backend-side extraction hint, forwarded uninterpreted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excludes: Option<String>,
    /// Custom creation time, Unix seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// ISO 8601 expiration date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub enable_graph: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<&'static str>,
    pub version: &'static str,
}

impl AddRequest {
    /// Create a request storing `text` as a single user message.
    pub fn new(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(text)],
            user_id: user_id.into(),
            agent_id: None,
            run_id: None,
            metadata: None,
            includes: None,
            excludes: None,
            timestamp: None,
            expiration_date: None,
            enable_graph: false,
            output_format: None,
            version: API_VERSION,
        }
    }

    pub fn with_agent_id(mut self, agent_id: Option<String>) -> Self {
        self.agent_id = non_empty(agent_id);
        self
    }

    pub fn with_run_id(mut self, run_id: Option<String>) -> Self {
        self.run_id = non_empty(run_id);
        self
    }

    /// Set metadata. Empty objects are dropped.
    pub fn with_metadata(mut self, metadata: Option<Metadata>) -> Self {
        self.metadata = metadata.filter(|m| !m.is_empty());
        self
    }

    pub fn with_includes(mut self, includes: Option<String>) -> Self {
        self.includes = non_empty(includes);
        self
    }

    pub fn with_excludes(mut self, excludes: Option<String>) -> Self {
        self.excludes = non_empty(excludes);
        self
    }

    /// Set a custom creation time. Zero means "now".
    pub fn with_timestamp(mut self, timestamp: Option<i64>) -> Self {
        self.timestamp = non_zero(timestamp);
        self
    }

    pub fn with_expiration_date(mut self, expiration_date: Option<String>) -> Self {
        self.expiration_date = non_empty(expiration_date);
        self
    }

    /// Enable or disable knowledge-graph processing.
    pub fn with_graph(mut self, enable_graph: bool) -> Self {
        self.enable_graph = enable_graph;
        self.output_format = graph_format(enable_graph);
        self
    }

    /// Text of the first message.
    pub fn text(&self) -> &str {
        self.messages
            .first()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Request body for a memory search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Metadata>,
    /// Minimum similarity score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "is_false")]
    pub enable_graph: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<&'static str>,
}

impl SearchRequest {
    pub fn new(user_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            user_id: user_id.into(),
            agent_id: None,
            run_id: None,
            filters: None,
            threshold: None,
            enable_graph: false,
            output_format: None,
        }
    }

    pub fn with_agent_id(mut self, agent_id: Option<String>) -> Self {
        self.agent_id = non_empty(agent_id);
        self
    }

    pub fn with_run_id(mut self, run_id: Option<String>) -> Self {
        self.run_id = non_empty(run_id);
        self
    }

    /// Set filters. Empty objects are dropped.
    pub fn with_filters(mut self, filters: Option<Metadata>) -> Self {
        self.filters = filters.filter(|f| !f.is_empty());
        self
    }

    /// Set the similarity threshold. `0.0` means no threshold.
    pub fn with_threshold(mut self, threshold: Option<f64>) -> Self {
        self.threshold = non_zero(threshold);
        self
    }

    pub fn with_graph(mut self, enable_graph: bool) -> Self {
        self.enable_graph = enable_graph;
        self.output_format = graph_format(enable_graph);
        self
    }
}

/// Result-set size controls for listing memories.
///
/// Page-based pagination takes precedence over `limit`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Pagination {
    /// Resolve caller inputs. Zero means "not provided".
    ///
    /// If `page` or `page_size` is given, `limit` is dropped with a warning.
    pub fn resolve(limit: Option<u32>, page: Option<u32>, page_size: Option<u32>) -> Self {
        let page = non_zero(page);
        let page_size = non_zero(page_size);
        let limit = non_zero(limit);

        if page.is_some() || page_size.is_some() {
            if limit.is_some() {
                tracing::warn!(
                    "'limit' provided alongside 'page'/'page_size'; pagination arguments will be used"
                );
            }
            return Self {
                page,
                page_size,
                limit: None,
            };
        }

        Self {
            page: None,
            page_size: None,
            limit,
        }
    }
}

/// Query parameters for listing memories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetAllRequest {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(flatten)]
    pub pagination: Pagination,
    #[serde(skip_serializing_if = "is_false")]
    pub enable_graph: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<&'static str>,
}

impl GetAllRequest {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            agent_id: None,
            run_id: None,
            pagination: Pagination::default(),
            enable_graph: false,
            output_format: None,
        }
    }

    pub fn with_agent_id(mut self, agent_id: Option<String>) -> Self {
        self.agent_id = non_empty(agent_id);
        self
    }

    pub fn with_run_id(mut self, run_id: Option<String>) -> Self {
        self.run_id = non_empty(run_id);
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_graph(mut self, enable_graph: bool) -> Self {
        self.enable_graph = enable_graph;
        self.output_format = graph_format(enable_graph);
        self
    }
}
