//! Memory client implementation for the hosted memory API.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use url::Url;

use wren_core::config::ApiConfig;
use wren_core::error::{WrenError, WrenResult};
use wren_core::types::{AddRequest, GetAllRequest, SearchRequest};

use crate::backend::MemoryBackend;

const ORG_ID_HEADER: &str = "Mem0-Org-Id";
const PROJECT_ID_HEADER: &str = "Mem0-Project-Id";

/// Client for the hosted memory API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct MemoryClient {
    client: Client,
    base_url: Url,
}

impl MemoryClient {
    /// Create a client with the given API key and default settings.
    pub fn new(api_key: &str) -> WrenResult<Self> {
        Self::from_config(&ApiConfig::new(api_key))
    }

    /// Create a client from configuration.
    pub fn from_config(config: &ApiConfig) -> WrenResult<Self> {
        let headers = build_headers(
            config.api_key()?,
            config.org_id.as_deref(),
            config.project_id.as_deref(),
        )?;

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| WrenError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = config.base_url()?;
        if base_url.cannot_be_a_base() {
            return Err(WrenError::Configuration(format!(
                "Base URL '{}' cannot carry a path",
                base_url
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/<segments...>/`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
            path.push("");
        }
        url
    }

    fn memory_endpoint(&self, memory_id: &str) -> WrenResult<Url> {
        if memory_id.trim().is_empty() {
            return Err(WrenError::validation("memory_id must not be empty"));
        }
        Ok(self.endpoint(&["v1", "memories", memory_id]))
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> WrenResult<Response> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                WrenError::timeout(format!("Timed out trying to {}", action))
            } else {
                WrenError::api_with_source(format!("Failed to {}", action), e)
            }
        })
    }

    async fn read_json(response: Response, action: &str) -> WrenResult<Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WrenError::api_with_source(format!("Failed to {}", action), e))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), action, "Memory API returned an error");
            return Err(WrenError::from_http_status(status.as_u16(), &body));
        }

        if body.trim().is_empty() {
            return Ok(json!({}));
        }

        serde_json::from_str(&body)
            .map_err(|e| WrenError::parse(format!("Failed to parse response: {}", e)))
    }
}

fn header_value(name: &str, value: &str) -> WrenResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| WrenError::Configuration(format!("Invalid characters in {} header", name)))
}

fn build_headers(
    api_key: &str,
    org_id: Option<&str>,
    project_id: Option<&str>,
) -> WrenResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth = header_value("Authorization", &format!("Token {}", api_key))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(org_id) = org_id {
        headers.insert(
            HeaderName::from_static("mem0-org-id"),
            header_value(ORG_ID_HEADER, org_id)?,
        );
    }
    if let Some(project_id) = project_id {
        headers.insert(
            HeaderName::from_static("mem0-project-id"),
            header_value(PROJECT_ID_HEADER, project_id)?,
        );
    }

    Ok(headers)
}

#[async_trait]
impl MemoryBackend for MemoryClient {
    async fn add(&self, request: AddRequest) -> WrenResult<Value> {
        tracing::debug!(user_id = %request.user_id, enable_graph = request.enable_graph, "Adding memory");
        let url = self.endpoint(&["v1", "memories"]);
        let response = self
            .send(self.client.post(url).json(&request), "add memory")
            .await?;
        Self::read_json(response, "add memory").await
    }

    async fn search(&self, request: SearchRequest) -> WrenResult<Value> {
        tracing::debug!(user_id = %request.user_id, "Searching memories");
        let url = self.endpoint(&["v1", "memories", "search"]);
        let response = self
            .send(self.client.post(url).json(&request), "search memories")
            .await?;
        Self::read_json(response, "search memories").await
    }

    async fn get_all(&self, request: GetAllRequest) -> WrenResult<Value> {
        tracing::debug!(user_id = %request.user_id, "Listing memories");
        let url = self.endpoint(&["v1", "memories"]);
        let response = self
            .send(self.client.get(url).query(&request), "get memories")
            .await?;
        Self::read_json(response, "get memories").await
    }

    async fn get(&self, memory_id: &str) -> WrenResult<Option<Value>> {
        let url = self.memory_endpoint(memory_id)?;
        let response = self.send(self.client.get(url), "get memory").await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::read_json(response, "get memory").await.map(Some)
    }

    async fn update(&self, memory_id: &str, data: &str) -> WrenResult<Value> {
        let url = self.memory_endpoint(memory_id)?;
        let body = json!({ "text": data });
        let response = self
            .send(self.client.put(url).json(&body), "update memory")
            .await?;
        Self::read_json(response, "update memory").await
    }

    async fn delete(&self, memory_id: &str) -> WrenResult<Value> {
        let url = self.memory_endpoint(memory_id)?;
        let response = self.send(self.client.delete(url), "delete memory").await?;
        Self::read_json(response, "delete memory").await
    }
}
