//! Metadata normalisation and merge rules.
//!
//! Precedence differs by duration:
//!
//! - Long-term kinds: `memory_duration` and `memory_type` first, then the
//!   kind's detail field, then caller metadata. Caller keys win.
//! - Short-term kinds: caller metadata first, then `memory_type` and
//!   `memory_duration`. The kind tags win.

use serde_json::Value;

use super::memory_kind::MemoryKind;

/// Metadata object attached to a memory.
pub type Metadata = serde_json::Map<String, Value>;

/// Metadata key for the memory kind.
pub const MEMORY_TYPE_KEY: &str = "memory_type";

/// Metadata key for the memory duration.
pub const MEMORY_DURATION_KEY: &str = "memory_duration";

/// Normalise caller-supplied metadata.
///
/// Objects are kept; empty objects and `null` become `None`. Any other JSON
/// value is discarded with a warning.
pub fn metadata_object(value: Option<Value>) -> Option<Metadata> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) if map.is_empty() => None,
        Some(Value::Object(map)) => Some(map),
        Some(other) => {
            tracing::warn!(metadata = %other, "Metadata is not a JSON object, discarding");
            None
        }
    }
}

/// Build the metadata stored with a memory of the given kind.
///
/// `detail` is written under [`MemoryKind::detail_field`] when both are
/// present and `detail` is non-empty.
pub fn tag_metadata(kind: MemoryKind, detail: Option<&str>, caller: Option<Metadata>) -> Metadata {
    let tags = [
        (MEMORY_DURATION_KEY, Value::from(kind.duration().to_string())),
        (MEMORY_TYPE_KEY, Value::from(kind.to_string())),
    ];

    if kind.is_short_term() {
        let mut merged = caller.unwrap_or_default();
        for (key, value) in tags {
            merged.insert(key.to_string(), value);
        }
        return merged;
    }

    let mut merged = Metadata::new();
    for (key, value) in tags {
        merged.insert(key.to_string(), value);
    }
    if let (Some(field), Some(detail)) = (kind.detail_field(), detail.filter(|d| !d.is_empty())) {
        merged.insert(field.to_string(), Value::from(detail));
    }
    if let Some(caller) = caller {
        merged.extend(caller);
    }
    merged
}

/// Build search filters from a caller JSON string plus kind/duration tags.
///
/// The JSON string is parsed first; invalid JSON or a non-object is discarded
/// with a warning. Non-empty `memory_duration` and `memory_type` are then added
/// as `metadata.memory_duration` / `metadata.memory_type`, replacing any
/// same-named key. Returns `None` when no filter remains.
pub fn search_filters(
    raw: Option<&str>,
    memory_duration: Option<&str>,
    memory_type: Option<&str>,
) -> Option<Metadata> {
    let mut filters = Metadata::new();

    if let Some(raw) = raw.filter(|r| !r.is_empty()) {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(parsed)) => filters.extend(parsed),
            Ok(other) => {
                tracing::warn!(filters = %other, "Parsed filters is not a JSON object, discarding");
            }
            Err(e) => {
                tracing::error!(filters = %raw, error = %e, "Failed to parse filters JSON, proceeding without them");
            }
        }
    }

    let tags = [
        (MEMORY_DURATION_KEY, memory_duration),
        (MEMORY_TYPE_KEY, memory_type),
    ];
    for (key, value) in tags {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            filters.insert(format!("metadata.{}", key), Value::from(value));
        }
    }

    (!filters.is_empty()).then_some(filters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_filters_merge() {
        let filters = search_filters(
            Some(r#"{"categories": ["work"], "metadata.memory_type": "old"}"#),
            Some("short_term"),
            Some("working"),
        )
        .unwrap();
        assert_eq!(
            Value::Object(filters),
            json!({
                "categories": ["work"],
                "metadata.memory_duration": "short_term",
                "metadata.memory_type": "working"
            })
        );
    }

    #[test]
    fn test_search_filters_invalid_json_discarded() {
        assert!(search_filters(Some("{not json"), None, None).is_none());
        assert!(search_filters(Some("[1, 2]"), None, Some("")).is_none());

        let filters = search_filters(Some("{not json"), Some("long_term"), None).unwrap();
        assert_eq!(
            Value::Object(filters),
            json!({"metadata.memory_duration": "long_term"})
        );
    }

    #[test]
    fn test_search_filters_empty() {
        assert!(search_filters(None, None, None).is_none());
        assert!(search_filters(Some(""), Some(""), Some("")).is_none());
        assert!(search_filters(Some("{}"), None, None).is_none());
    }

    fn object(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_metadata_object_normalisation() {
        assert!(metadata_object(None).is_none());
        assert!(metadata_object(Some(Value::Null)).is_none());
        assert!(metadata_object(Some(json!({}))).is_none());
        assert!(metadata_object(Some(json!(["a", "b"]))).is_none());
        assert!(metadata_object(Some(json!("text"))).is_none());
        assert_eq!(
            metadata_object(Some(json!({"project": "x"}))),
            Some(object(json!({"project": "x"})))
        );
    }

    #[test]
    fn test_long_term_caller_wins() {
        let caller = object(json!({"memory_type": "custom", "source": "chat"}));
        let merged = tag_metadata(MemoryKind::Semantic, Some("preference"), Some(caller));
        assert_eq!(
            Value::Object(merged),
            json!({
                "memory_duration": "long_term",
                "memory_type": "custom",
                "category": "preference",
                "source": "chat"
            })
        );
    }

    #[test]
    fn test_long_term_empty_detail_skipped() {
        let merged = tag_metadata(MemoryKind::Episodic, Some(""), None);
        assert_eq!(
            Value::Object(merged),
            json!({"memory_duration": "long_term", "memory_type": "episodic"})
        );
    }

    #[test]
    fn test_short_term_tags_win() {
        let caller = object(json!({"memory_type": "custom", "topic": "deploy"}));
        let merged = tag_metadata(MemoryKind::Working, Some("ignored"), Some(caller));
        assert_eq!(
            Value::Object(merged),
            json!({
                "memory_duration": "short_term",
                "memory_type": "working",
                "topic": "deploy"
            })
        );
    }
}
