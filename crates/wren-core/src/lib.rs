//! wren-core - Core library for wren.
//!
//! This crate provides the selective pattern filter, typed request records for
//! the hosted memory API, the error hierarchy, and configuration loading.
//!
//! # Example
//!
//! ```
//! use wren_core::{apply_patterns, AddRequest};
//!
//! let report = apply_patterns("keep1 junk keep2", Some(r"keep\d"), None);
//! assert_eq!(report.text, "keep1\n\nkeep2");
//!
//! let request = AddRequest::new("user-123", report.into_text()).with_graph(true);
//! assert_eq!(request.version, "v2");
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, ServerConfig, WrenConfig};
pub use error::{ErrorCode, WrenError, WrenResult};
pub use filter::{
    apply_patterns, FilterOutcome, FilterReport, FilterWarning, PatternFilter, PatternKind,
};
pub use types::{
    AddRequest, GetAllRequest, MemoryDuration, MemoryKind, Message, MessageRole, Metadata,
    Pagination, SearchRequest,
};
