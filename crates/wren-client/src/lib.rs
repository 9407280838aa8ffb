//! wren-client - Client library for the hosted memory API.
//!
//! [`MemoryBackend`] is the seam the tool server talks to; [`MemoryClient`]
//! implements it over HTTP.
//!
//! # Example
//!
//! ```ignore
//! use wren_client::{MemoryBackend, MemoryClient};
//! use wren_core::{AddRequest, SearchRequest};
//!
//! let client = MemoryClient::new("your-api-key")?;
//!
//! // Add a memory
//! let added = client.add(AddRequest::new("user-123", "I love programming in Rust")).await?;
//!
//! // Search memories
//! let found = client.search(SearchRequest::new("user-123", "programming")).await?;
//! ```

mod backend;
mod client;

pub use backend::MemoryBackend;
pub use client::MemoryClient;
