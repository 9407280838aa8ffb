//! MCP server exposing a hosted memory API as tools.
//!
//! # Tools
//!
//! - `memory_add` - Add a memory
//! - `memory_search` - Search memories, optionally by duration and type
//! - `memory_get_all` - List memories with pagination
//! - `memory_get` - Get a memory by ID
//! - `memory_update` - Replace a memory's text
//! - `memory_delete` - Delete a memory by ID
//! - `memory_add_short_term` - Add a session-scoped memory
//! - `memory_add_episodic` / `memory_add_semantic` / `memory_add_procedural` -
//!   Add a long-term memory of that kind
//! - `memory_add_selective` - Filter text with include/exclude regexes, then add
//!
//! # Configuration
//!
//! The server reads configuration from environment variables. A `.env` file
//! in the working directory is loaded first and overrides variables that are
//! already set:
//!
//! - `MEM0_API_KEY` - API key for the hosted memory API (required)
//! - `MEM0_BASE_URL` - API base URL (default: `https://api.mem0.ai`)
//! - `MEM0_ORG_ID`, `MEM0_PROJECT_ID` - Optional organization/project scope
//! - `WREN_TIMEOUT_SECS` - Request timeout (default: 30)
//! - `WREN_LOG_FILE` - Log file (default: `~/.wren-mcp.log`, empty disables)
//! - `WREN_LOG_LEVEL` - Log level when `RUST_LOG` is unset (default: info)
//! - `WREN_CONFIG` - Optional TOML/JSON/YAML file read before the variables above
//!
//! # Usage
//!
//! Add to your MCP client configuration:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "wren": {
//!       "command": "/path/to/wren-mcp",
//!       "env": { "MEM0_API_KEY": "m0-..." }
//!     }
//!   }
//! }
//! ```

pub mod env;
pub mod logging;
pub mod operations;
pub mod response;
pub mod server;
pub mod tools;

pub use operations::MemoryOperations;
pub use response::{ToolResponse, ToolStatus};
pub use server::MemoryServer;
