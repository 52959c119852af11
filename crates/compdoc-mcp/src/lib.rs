//! MCP server for compdoc
//!
//! Exposes the component catalog, per-component file listings, and file
//! content of a mirrored repository over the Model Context Protocol, and
//! keeps the mirror current in the background.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client (agent/IDE) ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ compdoc-mcp (server + sync service) ]
//!        |                      |
//!        v                      v
//! [ compdoc-core ]        [ compdoc-git ]
//!   FileResolver            RepositorySynchronizer
//!        \                      /
//!         [ RepositoryHandle (local mirror) ]
//! ```
//!
//! # Tools
//!
//! - `list_components`, `get_component_files`, `get_file_content`,
//!   `get_document` (hidden unless configured)
//! - `sync_status`, `echo`
//!
//! # Resources
//!
//! - `compdoc://sync-status` - synchronization state of the mirror

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod resource_handlers;
pub mod resources;
pub mod server;
pub mod sync;
pub mod tools;

pub use error::{Error, Result};
pub use handlers::ToolContext;
pub use server::CompdocMcpServer;
pub use sync::SyncService;
pub use tools::{ToolContent, ToolDefinition, ToolResult, get_tool_definitions};
