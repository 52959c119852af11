//! Error types for the MCP server

use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during MCP server operations
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the resolver or configuration layer
    #[error("core error: {0}")]
    Core(#[from] compdoc_core::Error),

    /// Error from repository synchronization
    #[error("sync error: {0}")]
    Git(#[from] compdoc_git::Error),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid tool arguments
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Unknown tool requested
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Unknown resource requested
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// Background sync task panicked or was cancelled
    #[error("sync task failed: {message}")]
    SyncTask { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
