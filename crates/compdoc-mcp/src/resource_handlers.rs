//! MCP Resource Handlers
//!
//! Read-only views of service state.

use compdoc_fs::RepositoryHandle;
use serde_json::{Value, json};

use crate::resources::{ResourceContent, SYNC_STATUS_URI};
use crate::{Error, Result};

/// Read a resource by URI
///
/// # Errors
///
/// Returns `Error::UnknownResource` if the URI is not recognized.
pub async fn read_resource(handle: &RepositoryHandle, uri: &str) -> Result<ResourceContent> {
    match uri {
        SYNC_STATUS_URI => read_sync_status(handle).await,
        _ => Err(Error::UnknownResource(uri.to_string())),
    }
}

/// Local path plus current [`SyncState`](compdoc_fs::SyncState).
pub fn sync_status(handle: &RepositoryHandle) -> Value {
    json!({
        "localPath": handle.root().display().to_string(),
        "status": handle.sync_state(),
    })
}

async fn read_sync_status(handle: &RepositoryHandle) -> Result<ResourceContent> {
    Ok(ResourceContent {
        uri: SYNC_STATUS_URI.to_string(),
        mime_type: "application/json".to_string(),
        text: serde_json::to_string_pretty(&sync_status(handle))?,
    })
}
