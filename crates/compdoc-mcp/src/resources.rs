//! MCP Resource definitions
//!
//! | URI | Description | Content-Type |
//! |-----|-------------|--------------|
//! | `compdoc://sync-status` | Local mirror path and synchronization state | application/json |

use serde::{Deserialize, Serialize};

pub const SYNC_STATUS_URI: &str = "compdoc://sync-status";

/// Resource definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDefinition {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

/// Content returned for a resource read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceContent {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

/// Get all available resource definitions
pub fn get_resource_definitions() -> Vec<ResourceDefinition> {
    vec![ResourceDefinition {
        uri: SYNC_STATUS_URI.to_string(),
        name: "Sync status".to_string(),
        description: "Local mirror path and the state of its last synchronization".to_string(),
        mime_type: "application/json".to_string(),
    }]
}
