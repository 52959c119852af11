//! MCP Tool definitions
//!
//! # Tools
//!
//! ## Component lookup
//! - `list_components` - Catalog of components with descriptions and files
//! - `get_component_files` - Source and example files of one component
//! - `get_file_content` - Text of one source or example file
//! - `get_document` - Source and example text of one component (hidden
//!   from `tools/list` unless `expose_get_document` is set)
//!
//! ## Service
//! - `sync_status` - State of the local mirror
//! - `echo` - Connectivity check

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Result from a tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: None,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }

    /// Append another text block.
    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.content.push(ToolContent::Text {
            text: content.into(),
        });
        self
    }

    /// Whether this result reports a tool error.
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Text of the first content block.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|c| match c {
            ToolContent::Text { text } => text.as_str(),
        })
    }
}

fn component_name_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "componentName": {
                "type": "string",
                "description": "Component name, e.g. \"Button\""
            }
        },
        "required": ["componentName"]
    })
}

/// Tool definitions advertised by `tools/list`.
pub fn get_tool_definitions(expose_get_document: bool) -> Vec<ToolDefinition> {
    let mut tools = vec![
        ToolDefinition {
            name: "list_components".to_string(),
            description: "List all components with their descriptions, source files, example files and documentation files".to_string(),
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: "get_component_files".to_string(),
            description: "List the source and example files of a component".to_string(),
            input_schema: component_name_schema(),
        },
        ToolDefinition {
            name: "get_file_content".to_string(),
            description: "Get the content of a component source file (category 0) or example file (category 1)".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "request": {
                        "type": "object",
                        "properties": {
                            "componentName": { "type": "string" },
                            "fileName": { "type": "string" },
                            "category": {
                                "description": "0 or \"source\" for source files, 1 or \"example\" for example files",
                                "oneOf": [
                                    { "type": "integer", "enum": [0, 1] },
                                    { "type": "string", "enum": ["source", "example"] }
                                ]
                            }
                        },
                        "required": ["componentName", "fileName", "category"]
                    }
                },
                "required": ["request"]
            }),
        },
    ];

    if expose_get_document {
        tools.push(ToolDefinition {
            name: "get_document".to_string(),
            description: "Get the full source and example text of a component".to_string(),
            input_schema: component_name_schema(),
        });
    }

    tools.push(ToolDefinition {
        name: "sync_status".to_string(),
        description: "Report the synchronization state of the local repository mirror".to_string(),
        input_schema: json!({ "type": "object", "properties": {} }),
    });
    tools.push(ToolDefinition {
        name: "echo".to_string(),
        description: "Echo a message back to check connectivity".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "message": { "type": "string" }
            },
            "required": ["message"]
        }),
    });

    tools
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tools: &[ToolDefinition]) -> Vec<&str> {
        tools.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn get_document_is_hidden_by_default() {
        let tools = get_tool_definitions(false);
        assert!(!names(&tools).contains(&"get_document"));
        assert!(names(&tools).contains(&"get_file_content"));
    }

    #[test]
    fn get_document_is_listed_when_exposed() {
        let tools = get_tool_definitions(true);
        assert!(names(&tools).contains(&"get_document"));
    }

    #[test]
    fn schemas_are_objects() {
        for tool in get_tool_definitions(true) {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
        }
    }

    #[test]
    fn error_result_serializes_is_error() {
        let value = serde_json::to_value(ToolResult::error("boom")).unwrap();
        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "boom");
    }

    #[test]
    fn text_result_omits_is_error() {
        let value = serde_json::to_value(ToolResult::text("ok").with_text("more")).unwrap();
        assert!(value.get("isError").is_none());
        assert_eq!(value["content"].as_array().unwrap().len(), 2);
    }
}
