//! MCP Protocol Compliance Integration Tests
//!
//! Tests that the MCP server correctly implements JSON-RPC 2.0 and
//! MCP protocol requirements, including ID preservation, error codes,
//! and end-to-end tool execution against a component tree.

use compdoc_core::{DocumentationAssembler, ErrorMode, FileResolver, LayoutConfig};
use compdoc_fs::RepositoryHandle;
use compdoc_mcp::{CompdocMcpServer, ToolContext};
use compdoc_test_utils::tree::ComponentTree;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

fn component_tree() -> ComponentTree {
    let tree = ComponentTree::with_layout();
    tree.source(
        "Button",
        "Button.razor.cs",
        "/// <summary>\n/// Button component\n/// </summary>\npublic partial class Button {}",
    )
    .source("Button", "Button.razor", "<button />")
    .source("Locales", "en.json", "{}")
    .sample("Buttons.razor", "<Button Text=\"Demo\" />")
    .sample("Buttons.razor.cs", "public partial class Buttons {}")
    .doc("Button", "Button.md", "# Button");
    tree
}

fn server_for(tree: &ComponentTree, mode: ErrorMode, expose_get_document: bool) -> CompdocMcpServer {
    let handle = RepositoryHandle::new(tree.root());
    handle.mark_synced("0123456789abcdef0123456789abcdef01234567");
    let assembler = DocumentationAssembler::new(FileResolver::new(handle, LayoutConfig::default()));
    let mut server = CompdocMcpServer::new(ToolContext::new(assembler, mode), expose_get_document);
    server.initialize();
    server
}

async fn call(server: &CompdocMcpServer, request: Value) -> Value {
    let response = server.handle_message(&request.to_string()).await.unwrap();
    serde_json::from_str(&response).unwrap()
}

async fn call_tool(server: &CompdocMcpServer, name: &str, arguments: Value) -> Value {
    call(
        server,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        }),
    )
    .await
}

fn tool_text(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

// ==========================================================================
// JSON-RPC 2.0 ID Preservation
// ==========================================================================

#[rstest]
#[case::numeric(json!(42))]
#[case::string(json!("req-abc-123"))]
#[tokio::test]
async fn id_is_echoed_back(#[case] id: Value) {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, false);

    let response = call(
        &server,
        json!({"jsonrpc": "2.0", "id": id.clone(), "method": "initialize", "params": {}}),
    )
    .await;

    assert_eq!(response["id"], id);
    assert_eq!(response["jsonrpc"], "2.0");
    assert_eq!(response["result"]["serverInfo"]["name"], "compdoc-mcp");
}

#[tokio::test]
async fn id_preserved_in_error_response() {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, false);

    let response = call(
        &server,
        json!({"jsonrpc": "2.0", "id": "err-test", "method": "nonexistent/method"}),
    )
    .await;

    assert_eq!(response["id"], "err-test");
    assert_eq!(response["error"]["code"], -32601);
}

// ==========================================================================
// Error codes
// ==========================================================================

#[tokio::test]
async fn malformed_json_is_parse_error() {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, false);

    let response: Value =
        serde_json::from_str(&server.handle_message(r#"{"invalid json"#).await.unwrap()).unwrap();

    assert_eq!(response["error"]["code"], -32700);
    assert!(response.get("id").is_none());
}

#[tokio::test]
async fn wrong_jsonrpc_version_is_invalid_request() {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, false);

    let response = call(&server, json!({"jsonrpc": "1.0", "id": 3, "method": "ping"})).await;

    assert_eq!(response["error"]["code"], -32600);
    assert_eq!(response["id"], 3);
}

#[tokio::test]
async fn tools_call_without_name_is_invalid_params() {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, false);

    let response = call(
        &server,
        json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": {}}),
    )
    .await;

    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn missing_tool_argument_is_invalid_params() {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, false);

    let response = call_tool(&server, "get_component_files", json!({})).await;

    assert_eq!(response["error"]["code"], -32602);
    assert!(response["error"]["message"].as_str().unwrap().contains("componentName"));
}

#[tokio::test]
async fn unknown_tool_is_tool_error() {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, false);

    let response = call_tool(&server, "delete_component", json!({})).await;

    assert_eq!(response["result"]["isError"], true);
    assert!(response["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("unknown tool"));
}

// ==========================================================================
// Tool execution
// ==========================================================================

#[tokio::test]
async fn list_components_returns_catalog() {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, false);

    let response = call_tool(&server, "list_components", json!({})).await;
    let catalog = tool_text(&response);

    assert!(response["result"].get("isError").is_none());
    assert_eq!(catalog.as_array().unwrap().len(), 1);
    assert_eq!(catalog[0]["name"], "Button");
    assert_eq!(catalog[0]["description"], "Button component");
    assert_eq!(catalog[0]["exampleFiles"].as_array().unwrap().len(), 2);
    assert_eq!(catalog[0]["documentationFiles"][0]["fileName"], "Button.md");
}

#[tokio::test]
async fn get_component_files_uses_camel_case() {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, false);

    let response = call_tool(&server, "get_component_files", json!({"componentName": "Button"})).await;
    let files = tool_text(&response);

    assert_eq!(files["componentName"], "Button");
    assert_eq!(files["sourceFiles"].as_array().unwrap().len(), 2);
    assert_eq!(files["exampleFiles"][1]["fileType"], "cs");
    assert_eq!(
        files["exampleFiles"][0]["path"],
        "src/BootstrapBlazor.Server/Components/Samples/Buttons.razor"
    );
}

#[rstest]
#[case::nested_numeric(json!({"request": {"componentName": "Button", "fileName": "Buttons.razor", "category": 1}}))]
#[case::nested_named(json!({"request": {"componentName": "Button", "fileName": "Buttons.razor", "category": "example"}}))]
#[case::flat(json!({"componentName": "Button", "fileName": "Buttons.razor", "category": "Example"}))]
#[tokio::test]
async fn get_file_content_accepts_request_shapes(#[case] arguments: Value) {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, false);

    let response = call_tool(&server, "get_file_content", arguments).await;
    let content = tool_text(&response);

    assert_eq!(content["content"], "<Button Text=\"Demo\" />");
    assert_eq!(content["fileType"], "razor");
}

#[tokio::test]
async fn unmatched_example_warns_in_strict_mode() {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, false);

    let response = call_tool(
        &server,
        "get_file_content",
        json!({"request": {"componentName": "Button", "fileName": "NotAMatch.razor", "category": 1}}),
    )
    .await;

    let blocks = response["result"]["content"].as_array().unwrap();
    assert_eq!(blocks.len(), 2);
    assert!(blocks[1]["text"].as_str().unwrap().starts_with("Warnings:"));
    assert_eq!(tool_text(&response)["content"], "");
}

#[tokio::test]
async fn unmatched_example_is_plain_empty_content_in_lenient_mode() {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Lenient, false);

    let response = call_tool(
        &server,
        "get_file_content",
        json!({"request": {"componentName": "Button", "fileName": "NotAMatch.razor", "category": 1}}),
    )
    .await;

    assert_eq!(response["result"]["content"].as_array().unwrap().len(), 1);
    assert_eq!(tool_text(&response)["content"], "");
}

#[tokio::test]
async fn traversal_attempt_is_tool_error() {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, false);

    let response = call_tool(
        &server,
        "get_file_content",
        json!({"componentName": "..", "fileName": "secrets.txt", "category": 0}),
    )
    .await;

    assert_eq!(response["result"]["isError"], true);
}

#[tokio::test]
async fn get_document_is_callable_but_hidden() {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, false);

    let list = call(&server, json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})).await;
    let names: Vec<&str> = list["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert!(!names.contains(&"get_document"));

    let response = call_tool(&server, "get_document", json!({"componentName": "Button"})).await;
    let doc = tool_text(&response);
    assert_eq!(doc["sourceFiles"].as_array().unwrap().len(), 2);
    assert_eq!(doc["exampleFiles"][0]["content"], "<Button Text=\"Demo\" />");
}

#[tokio::test]
async fn get_document_is_listed_when_exposed() {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, true);

    let list = call(&server, json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})).await;

    assert!(list["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["name"] == "get_document"));
}

// ==========================================================================
// Resources
// ==========================================================================

#[tokio::test]
async fn sync_status_resource_is_readable() {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, false);

    let list = call(&server, json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"})).await;
    assert_eq!(list["result"]["resources"][0]["uri"], "compdoc://sync-status");

    let read = call(
        &server,
        json!({"jsonrpc": "2.0", "id": 2, "method": "resources/read", "params": {"uri": "compdoc://sync-status"}}),
    )
    .await;
    let text = read["result"]["contents"][0]["text"].as_str().unwrap();
    let status: Value = serde_json::from_str(text).unwrap();
    assert_eq!(status["status"]["state"], "synced");
}

#[tokio::test]
async fn unknown_resource_is_invalid_params() {
    let tree = component_tree();
    let server = server_for(&tree, ErrorMode::Strict, false);

    let read = call(
        &server,
        json!({"jsonrpc": "2.0", "id": 7, "method": "resources/read", "params": {"uri": "repo://config"}}),
    )
    .await;

    assert_eq!(read["error"]["code"], -32602);
}
