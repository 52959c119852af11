//! MCP Tool Handlers
//!
//! Dispatches tool calls to the [`DocumentationAssembler`] and turns each
//! [`Outcome`] into a [`ToolResult`] according to the configured
//! [`ErrorMode`].
//!
//! Note: Handler functions use `async fn` for consistency with the MCP server's
//! tokio runtime, even though the resolver performs synchronous I/O.

use compdoc_core::{DocumentationAssembler, ErrorMode, FileContentRequest, Outcome};
use serde::Deserialize;
use serde::Serialize;
use serde_json::{Value, json};

use crate::resource_handlers::sync_status;
use crate::tools::ToolResult;
use crate::{Error, Result};

/// Everything a tool call needs.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub assembler: DocumentationAssembler,
    pub error_mode: ErrorMode,
}

impl ToolContext {
    pub fn new(assembler: DocumentationAssembler, error_mode: ErrorMode) -> Self {
        Self {
            assembler,
            error_mode,
        }
    }
}

/// Handle a tool call by dispatching to the appropriate handler
pub async fn handle_tool_call(ctx: &ToolContext, tool_name: &str, arguments: Value) -> Result<ToolResult> {
    match tool_name {
        // Component lookup
        "list_components" => handle_list_components(ctx).await,
        "get_component_files" => handle_get_component_files(ctx, arguments).await,
        "get_file_content" => handle_get_file_content(ctx, arguments).await,
        "get_document" => handle_get_document(ctx, arguments).await,

        // Service
        "sync_status" => handle_sync_status(ctx).await,
        "echo" => handle_echo(arguments).await,

        _ => Err(Error::UnknownTool(tool_name.to_string())),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComponentArgs {
    component_name: String,
}

#[derive(Debug, Deserialize)]
struct EchoArgs {
    message: String,
}

fn parse_args<T: for<'de> Deserialize<'de>>(arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments).map_err(|e| Error::InvalidArguments {
        message: e.to_string(),
    })
}

/// Render an outcome as a tool result.
///
/// Strict mode reports warnings as an extra text block and failures as tool
/// errors. Lenient mode only logs them and always returns the data.
fn render<T: Serialize>(tool: &str, outcome: Outcome<T>, mode: ErrorMode) -> Result<ToolResult> {
    for warning in outcome.warnings() {
        tracing::warn!(%tool, %warning, "Tool completed with warning");
    }
    if let Some(error) = outcome.error() {
        tracing::error!(%tool, %error, "Tool failed");
    }

    match mode {
        ErrorMode::Lenient => Ok(ToolResult::text(serde_json::to_string_pretty(
            &outcome.into_value(),
        )?)),
        ErrorMode::Strict => match outcome {
            Outcome::Ok(value) => Ok(ToolResult::text(serde_json::to_string_pretty(&value)?)),
            Outcome::Warning { value, warnings } => {
                let notes = warnings
                    .iter()
                    .map(|w| format!("- {w}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(ToolResult::text(serde_json::to_string_pretty(&value)?)
                    .with_text(format!("Warnings:\n{notes}")))
            }
            Outcome::Failed { error, .. } => Ok(ToolResult::error(error.to_string())),
        },
    }
}

async fn handle_list_components(ctx: &ToolContext) -> Result<ToolResult> {
    render(
        "list_components",
        ctx.assembler.list_components(),
        ctx.error_mode,
    )
}

async fn handle_get_component_files(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: ComponentArgs = parse_args(arguments)?;
    render(
        "get_component_files",
        ctx.assembler.get_component_files(&args.component_name),
        ctx.error_mode,
    )
}

/// Accepts `{ "request": { .. } }` as well as the request fields inline.
async fn handle_get_file_content(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let request = match arguments.get("request") {
        Some(request) => request.clone(),
        None => arguments,
    };
    let request: FileContentRequest = parse_args(request)?;
    render(
        "get_file_content",
        ctx.assembler.get_file_content(&request),
        ctx.error_mode,
    )
}

async fn handle_get_document(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: ComponentArgs = parse_args(arguments)?;
    render(
        "get_document",
        ctx.assembler.get_document(&args.component_name),
        ctx.error_mode,
    )
}

async fn handle_sync_status(ctx: &ToolContext) -> Result<ToolResult> {
    let status = sync_status(ctx.assembler.resolver().handle());
    Ok(ToolResult::text(serde_json::to_string_pretty(&status)?))
}

async fn handle_echo(arguments: Value) -> Result<ToolResult> {
    let args: EchoArgs = parse_args(arguments)?;
    Ok(ToolResult::text(format!("hello {}", args.message)))
}
