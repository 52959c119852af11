//! compdoc MCP Server
//!
//! Serves component source, samples and docs from a local mirror of a
//! component library repository, keeping the mirror current in the
//! background.
//!
//! # Usage
//!
//! ```bash
//! compdoc-mcp [--config <path>] [--remote-url <url>] [--local-path <path>] [--no-sync] [--verbose]
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: `compdoc=info`)
//! - `COMPDOC_REMOTE_URL`, `COMPDOC_LOCAL_PATH`: override the config file
//!
//! # Protocol
//!
//! The server communicates via JSON-RPC 2.0 over stdio:
//! - Requests/responses go through stdout
//! - Logs go to stderr (to avoid interfering with the protocol)

use std::path::PathBuf;

use clap::Parser;
use compdoc_core::{ConfigLoader, DocumentationAssembler, FileResolver, Overrides};
use compdoc_fs::RepositoryHandle;
use compdoc_git::RepositorySynchronizer;
use compdoc_mcp::{CompdocMcpServer, SyncService, ToolContext};

/// MCP server for component documentation lookup
#[derive(Parser)]
#[command(name = "compdoc-mcp")]
#[command(about = "MCP server for component source, samples and docs")]
#[command(version)]
struct Args {
    /// Configuration file layered over the global one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Remote repository to mirror
    #[arg(long)]
    remote_url: Option<String>,

    /// Where the local mirror lives
    #[arg(long)]
    local_path: Option<PathBuf>,

    /// Serve whatever is on disk without synchronizing
    #[arg(long)]
    no_sync: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging to stderr (stdout is reserved for MCP protocol)
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) if !args.verbose => filter,
        _ => tracing_subscriber::EnvFilter::new(if args.verbose {
            "compdoc=debug"
        } else {
            "compdoc=info"
        }),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_file(path);
    }
    let mut config = loader.load()?;
    config.apply_overrides(&Overrides {
        remote_url: args.remote_url,
        local_path: args.local_path,
        no_sync: args.no_sync,
    });
    config.validate()?;

    tracing::info!(
        remote_url = %config.repository.remote_url,
        local_path = %config.repository.local_path.display(),
        "Starting compdoc-mcp server"
    );

    let handle = RepositoryHandle::new(&config.repository.local_path);
    handle.ensure_exists()?;

    if config.sync_enabled() {
        let synchronizer = RepositorySynchronizer::new(handle.clone(), config.sync_options());
        SyncService::new(synchronizer, config.sync.clone()).spawn();
    } else {
        tracing::info!("Synchronization disabled, serving existing copy");
    }

    let resolver = FileResolver::new(handle, config.layout.clone());
    let context = ToolContext::new(DocumentationAssembler::new(resolver), config.service.error_mode);
    let mut server = CompdocMcpServer::new(context, config.service.expose_get_document);
    server.run().await?;

    Ok(())
}
