//! Implements `serve`: run the MCP server over standard input/output.
//!
//! Stdout carries the protocol, so all logging goes to stderr.

use clap::Parser;
use rmcp::{
    service::serve_server,
    transport::{async_rw::AsyncRwTransport, io::stdio},
};

use crate::{command, config::StoreArgs, error::CommandError, mcp::server::PromptMcpServer};

#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn execute(args: ServeArgs) -> Result<(), CommandError> {
    let prompts = command::connect(args.store).await?;
    tracing::info!(bucket = prompts.bucket(), "starting MCP stdio server");
    let mcp_server = PromptMcpServer::new(prompts);

    let (stdin, stdout) = stdio();
    let transport = AsyncRwTransport::new_server(stdin, stdout);

    let running = serve_server(mcp_server, transport)
        .await
        .map_err(|e| CommandError::Server(format!("failed to start: {e}")))?;
    let reason = running
        .waiting()
        .await
        .map_err(|e| CommandError::Server(e.to_string()))?;
    tracing::info!(?reason, "MCP server stopped");
    Ok(())
}
