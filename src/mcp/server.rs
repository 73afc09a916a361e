//! MCP `ServerHandler` implementation and tool routing.
//!
//! Tool implementations live in `crate::mcp::tools` and are registered via
//! `rmcp`'s `#[tool_router]`.
use rmcp::{ServerHandler, handler::server::router::tool::ToolRouter, model::*, tool_handler};

use crate::prompt::PromptStore;

pub const SERVER_TITLE: &str = "S3 Prompts Server";

#[derive(Clone)]
pub struct PromptMcpServer {
    pub prompts: PromptStore,
    tool_router: ToolRouter<PromptMcpServer>,
}

impl PromptMcpServer {
    pub fn new(prompts: PromptStore) -> Self {
        Self {
            prompts,
            tool_router: Self::build_tool_router(),
        }
    }
}

#[tool_handler]
impl ServerHandler for PromptMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::new(
                SERVER_TITLE.to_string(),
                env!("CARGO_PKG_VERSION").to_string(),
            ))
            .with_instructions(format!(
                "Versioned prompts from bucket '{}'. \
                 Use list_prompts to discover keys, get_prompt to read one, \
                 and list_prompt_versions to see its history.",
                self.prompts.bucket()
            ))
    }
}
