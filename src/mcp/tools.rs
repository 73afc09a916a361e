use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, tool, tool_router,
};

use crate::{
    mcp::server::PromptMcpServer,
    prompt::{DEFAULT_PREFIX, render},
};

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetPromptParams {
    /// The path to the prompt file (e.g. 'prompts/agent/system.txt')
    pub key: String,
    /// Optional version ID to fetch a specific version
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct ListPromptsParams {
    /// Optional prefix to filter prompts (default: 'prompts/')
    #[serde(default)]
    pub prefix: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ListPromptVersionsParams {
    /// The path to the prompt file
    pub key: String,
}

impl PromptMcpServer {
    pub(crate) fn build_tool_router() -> ToolRouter<Self> {
        Self::tool_router()
    }

    pub async fn get_prompt_impl(&self, params: GetPromptParams) -> String {
        let result = self
            .prompts
            .get_prompt(&params.key, params.version.as_deref())
            .await;
        render::prompt(&params.key, result)
    }

    pub async fn list_prompts_impl(&self, params: ListPromptsParams) -> String {
        let prefix = params.prefix.as_deref().unwrap_or(DEFAULT_PREFIX);
        render::prompt_list(self.prompts.list_prompts(prefix).await)
    }

    pub async fn list_prompt_versions_impl(&self, params: ListPromptVersionsParams) -> String {
        let result = self.prompts.list_prompt_versions(&params.key).await;
        render::version_list(&params.key, result)
    }
}

#[tool_router(vis = "pub(crate)")]
impl PromptMcpServer {
    #[tool(name = "get_prompt", description = "Get a prompt from S3, optionally at a specific version")]
    pub async fn get_prompt_tool(
        &self,
        Parameters(params): Parameters<GetPromptParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text(
            self.get_prompt_impl(params).await,
        )]))
    }

    #[tool(name = "list_prompts", description = "List available prompts in S3")]
    pub async fn list_prompts_tool(
        &self,
        Parameters(params): Parameters<ListPromptsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text(
            self.list_prompts_impl(params).await,
        )]))
    }

    #[tool(name = "list_prompt_versions", description = "List all versions of a specific prompt")]
    pub async fn list_prompt_versions_tool(
        &self,
        Parameters(params): Parameters<ListPromptVersionsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text(
            self.list_prompt_versions_impl(params).await,
        )]))
    }
}
