use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use rmcp::{ServerHandler, handler::server::wrapper::Parameters};

use crate::{
    error::{StoreError, StoreResult},
    mcp::{
        server::PromptMcpServer,
        tools::{GetPromptParams, ListPromptVersionsParams, ListPromptsParams},
    },
    prompt::PromptStore,
    storage::{ObjectVersion, StoredObject, VersionedStore, memory::MemoryStore},
};

const KEY: &str = "prompts/agent/system.txt";

async fn setup_server() -> (PromptMcpServer, Vec<String>) {
    let store = Arc::new(MemoryStore::new("mcp-test"));
    let mut ids = Vec::new();
    for body in ["first system prompt", "second system prompt"] {
        let id = store
            .put(KEY, Bytes::from(body), "text/plain")
            .await
            .unwrap()
            .unwrap();
        ids.push(id);
    }
    store
        .put("prompts/agent/instructions.txt", Bytes::from("be brief"), "text/plain")
        .await
        .unwrap();
    (PromptMcpServer::new(PromptStore::new(store)), ids)
}

/// Store whose every call fails like an unreachable backend.
struct UnreachableStore;

#[async_trait]
impl VersionedStore for UnreachableStore {
    fn bucket(&self) -> &str {
        "unreachable"
    }
    async fn fetch(&self, _: &str, _: Option<&str>) -> StoreResult<StoredObject> {
        Err(StoreError::Backend("connection refused".into()))
    }
    async fn list_keys(&self, _: &str) -> StoreResult<Vec<String>> {
        Err(StoreError::Backend("connection refused".into()))
    }
    async fn list_versions_with_prefix(&self, _: &str) -> StoreResult<Vec<ObjectVersion>> {
        Err(StoreError::Backend("connection refused".into()))
    }
    async fn copy_version(&self, _: &str, _: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Backend("connection refused".into()))
    }
    async fn put(&self, _: &str, _: Bytes, _: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Backend("connection refused".into()))
    }
}

fn text_of(result: &rmcp::model::CallToolResult) -> String {
    let val = serde_json::to_value(&result.content[0]).unwrap();
    val.get("text")
        .expect("text field")
        .as_str()
        .expect("string")
        .to_string()
}

#[tokio::test]
async fn test_server_info() {
    let (server, _) = setup_server().await;
    let info = ServerHandler::get_info(&server);
    assert_eq!(info.server_info.name, "S3 Prompts Server");
    assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
    assert!(info.capabilities.tools.is_some());
    assert!(info.instructions.unwrap().contains("mcp-test"));
}

#[tokio::test]
async fn test_get_prompt_latest_and_versioned() {
    let (server, ids) = setup_server().await;
    let latest = server
        .get_prompt_impl(GetPromptParams {
            key: KEY.to_string(),
            version: None,
        })
        .await;
    assert_eq!(latest, "second system prompt");

    let first = server
        .get_prompt_impl(GetPromptParams {
            key: KEY.to_string(),
            version: Some(ids[0].clone()),
        })
        .await;
    assert_eq!(first, "first system prompt");
}

#[tokio::test]
async fn test_get_prompt_not_found_message() {
    let (server, _) = setup_server().await;
    let out = server
        .get_prompt_impl(GetPromptParams {
            key: "prompts/nope.txt".to_string(),
            version: None,
        })
        .await;
    assert_eq!(out, "Error: Prompt 'prompts/nope.txt' not found.");
}

#[tokio::test]
async fn test_list_prompts_default_prefix() {
    let (server, _) = setup_server().await;
    let out = server.list_prompts_impl(ListPromptsParams::default()).await;
    assert_eq!(
        out,
        "prompts/agent/instructions.txt\nprompts/agent/system.txt"
    );

    let none = server
        .list_prompts_impl(ListPromptsParams {
            prefix: Some("missing/".to_string()),
        })
        .await;
    assert_eq!(none, "No prompts found.");
}

#[tokio::test]
async fn test_list_prompt_versions_marks_single_latest() {
    let (server, ids) = setup_server().await;
    let out = server
        .list_prompt_versions_impl(ListPromptVersionsParams {
            key: KEY.to_string(),
        })
        .await;
    let mut lines = out.lines();
    assert_eq!(lines.next(), Some("Versions for prompts/agent/system.txt:"));
    let entries: Vec<&str> = lines.collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries.iter().filter(|l| l.ends_with(" (Latest)")).count(), 1);
    let latest = entries.iter().find(|l| l.ends_with(" (Latest)")).unwrap();
    assert!(latest.starts_with(&format!("- {} | ", ids[1])));
}

#[tokio::test]
async fn test_list_prompt_versions_missing_key() {
    let (server, _) = setup_server().await;
    let out = server
        .list_prompt_versions_impl(ListPromptVersionsParams {
            key: "missing/key.txt".to_string(),
        })
        .await;
    assert_eq!(out, "No versions found for 'missing/key.txt'.");
}

#[tokio::test]
async fn test_tools_return_text_on_backend_failure() {
    let server = PromptMcpServer::new(PromptStore::new(Arc::new(UnreachableStore)));

    let result = server
        .get_prompt_tool(Parameters(GetPromptParams {
            key: KEY.to_string(),
            version: None,
        }))
        .await
        .unwrap();
    assert!(text_of(&result).starts_with("Error: failed to fetch prompt"));

    let result = server
        .list_prompts_tool(Parameters(ListPromptsParams::default()))
        .await
        .unwrap();
    assert!(text_of(&result).contains("connection refused"));

    let result = server
        .list_prompt_versions_tool(Parameters(ListPromptVersionsParams {
            key: KEY.to_string(),
        }))
        .await
        .unwrap();
    assert!(text_of(&result).starts_with("Error: failed to list versions"));
}

#[tokio::test]
async fn test_rollback_visible_through_tools() {
    let (server, ids) = setup_server().await;
    server.prompts.rollback(KEY, &ids[0]).await.unwrap();

    let result = server
        .get_prompt_tool(Parameters(GetPromptParams {
            key: KEY.to_string(),
            version: None,
        }))
        .await
        .unwrap();
    assert_eq!(text_of(&result), "first system prompt");

    let versions = server
        .list_prompt_versions_impl(ListPromptVersionsParams {
            key: KEY.to_string(),
        })
        .await;
    assert_eq!(versions.lines().count(), 4);
}
