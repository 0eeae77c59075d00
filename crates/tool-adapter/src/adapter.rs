//! Bridges MCP servers managed by a [`ConnectionManager`] into a
//! [`ToolRegistry`], naming each discovered tool `mcp_{server}_{tool}` with
//! a `[MCP:{server}] ` description prefix.

use crate::errors::{AdapterError, Result};
use crate::registry::{ToolExecutor, ToolRegistry};
use async_trait::async_trait;
use mcp_client::{CallToolResult, ConnectionManager, McpServerConfig, ToolDescriptor};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

fn host_name(server: &str, tool: &str) -> String {
    format!("mcp_{server}_{tool}")
}

fn host_description(server: &str, description: &str) -> String {
    format!("[MCP:{server}] {description}")
}

struct McpToolExecutor {
    server_name: String,
    tool_name: String,
    input_schema: serde_json::Value,
    manager: Arc<ConnectionManager>,
}

#[async_trait]
impl ToolExecutor for McpToolExecutor {
    async fn execute(&self, arguments: serde_json::Value) -> std::result::Result<serde_json::Value, String> {
        validate_arguments(&self.input_schema, &arguments)?;

        let client = self
            .manager
            .get_client(&self.server_name)
            .await
            .map_err(|e| e.to_string())?;
        let result: CallToolResult = client
            .call_tool(&self.tool_name, arguments)
            .await
            .map_err(|e| e.to_string())?;
        render_result(result)
    }
}

/// Checks `arguments` against an advertised JSON-schema-shaped
/// `input_schema` before forwarding a call to the remote server: every
/// `required` field must be present, and any property present in both the
/// schema and the arguments must have a matching primitive type
/// (`string|number|integer|boolean|array|object`). Schemas or properties
/// that don't declare a recognizable shape are left unchecked.
fn validate_arguments(input_schema: &serde_json::Value, arguments: &serde_json::Value) -> std::result::Result<(), String> {
    let Some(schema) = input_schema.as_object() else {
        return Ok(());
    };
    let args = arguments.as_object();

    if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
        for field in required {
            let Some(field_name) = field.as_str() else { continue };
            let present = args.map(|a| a.contains_key(field_name)).unwrap_or(false);
            if !present {
                return Err(format!("missing required argument '{field_name}'"));
            }
        }
    }

    if let (Some(properties), Some(args)) = (schema.get("properties").and_then(|p| p.as_object()), args) {
        for (name, value) in args {
            let Some(expected_type) = properties.get(name).and_then(|p| p.get("type")).and_then(|t| t.as_str()) else {
                continue;
            };
            if !json_value_matches_type(value, expected_type) {
                return Err(format!(
                    "argument '{name}' has the wrong type: expected {expected_type}, got {}",
                    json_type_name(value)
                ));
            }
        }
    }

    Ok(())
}

fn json_value_matches_type(value: &serde_json::Value, expected_type: &str) -> bool {
    match expected_type {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn render_result(result: CallToolResult) -> std::result::Result<serde_json::Value, String> {
    if result.is_error {
        let text = result
            .content
            .iter()
            .filter_map(|c| c.text.clone())
            .collect::<Vec<_>>()
            .join("\n");
        return Err(if text.is_empty() { "tool call failed".to_string() } else { text });
    }

    match result.content.as_slice() {
        [single] if single.content_type == "text" => {
            Ok(serde_json::Value::String(single.text.clone().unwrap_or_default()))
        }
        _ => Ok(serde_json::json!({ "content": result.content })),
    }
}

pub struct ToolAdapter {
    manager: Arc<ConnectionManager>,
    registry: Arc<dyn ToolRegistry>,
    /// Host-visible tool names contributed by each server, so removal and
    /// refresh can unregister exactly what that server owns.
    owned_tools: RwLock<HashMap<String, Vec<String>>>,
}

impl ToolAdapter {
    pub fn new(manager: Arc<ConnectionManager>, registry: Arc<dyn ToolRegistry>) -> Self {
        Self { manager, registry, owned_tools: RwLock::new(HashMap::new()) }
    }

    /// Connects every configured server and registers its tools. Individual
    /// failures are logged and do not abort the remaining servers.
    pub async fn initialize_servers(&self, configs: Vec<McpServerConfig>) {
        for config in configs {
            let name = config.name.clone();
            if let Err(e) = self.add_server(config).await {
                error!(server = %name, error = %e, "failed to initialize mcp server");
            }
        }
    }

    #[tracing::instrument(skip(self, config), fields(server = %config.name))]
    pub async fn add_server(&self, config: McpServerConfig) -> Result<()> {
        let name = config.name.clone();
        self.manager.add_server(config).await?;
        self.discover_and_register(&name).await
    }

    pub async fn remove_server(&self, name: &str) -> Result<()> {
        if let Some(tools) = self.owned_tools.write().await.remove(name) {
            for tool_name in tools {
                self.registry.unregister(&tool_name).await;
            }
        }
        self.manager.remove_server(name).await?;
        Ok(())
    }

    pub async fn refresh_tools(&self, name: &str) -> Result<()> {
        if let Some(tools) = self.owned_tools.write().await.remove(name) {
            for tool_name in tools {
                self.registry.unregister(&tool_name).await;
            }
        }
        self.discover_and_register(name).await
    }

    async fn discover_and_register(&self, server_name: &str) -> Result<()> {
        let client = self
            .manager
            .get_client(server_name)
            .await
            .map_err(|_| AdapterError::ServerNotFound(server_name.to_string()))?;
        let tools = client.list_tools().await?;

        let mut registered = Vec::with_capacity(tools.len());
        for tool in tools {
            let registered_name = self.register_one(server_name, tool).await;
            registered.push(registered_name);
        }

        info!(server = server_name, count = registered.len(), "registered mcp tools");
        self.owned_tools.write().await.insert(server_name.to_string(), registered);
        Ok(())
    }

    async fn register_one(&self, server_name: &str, tool: ToolDescriptor) -> String {
        let host = host_name(server_name, &tool.name);
        let descriptor = ToolDescriptor {
            name: host.clone(),
            description: host_description(server_name, &tool.description),
            input_schema: tool.input_schema.clone(),
        };
        let executor = Arc::new(McpToolExecutor {
            server_name: server_name.to_string(),
            tool_name: tool.name,
            input_schema: tool.input_schema,
            manager: self.manager.clone(),
        });
        self.registry.register(descriptor, executor).await;
        host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naming_convention() {
        assert_eq!(host_name("github", "create_issue"), "mcp_github_create_issue");
        assert_eq!(host_description("github", "opens an issue"), "[MCP:github] opens an issue");
    }

    #[test]
    fn render_text_result_unwraps_single_item() {
        let result = CallToolResult {
            content: vec![mcp_client::ToolContent {
                content_type: "text".into(),
                text: Some("ok".into()),
                data: None,
                mime_type: None,
            }],
            is_error: false,
        };
        assert_eq!(render_result(result).unwrap(), serde_json::json!("ok"));
    }

    #[test]
    fn render_error_result_joins_text() {
        let result = CallToolResult {
            content: vec![mcp_client::ToolContent {
                content_type: "text".into(),
                text: Some("bad input".into()),
                data: None,
                mime_type: None,
            }],
            is_error: true,
        };
        assert_eq!(render_result(result).unwrap_err(), "bad input");
    }

    #[test]
    fn validate_arguments_rejects_missing_required_field() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {"owner": {"type": "string"}},
            "required": ["owner"],
        });
        let err = validate_arguments(&schema, &serde_json::json!({})).unwrap_err();
        assert!(err.contains("owner"));
    }

    #[test]
    fn validate_arguments_rejects_wrong_primitive_type() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {"count": {"type": "integer"}},
        });
        let err = validate_arguments(&schema, &serde_json::json!({"count": "five"})).unwrap_err();
        assert!(err.contains("count"));
    }

    #[test]
    fn validate_arguments_accepts_matching_schema() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {"owner": {"type": "string"}, "count": {"type": "integer"}},
            "required": ["owner"],
        });
        let args = serde_json::json!({"owner": "octocat", "count": 3});
        assert!(validate_arguments(&schema, &args).is_ok());
    }

    #[test]
    fn validate_arguments_is_a_no_op_for_unstructured_schemas() {
        assert!(validate_arguments(&serde_json::json!(null), &serde_json::json!({"anything": 1})).is_ok());
    }

    #[test]
    fn render_multi_content_result_as_structured_value() {
        let result = CallToolResult {
            content: vec![
                mcp_client::ToolContent { content_type: "text".into(), text: Some("a".into()), data: None, mime_type: None },
                mcp_client::ToolContent { content_type: "text".into(), text: Some("b".into()), data: None, mime_type: None },
            ],
            is_error: false,
        };
        let value = render_result(result).unwrap();
        assert!(value.get("content").is_some());
    }
}
