//! The [`Tool`] interface and the dispatch registry the orchestrator binds
//! to the language model.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ToolError;

/// Per-invocation context threaded through every tool call.
///
/// Carries the conversation's session identifier so session-scoped state
/// (the video workflow) is never shared across conversations.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext {
    pub session_id: Uuid,
}

impl ToolContext {
    pub fn new(session_id: Uuid) -> Self {
        Self { session_id }
    }
}

/// A named, model-invocable operation with a text-only result contract.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable identifier the model uses to request this tool.
    fn name(&self) -> &'static str;

    /// Description shown to the model for tool selection.
    fn description(&self) -> &'static str;

    /// JSON schema of the `arguments` object.
    fn schema(&self) -> Value;

    /// Execute the tool. Expected outcomes (not-found, validation problems)
    /// are `Ok` text; only genuine failures are errors.
    async fn invoke(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError>;
}

/// Ordered collection of tools with name-based dispatch.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Registration order is preserved in `schemas()`.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        tracing::debug!(tool = tool.name(), "Tool registered");
        self.tools.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool schemas in registration order, in the shape the language-model
    /// collaborator binds: `{name, description, parameters}`.
    pub fn schemas(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|t| {
                json!({
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.schema(),
                })
            })
            .collect()
    }

    /// Execute a named tool. An unknown name is an argument error, which the
    /// orchestrator feeds back to the model as text.
    pub async fn dispatch(
        &self,
        name: &str,
        ctx: &ToolContext,
        args: Value,
    ) -> Result<String, ToolError> {
        let Some(tool) = self.get(name) else {
            return Err(ToolError::InvalidArguments(format!("Unknown tool: {}", name)));
        };
        tool.invoke(ctx, args).await
    }
}

/// Parse a tool's `arguments` object into a typed struct, mapping serde
/// failures to [`ToolError::InvalidArguments`].
pub(crate) fn parse_args<T: serde::de::DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echo the given text back."
        }

        fn schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"],
            })
        }

        async fn invoke(&self, _ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
            #[derive(serde::Deserialize)]
            struct Args {
                text: String,
            }
            let args: Args = parse_args(args)?;
            Ok(args.text)
        }
    }

    fn ctx() -> ToolContext {
        ToolContext::new(Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_register_and_dispatch() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let result = registry
            .dispatch("echo", &ctx(), json!({"text": "hello"}))
            .await
            .unwrap();
        assert_eq!(result, "hello");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_argument_error() {
        let registry = ToolRegistry::new();
        let result = registry.dispatch("missing", &ctx(), json!({})).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_malformed_arguments() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let result = registry.dispatch("echo", &ctx(), json!({"wrong": 1})).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn test_schemas_shape_and_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let schemas = registry.schemas();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0]["name"], "echo");
        assert_eq!(schemas[0]["description"], "Echo the given text back.");
        assert!(schemas[0]["parameters"]["properties"]["text"].is_object());
    }

    #[test]
    fn test_names_and_len() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());
        registry.register(Arc::new(EchoTool));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names(), vec!["echo"]);
    }
}
