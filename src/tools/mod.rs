//! Tools the agent can call, and the registry that dispatches them.

mod weather;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Config;
use crate::llm::ToolDefinition;

pub use weather::{GetCurrentWeather, WeatherClient, WeatherError, WeatherObservation};

/// A callable exposed to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to invoke the tool.
    fn name(&self) -> &str;

    /// Natural-language description shown to the model.
    fn description(&self) -> &str;

    /// JSON schema of the arguments object.
    fn parameters_schema(&self) -> Value;

    /// Run the tool. The returned text is fed back to the model verbatim.
    async fn execute(&self, args: Value) -> anyhow::Result<String>;
}

/// Name and description of a registered tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Registry of available tools, in registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in weather tool, configured from `config`.
    pub fn with_defaults(config: &Config) -> Self {
        let mut registry = Self::new();
        let client = WeatherClient::new(&config.weather_api_key)
            .with_base_url(&config.weather_base_url);
        registry.register(Arc::new(GetCurrentWeather::new(client)));
        registry
    }

    /// Register a tool. A tool with the same name replaces the earlier one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        match self.by_name.get(&name) {
            Some(&idx) => self.tools[idx] = tool,
            None => {
                self.by_name.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    /// Function-tool schemas in the chat-completions format.
    pub fn get_tool_schemas(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition::function(t.name(), t.description(), t.parameters_schema()))
            .collect()
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, args: Value) -> anyhow::Result<String> {
        let idx = self
            .by_name
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;
        tracing::debug!(tool = name, "Executing tool");
        self.tools[*idx].execute(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo(&'static str);

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            self.0
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {"text": {"type": "string"}}})
        }

        async fn execute(&self, args: Value) -> anyhow::Result<String> {
            Ok(format!("{}:{}", self.0, args["text"].as_str().unwrap_or("")))
        }
    }

    #[tokio::test]
    async fn dispatches_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("v1")));

        let out = registry.execute("echo", json!({"text": "hi"})).await.unwrap();
        assert_eq!(out, "v1:hi");
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let registry = ToolRegistry::new();
        assert!(registry.list_tools().is_empty());
        let err = registry.execute("nope", Value::Null).await.unwrap_err();
        assert!(err.to_string().contains("Unknown tool: nope"));
    }

    #[tokio::test]
    async fn re_registering_replaces_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("v1")));
        registry.register(Arc::new(Echo("v2")));

        assert_eq!(registry.list_tools().len(), 1);
        let out = registry.execute("echo", json!({"text": "x"})).await.unwrap();
        assert_eq!(out, "v2:x");
    }

    #[test]
    fn default_registry_exposes_weather_schema() {
        let config = Config::new("sk".to_string(), "wx".to_string());
        let registry = ToolRegistry::with_defaults(&config);

        let schemas = registry.get_tool_schemas();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].tool_type, "function");
        assert_eq!(schemas[0].function.name, "get_current_weather");
        assert_eq!(schemas[0].function.parameters["required"][0], "location");
    }
}
