//! Core agent loop implementation.

use std::sync::Arc;

use chrono::Utc;

use crate::api::types::{LogEntryType, TurnLogEntry};
use crate::config::Config;
use crate::llm::{ChatMessage, LlmClient, OpenAiClient, Role, ToolCall};
use crate::session::SessionStore;
use crate::tools::ToolRegistry;

use super::prompt::build_system_prompt;

/// Outcome of one user message.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// The model's final answer
    pub reply: String,

    /// Tool calls, tool results and the response, in order
    pub log: Vec<TurnLogEntry>,
}

/// The conversational agent.
pub struct Agent {
    config: Config,
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    sessions: SessionStore,
    system_prompt: String,
}

impl Agent {
    /// Create a new agent with the given configuration.
    pub fn new(config: Config) -> Self {
        let llm = Arc::new(
            OpenAiClient::new(config.llm_api_key.clone()).with_base_url(&config.llm_base_url),
        );
        let tools = ToolRegistry::with_defaults(&config);

        Self::with_parts(config, llm, tools, SessionStore::new())
    }

    /// Create an agent from explicit components.
    pub fn with_parts(
        config: Config,
        llm: Arc<dyn LlmClient>,
        tools: ToolRegistry,
        sessions: SessionStore,
    ) -> Self {
        let system_prompt = build_system_prompt(&tools);
        Self {
            config,
            llm,
            tools,
            sessions,
            system_prompt,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Answer one user message within a session.
    ///
    /// On success the user message and the reply are appended to the
    /// session's history. History is left untouched on failure.
    pub async fn chat(&self, session_id: &str, input: &str) -> anyhow::Result<ChatTurn> {
        let mut log = Vec::new();

        // Build initial messages
        let history = self.sessions.history(session_id).await;
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(self.system_prompt.clone()));
        messages.extend(history.iter().map(|entry| entry.to_message()));
        messages.push(ChatMessage::user(input));

        let tool_schemas = self.tools.get_tool_schemas();

        for iteration in 0..self.config.max_iterations {
            tracing::debug!(session = session_id, "Agent iteration {}", iteration + 1);

            let response = self
                .llm
                .chat_completion(
                    &self.config.model,
                    self.config.temperature,
                    &messages,
                    Some(tool_schemas.as_slice()),
                )
                .await?;

            if let Some(tool_calls) = &response.tool_calls {
                if !tool_calls.is_empty() {
                    messages.push(ChatMessage {
                        role: Role::Assistant,
                        content: response.content.clone(),
                        tool_calls: Some(tool_calls.clone()),
                        tool_call_id: None,
                    });

                    for tool_call in tool_calls {
                        log.push(log_entry(
                            LogEntryType::ToolCall,
                            format!(
                                "Calling tool: {} with args: {}",
                                tool_call.function.name, tool_call.function.arguments
                            ),
                        ));

                        let result_str = match self.execute_tool_call(tool_call).await {
                            Ok(output) => output,
                            Err(e) => format!("Error: {}", e),
                        };

                        log.push(log_entry(
                            LogEntryType::ToolResult,
                            truncate_for_log(&result_str, 1000),
                        ));

                        messages.push(ChatMessage::tool(tool_call.id.clone(), result_str));
                    }

                    continue;
                }
            }

            // No tool calls - this is the final response
            if let Some(content) = response.content.filter(|c| !c.trim().is_empty()) {
                log.push(log_entry(
                    LogEntryType::Response,
                    truncate_for_log(&content, 2000),
                ));
                self.sessions
                    .append_exchange(session_id, input, &content)
                    .await;
                return Ok(ChatTurn {
                    reply: content,
                    log,
                });
            }

            return Err(anyhow::anyhow!("LLM returned empty response"));
        }

        Err(anyhow::anyhow!(
            "Max iterations ({}) reached without completion",
            self.config.max_iterations
        ))
    }

    /// Execute a single tool call.
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> anyhow::Result<String> {
        let args: serde_json::Value = serde_json::from_str(&tool_call.function.arguments)
            .unwrap_or(serde_json::Value::Null);

        self.tools.execute(&tool_call.function.name, args).await
    }
}

fn log_entry(entry_type: LogEntryType, content: String) -> TurnLogEntry {
    TurnLogEntry {
        timestamp: Utc::now().to_rfc3339(),
        entry_type,
        content,
    }
}

/// Truncate a string for logging purposes, on a char boundary.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &s[..end])
}
