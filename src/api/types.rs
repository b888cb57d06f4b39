//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::session::{HistoryEntry, SessionSummary};

/// Request to send a chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// The user's message
    pub message: String,

    /// Conversation id; a new one is generated when absent or blank
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response to a chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    /// Conversation id the exchange was recorded under
    pub session_id: String,

    /// The assistant's answer
    pub reply: String,

    /// What the agent did to produce the answer
    pub log: Vec<TurnLogEntry>,
}

/// A single entry in a turn's execution log.
#[derive(Debug, Clone, Serialize)]
pub struct TurnLogEntry {
    /// Timestamp (RFC 3339)
    pub timestamp: String,

    /// Entry type
    pub entry_type: LogEntryType,

    /// Content of the entry
    pub content: String,
}

/// Types of log entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogEntryType {
    /// Tool is being called
    ToolCall,
    /// Tool returned a result
    ToolResult,
    /// Agent produced final response
    Response,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub messages: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Model the agent talks to
    pub model: String,
}
