//! In-memory conversation history, keyed by session id (non-persistent).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::llm::{ChatMessage, Role};

/// One recorded message of a conversation.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
    /// RFC 3339
    pub timestamp: String,
}

impl HistoryEntry {
    fn now(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn to_message(&self) -> ChatMessage {
        ChatMessage {
            role: self.role,
            content: Some(self.content.clone()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub message_count: usize,
}

/// Process-wide map of session id to history. Cloning shares the map.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Vec<HistoryEntry>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// History of a session in order; empty for unknown ids.
    pub async fn history(&self, session_id: &str) -> Vec<HistoryEntry> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Record one completed user/assistant exchange, creating the session
    /// on first use.
    pub async fn append_exchange(&self, session_id: &str, user: &str, assistant: &str) {
        let mut sessions = self.sessions.write().await;
        let history = sessions.entry(session_id.to_string()).or_default();
        history.push(HistoryEntry::now(Role::User, user));
        history.push(HistoryEntry::now(Role::Assistant, assistant));
    }

    /// Drop a session's history. Returns false if the session did not exist.
    pub async fn clear(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    pub async fn list(&self) -> Vec<SessionSummary> {
        let mut sessions: Vec<SessionSummary> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(id, history)| SessionSummary {
                session_id: id.clone(),
                message_count: history.len(),
            })
            .collect();
        sessions.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        sessions
    }
}
