//! Chat and session endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::error::ApiError;
use super::routes::AppState;
use super::types::{ChatRequest, ChatResponse, HistoryResponse, SessionsResponse};

/// POST /api/chat
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message must not be empty".to_string()));
    }

    let session_id = req
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    tracing::info!(session = %session_id, "Chat message received");

    let turn = state.agent.chat(&session_id, &req.message).await?;

    Ok(Json(ChatResponse {
        session_id,
        reply: turn.reply,
        log: turn.log,
    }))
}

/// GET /api/sessions
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<SessionsResponse> {
    Json(SessionsResponse {
        sessions: state.agent.sessions().list().await,
    })
}

/// GET /api/sessions/:id/history
pub async fn session_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<HistoryResponse> {
    let messages = state.agent.sessions().history(&id).await;
    Json(HistoryResponse {
        session_id: id,
        messages,
    })
}

/// DELETE /api/sessions/:id
pub async fn clear_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.agent.sessions().clear(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Session {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use crate::agent::Agent;
    use crate::api::router;
    use crate::config::Config;
    use crate::llm::{ChatMessage, ChatResponse, LlmClient, LlmError, ToolDefinition};
    use crate::session::SessionStore;
    use crate::tools::ToolRegistry;

    /// Answers each request with the next canned text, echoing how many
    /// messages it was given once the script runs out.
    struct CannedLlm {
        replies: Mutex<VecDeque<Result<String, u16>>>,
    }

    #[async_trait]
    impl LlmClient for CannedLlm {
        async fn chat_completion(
            &self,
            _model: &str,
            _temperature: f32,
            messages: &[ChatMessage],
            _tools: Option<&[ToolDefinition]>,
        ) -> Result<ChatResponse, LlmError> {
            let next = self.replies.lock().unwrap().pop_front();
            match next {
                Some(Ok(text)) => Ok(ChatResponse {
                    content: Some(text),
                    ..Default::default()
                }),
                Some(Err(status)) => Err(LlmError::Api {
                    status,
                    body: "upstream down".to_string(),
                }),
                None => Ok(ChatResponse {
                    content: Some(format!("saw {} messages", messages.len())),
                    ..Default::default()
                }),
            }
        }
    }

    async fn spawn_app(replies: Vec<Result<String, u16>>) -> String {
        let llm = Arc::new(CannedLlm {
            replies: Mutex::new(replies.into()),
        });
        let config = Config::new("sk".to_string(), "wx".to_string());
        let agent = Agent::with_parts(config, llm, ToolRegistry::new(), SessionStore::new());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(agent)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn chat_round_trip_records_history() {
        let base = spawn_app(vec![Ok("Hello!".to_string())]).await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{}/api/chat", base))
            .json(&json!({"message": "hi", "session_id": "demo"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["session_id"], "demo");
        assert_eq!(body["reply"], "Hello!");
        assert_eq!(body["log"][0]["entry_type"], "response");

        let history: Value = client
            .get(format!("{}/api/sessions/demo/history", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(history["messages"][0]["role"], "user");
        assert_eq!(history["messages"][0]["content"], "hi");
        assert_eq!(history["messages"][1]["role"], "assistant");
        assert_eq!(history["messages"][1]["content"], "Hello!");
    }

    #[tokio::test]
    async fn second_message_in_session_carries_history() {
        let base = spawn_app(vec![Ok("first".to_string())]).await;
        let client = reqwest::Client::new();

        for _ in 0..2 {
            client
                .post(format!("{}/api/chat", base))
                .json(&json!({"message": "ping", "session_id": "s"}))
                .send()
                .await
                .unwrap();
        }
        let other: Value = client
            .post(format!("{}/api/chat", base))
            .json(&json!({"message": "ping", "session_id": "t"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        // system + user only: "t" sees nothing from "s"
        assert_eq!(other["reply"], "saw 2 messages");

        let sessions: Value = client
            .get(format!("{}/api/sessions", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(
            sessions["sessions"],
            json!([
                {"session_id": "s", "message_count": 4},
                {"session_id": "t", "message_count": 2}
            ])
        );
    }

    #[tokio::test]
    async fn session_ids_are_not_normalized() {
        let base = spawn_app(vec![Ok("first".to_string())]).await;
        let client = reqwest::Client::new();

        client
            .post(format!("{}/api/chat", base))
            .json(&json!({"message": "hi", "session_id": "a"}))
            .send()
            .await
            .unwrap();
        let body: Value = client
            .post(format!("{}/api/chat", base))
            .json(&json!({"message": "hi", "session_id": " a"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["session_id"], " a");
        assert_eq!(body["reply"], "saw 2 messages");
    }

    #[tokio::test]
    async fn message_is_recorded_as_typed() {
        let base = spawn_app(vec![Ok("ok".to_string())]).await;
        let client = reqwest::Client::new();

        client
            .post(format!("{}/api/chat", base))
            .json(&json!({"message": "  weather in Oslo?\n", "session_id": "raw"}))
            .send()
            .await
            .unwrap();
        let history: Value = client
            .get(format!("{}/api/sessions/raw/history", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(history["messages"][0]["content"], "  weather in Oslo?\n");
    }

    #[tokio::test]
    async fn missing_session_id_gets_generated() {
        let base = spawn_app(vec![]).await;
        let body: Value = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .json(&json!({"message": "hi", "session_id": "  "}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let id = body["session_id"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let base = spawn_app(vec![]).await;
        let resp = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .json(&json!({"message": "   "}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["code"], "invalid_request_error");
    }

    #[tokio::test]
    async fn llm_failure_maps_to_bad_gateway() {
        let base = spawn_app(vec![Err(500)]).await;
        let resp = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .json(&json!({"message": "hi", "session_id": "x"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 502);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("upstream down"));
    }

    #[tokio::test]
    async fn clearing_unknown_session_is_not_found() {
        let base = spawn_app(vec![]).await;
        let client = reqwest::Client::new();

        let resp = client
            .delete(format!("{}/api/sessions/ghost", base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);

        client
            .post(format!("{}/api/chat", base))
            .json(&json!({"message": "hi", "session_id": "real"}))
            .send()
            .await
            .unwrap();
        let resp = client
            .delete(format!("{}/api/sessions/real", base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 204);
    }

    #[tokio::test]
    async fn index_and_health_are_served() {
        let base = spawn_app(vec![]).await;
        let client = reqwest::Client::new();

        let page = client.get(&base).send().await.unwrap();
        assert_eq!(page.status(), 200);
        let html = page.text().await.unwrap();
        assert!(html.contains("id=\"session-id\""));

        let health: Value = client
            .get(format!("{}/api/health", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["model"], crate::config::DEFAULT_MODEL);
    }
}
