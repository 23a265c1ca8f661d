//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! JSON body rejections become `ApiError::Validation`, so every error is `{error}`.

use std::sync::Arc;

use axum::{
  extract::{rejection::JsonRejection, State},
  Json,
};
use tracing::{info, instrument};

use crate::agent::AgentProbe;
use crate::domain::{ContentBundle, QuizBundle};
use crate::error::ApiError;
use crate::logic::{chat_reply, learn, quiz_for};
use crate::protocol::*;
use crate::state::AppState;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
  payload
    .map(|Json(b)| b)
    .map_err(|e| ApiError::Validation(format!("Invalid JSON body: {}", e.body_text())))
}

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> Json<HealthOut> {
  Json(HealthOut {
    status: "healthy",
    bridge_port: state.settings.port,
    agent_url: state.settings.agent_url.clone(),
    timestamp: chrono::Utc::now().timestamp(),
  })
}

#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_learn(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<LearnIn>, JsonRejection>,
) -> Result<Json<DataOut<ContentBundle>>, ApiError> {
  let data = learn(&state, body(payload)?).await?;
  info!(target: "learn", key_points = data.key_points.len(), "HTTP learn served");
  Ok(Json(DataOut { success: true, data }))
}

#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_quiz(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<QuizIn>, JsonRejection>,
) -> Result<Json<DataOut<QuizBundle>>, ApiError> {
  let data = quiz_for(&state, body(payload)?).await?;
  info!(target: "quiz", questions = data.questions.len(), "HTTP quiz served");
  Ok(Json(DataOut { success: true, data }))
}

#[instrument(level = "info", skip(payload))]
pub async fn http_post_chat(payload: Result<Json<ChatIn>, JsonRejection>) -> Result<Json<ChatOut>, ApiError> {
  let message = body(payload)?
    .message
    .ok_or_else(|| ApiError::Validation("Missing message in request".into()))?;
  Ok(Json(ChatOut { success: true, response: chat_reply(&message) }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_agent_status(State(state): State<Arc<AppState>>) -> Json<AgentStatusOut> {
  let out = match state.bridge.probe().await {
    AgentProbe::Running { status } => AgentStatusOut { agent_running: true, agent_response: Some(status), message: None },
    AgentProbe::Down => AgentStatusOut {
      agent_running: false,
      agent_response: None,
      message: Some("AI agent is not responding".into()),
    },
  };
  Json(out)
}

/// Agent inbox: one envelope in, one reply out.
#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_submit(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<Envelope>, JsonRejection>,
) -> Result<Json<AgentReply>, ApiError> {
  let envelope = body(payload)?;
  info!(target: "superlearn_backend", session = %envelope.session, sender = %envelope.sender, "Envelope received");
  let reply = crate::logic::handle_agent_payload(&state, &envelope.payload).await;
  Ok(Json(reply))
}
