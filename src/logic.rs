//! Core behaviors shared by the HTTP handlers and the agent messaging surface.
//!
//! This includes:
//!   - Learn / quiz requests (validated, optionally forwarded to a downstream agent)
//!   - Keyword chat replies
//!   - Mentor lesson sessions and the simulated transaction guide
//!   - Dispatch of one-shot agent messages, with degraded replies instead of failures

use tracing::{debug, info, instrument, warn};

use crate::config::BridgeMode;
use crate::content::{degraded_bundle, explain};
use crate::domain::{ContentBundle, LearningStyle, LessonStage, ProficiencyLevel, QuizBundle, TransactionResult};
use crate::error::{ApiError, UnknownVariant};
use crate::lesson::{advance, curriculum, ProgressFlags};
use crate::protocol::{
  AgentMessage, AgentReply, LearnIn, LearningRequest, LessonData, MentorRequest, MentorResponse, QuizIn,
  QuizRequest, TransactionGuide,
};
use crate::quiz::{degraded_quiz, quiz, DEFAULT_DIFFICULTY, DEFAULT_QUESTION_COUNT};
use crate::state::AppState;
use crate::util::char_prefix;

/// Absent values take the defaults; present but unknown values are rejected.
pub fn resolve_preferences(
  level: Option<&str>,
  style: Option<&str>,
) -> Result<(ProficiencyLevel, LearningStyle), UnknownVariant> {
  let level = level.map(str::parse::<ProficiencyLevel>).transpose()?.unwrap_or_default();
  let style = style.map(str::parse::<LearningStyle>).transpose()?.unwrap_or_default();
  Ok((level, style))
}

fn required_topic(topic: Option<String>) -> Result<String, ApiError> {
  match topic {
    Some(t) if !t.trim().is_empty() => Ok(t),
    _ => Err(ApiError::Validation("Missing topic in request".into())),
  }
}

#[instrument(level = "info", skip(state, body))]
pub async fn learn(state: &AppState, body: LearnIn) -> Result<ContentBundle, ApiError> {
  let topic = required_topic(body.topic)?;
  let (level, style) = resolve_preferences(body.user_level.as_deref(), body.learning_style.as_deref())?;
  info!(target: "learn", topic_len = topic.len(), %level, %style, "Processing learning request");

  if state.settings.bridge_mode == BridgeMode::Forward {
    let req = LearningRequest {
      topic: topic.clone(),
      user_level: level.to_string(),
      learning_style: style.to_string(),
    };
    match state.bridge.request_learning(req).await {
      Ok(bundle) => return Ok(bundle),
      Err(e) => warn!(target: "bridge", error = %e, "Forwarded learning request failed; answering locally"),
    }
  }

  Ok(explain(&state.catalog, &topic, level, style))
}

#[instrument(level = "info", skip(state, body))]
pub async fn quiz_for(state: &AppState, body: QuizIn) -> Result<QuizBundle, ApiError> {
  let topic = required_topic(body.topic)?;
  let difficulty = body.difficulty.unwrap_or_else(|| DEFAULT_DIFFICULTY.into());
  let count = body.num_questions.unwrap_or(DEFAULT_QUESTION_COUNT);
  info!(target: "quiz", topic_len = topic.len(), %difficulty, count, "Processing quiz request");

  if state.settings.bridge_mode == BridgeMode::Forward {
    let req = QuizRequest { topic: topic.clone(), difficulty: difficulty.clone(), num_questions: count };
    match state.bridge.request_quiz(req).await {
      Ok(bundle) => return Ok(bundle),
      Err(e) => warn!(target: "bridge", error = %e, "Forwarded quiz request failed; answering locally"),
    }
  }

  Ok(quiz(&state.catalog, &topic, &difficulty, count))
}

/// Fixed keyword rules, checked in order.
pub fn chat_reply(message: &str) -> String {
  let lower = message.to_lowercase();
  let any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

  if any(&["learn", "teach", "explain"]) {
    "I'd be happy to help you learn! What topic would you like to explore?".into()
  } else if any(&["quiz", "test", "questions"]) {
    "I can generate quizzes on various topics. What subject interests you?".into()
  } else if any(&["hello", "hi"]) {
    "Hello! I'm your AI learning assistant. I can help you learn new topics and create quizzes. What would you like to explore today?".into()
  } else {
    format!("I understand you're asking about '{message}'. I can help you learn about this topic or create a quiz. Would you like me to explain this concept or generate some practice questions?")
  }
}

#[instrument(level = "info", skip(state, req), fields(user_id = %req.user_id, stage = %req.lesson_stage))]
pub async fn mentor_session(state: &AppState, req: &MentorRequest) -> MentorResponse {
  let step = advance(&req.lesson_stage, &req.user_name, &req.user_input);
  let stage_curriculum = curriculum(step.stage);
  let curriculum_json = serde_json::to_value(stage_curriculum).unwrap_or_default();

  let context = format!(
    "\n    STAGE: {}\n    CURRICULUM: {}\n    USER INPUT: {}\n    USER: {}\n",
    req.lesson_stage, curriculum_json, req.user_input, req.user_name
  );
  let message = state.composer.render(&step.directive, &context).await;

  info!(target: "lesson", user_id = %req.user_id, next_action = step.next_action.as_str(), "Mentor reply ready");
  MentorResponse {
    message,
    next_action: step.next_action,
    lesson_data: LessonData {
      stage: req.lesson_stage.clone(),
      curriculum: curriculum_json,
      progress: ProgressFlags::for_stage(step.stage),
    },
  }
}

/// Simulated practice transaction; no ledger is touched.
#[instrument(level = "info", skip(req), fields(user_id = %req.user_id))]
pub fn guide_transaction(req: &TransactionGuide) -> TransactionResult {
  let transaction_id = format!("flow_tx_{}_{}", req.user_id, char_prefix(&req.wallet_address, 8));
  info!(target: "lesson", %transaction_id, "Transaction guidance completed");
  TransactionResult { success: true, transaction_id, next_lesson: LessonStage::Verification }
}

/// Serve one agent message. Always produces a reply of the matching kind.
#[instrument(level = "info", skip(state, msg), fields(kind = msg.kind()))]
pub async fn handle_agent_message(state: &AppState, msg: AgentMessage) -> AgentReply {
  match msg {
    AgentMessage::Learning(req) => {
      match resolve_preferences(Some(&req.user_level), Some(&req.learning_style)) {
        Ok((level, style)) => AgentReply::Learning(explain(&state.catalog, &req.topic, level, style)),
        Err(e) => {
          warn!(target: "learn", error = %e, "Learning message could not be served; degraded reply");
          AgentReply::Learning(degraded_bundle(&req.topic))
        }
      }
    }
    AgentMessage::Quiz(req) => {
      AgentReply::Quiz(quiz(&state.catalog, &req.topic, &req.difficulty, req.num_questions))
    }
    AgentMessage::Lesson(req) => AgentReply::Lesson(mentor_session(state, &req).await),
    AgentMessage::TransactionGuide(req) => AgentReply::TransactionResult(guide_transaction(&req)),
  }
}

/// Decode a raw JSON message and serve it. A payload whose `type` is known but whose
/// body does not decode still gets a degraded reply of that kind.
pub async fn handle_agent_payload(state: &AppState, payload: &str) -> AgentReply {
  match serde_json::from_str::<AgentMessage>(payload) {
    Ok(msg) => handle_agent_message(state, msg).await,
    Err(e) => {
      let raw: serde_json::Value = serde_json::from_str(payload).unwrap_or_default();
      let topic = raw.get("topic").and_then(|t| t.as_str()).unwrap_or_default();
      debug!(target: "superlearn_backend", error = %e, "Undecodable agent payload");
      match raw.get("type").and_then(|t| t.as_str()) {
        Some("quiz") => AgentReply::Quiz(degraded_quiz(topic)),
        Some("learning") => AgentReply::Learning(degraded_bundle(topic)),
        _ => AgentReply::Error { message: format!("Invalid message: {e}") },
      }
    }
  }
}
