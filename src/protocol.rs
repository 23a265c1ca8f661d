//! Public protocol structs for the HTTP surface and the agent messaging surface (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{ContentBundle, QuizBundle, TransactionResult};
use crate::lesson::{NextAction, ProgressFlags};
use crate::quiz::{DEFAULT_DIFFICULTY, DEFAULT_QUESTION_COUNT};

//
// Agent messaging: one-shot request/reply pairs
//

/// Messages an agent accepts, over `/submit` (inside an `Envelope`) or `/ws`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentMessage {
  Learning(LearningRequest),
  Quiz(QuizRequest),
  Lesson(MentorRequest),
  TransactionGuide(TransactionGuide),
}

impl AgentMessage {
  pub fn kind(&self) -> &'static str {
    match self {
      AgentMessage::Learning(_) => "learning",
      AgentMessage::Quiz(_) => "quiz",
      AgentMessage::Lesson(_) => "lesson",
      AgentMessage::TransactionGuide(_) => "transaction_guide",
    }
  }
}

/// Replies an agent sends back. Exactly one per message.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentReply {
  Learning(ContentBundle),
  Quiz(QuizBundle),
  Lesson(MentorResponse),
  TransactionResult(TransactionResult),
  Error { message: String },
}

impl AgentReply {
  pub fn kind(&self) -> &'static str {
    match self {
      AgentReply::Learning(_) => "learning",
      AgentReply::Quiz(_) => "quiz",
      AgentReply::Lesson(_) => "lesson",
      AgentReply::TransactionResult(_) => "transaction_result",
      AgentReply::Error { .. } => "error",
    }
  }
}

fn default_level() -> String { "Beginner".into() }
fn default_style() -> String { "Visual".into() }
fn default_difficulty() -> String { DEFAULT_DIFFICULTY.into() }
fn default_count() -> i64 { DEFAULT_QUESTION_COUNT }

/// Level and style stay raw strings here; they are resolved (or rejected) by the handler.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LearningRequest {
  pub topic: String,
  #[serde(default = "default_level")]
  pub user_level: String,
  #[serde(default = "default_style")]
  pub learning_style: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizRequest {
  pub topic: String,
  #[serde(default = "default_difficulty")]
  pub difficulty: String,
  #[serde(default = "default_count")]
  pub num_questions: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MentorRequest {
  pub user_id: String,
  pub user_name: String,
  /// intro, wallet, transaction, verification; anything else is answered free-form.
  pub lesson_stage: String,
  #[serde(default)]
  pub user_input: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MentorResponse {
  pub message: String,
  pub next_action: NextAction,
  pub lesson_data: LessonData,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LessonData {
  pub stage: String,
  pub curriculum: serde_json::Value,
  pub progress: ProgressFlags,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionGuide {
  pub user_id: String,
  pub wallet_address: String,
  #[serde(default)]
  pub transaction_type: String,
}

/// Transport wrapper used between bridge and agent. `payload` is a JSON-encoded `AgentMessage`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
  pub version: u32,
  pub sender: String,
  pub target: String,
  pub session: String,
  #[serde(default)]
  pub protocol_digest: String,
  #[serde(default)]
  pub schema_digest: String,
  pub payload: String,
}

//
// HTTP request/response DTOs
//

/// Every field optional so that missing ones become a 400 with a readable message.
#[derive(Debug, Default, Deserialize)]
pub struct LearnIn {
  pub topic: Option<String>,
  pub user_level: Option<String>,
  pub learning_style: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuizIn {
  pub topic: Option<String>,
  pub difficulty: Option<String>,
  pub num_questions: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatIn {
  pub message: Option<String>,
}

#[derive(Serialize)]
pub struct HealthOut {
  pub status: &'static str,
  pub bridge_port: u16,
  pub agent_url: String,
  pub timestamp: i64,
}

#[derive(Serialize)]
pub struct DataOut<T: Serialize> {
  pub success: bool,
  pub data: T,
}

#[derive(Serialize)]
pub struct ChatOut {
  pub success: bool,
  pub response: String,
}

#[derive(Debug, Serialize)]
pub struct AgentStatusOut {
  pub agent_running: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub agent_response: Option<u16>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn agent_message_defaults() {
    let m: AgentMessage = serde_json::from_str(r#"{"type":"quiz","topic":"ai"}"#).unwrap();
    match m {
      AgentMessage::Quiz(q) => {
        assert_eq!(q.difficulty, "medium");
        assert_eq!(q.num_questions, 5);
      }
      other => panic!("unexpected {other:?}"),
    }
    let m: AgentMessage = serde_json::from_str(r#"{"type":"learning","topic":"ai"}"#).unwrap();
    assert_eq!(m.kind(), "learning");
  }

  #[test]
  fn reply_is_tagged() {
    let r = AgentReply::Error { message: "nope".into() };
    assert_eq!(serde_json::to_value(&r).unwrap(), serde_json::json!({"type": "error", "message": "nope"}));
  }

  #[test]
  fn status_out_omits_absent_fields() {
    let down = AgentStatusOut { agent_running: false, agent_response: None, message: Some("AI agent is not responding".into()) };
    let v = serde_json::to_value(&down).unwrap();
    assert!(v.get("agent_response").is_none());
    assert_eq!(v["message"], "AI agent is not responding");
  }
}
