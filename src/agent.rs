//! AgentBridge: forwards learner requests to a downstream agent process and probes it.
//!
//! One POST per request, bounded by the configured timeout, never retried. Callers
//! treat every `BridgeError` as "answer locally instead".

use std::time::Duration;

use reqwest::header::USER_AGENT;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::Settings;
use crate::domain::{ContentBundle, QuizBundle};
use crate::error::BridgeError;
use crate::protocol::{AgentMessage, AgentReply, Envelope, LearningRequest, QuizRequest};

const ENVELOPE_VERSION: u32 = 1;
const BRIDGE_SENDER: &str = "superlearn-bridge";
const AGENT_TARGET: &str = "superlearn-agent";

/// Result of an agent liveness probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentProbe {
  Running { status: u16 },
  Down,
}

#[derive(Clone)]
pub struct AgentBridge {
  client: reqwest::Client,
  pub agent_url: String,
  pub status_url: String,
  timeout: Duration,
  status_timeout: Duration,
}

impl AgentBridge {
  pub fn new(settings: &Settings) -> Result<Self, BridgeError> {
    let client = reqwest::Client::builder().build()?;
    Ok(Self {
      client,
      agent_url: settings.agent_url.clone(),
      status_url: settings.agent_status_url.clone(),
      timeout: settings.agent_timeout,
      status_timeout: settings.status_timeout,
    })
  }

  /// Wrap `msg` in an envelope, POST it, and decode the reply.
  #[instrument(level = "info", skip(self, msg), fields(kind = msg.kind(), url = %self.agent_url))]
  pub async fn send(&self, msg: &AgentMessage) -> Result<AgentReply, BridgeError> {
    let payload = serde_json::to_string(msg).map_err(|e| BridgeError::Malformed(e.to_string()))?;
    let envelope = Envelope {
      version: ENVELOPE_VERSION,
      sender: BRIDGE_SENDER.into(),
      target: AGENT_TARGET.into(),
      session: Uuid::new_v4().to_string(),
      protocol_digest: String::new(),
      schema_digest: String::new(),
      payload,
    };

    let res = self.client.post(&self.agent_url)
      .header(USER_AGENT, "superlearn-bridge/0.1")
      .timeout(self.timeout)
      .json(&envelope)
      .send()
      .await?;

    if !res.status().is_success() {
      return Err(BridgeError::Status(res.status().as_u16()));
    }
    let reply: AgentReply = res.json().await?;
    info!(target: "bridge", session = %envelope.session, reply = reply.kind(), "Agent replied");
    Ok(reply)
  }

  pub async fn request_learning(&self, req: LearningRequest) -> Result<ContentBundle, BridgeError> {
    match self.send(&AgentMessage::Learning(req)).await? {
      AgentReply::Learning(bundle) => Ok(bundle),
      other => Err(unexpected("learning", other)),
    }
  }

  pub async fn request_quiz(&self, req: QuizRequest) -> Result<QuizBundle, BridgeError> {
    match self.send(&AgentMessage::Quiz(req)).await? {
      AgentReply::Quiz(bundle) => Ok(bundle),
      other => Err(unexpected("quiz", other)),
    }
  }

  /// Any HTTP answer counts as running, whatever the status code.
  #[instrument(level = "info", skip(self), fields(url = %self.status_url))]
  pub async fn probe(&self) -> AgentProbe {
    match self.client.get(&self.status_url).timeout(self.status_timeout).send().await {
      Ok(res) => AgentProbe::Running { status: res.status().as_u16() },
      Err(e) => {
        warn!(target: "bridge", error = %e, "Agent probe failed");
        AgentProbe::Down
      }
    }
  }
}

fn unexpected(expected: &'static str, got: AgentReply) -> BridgeError {
  match got {
    AgentReply::Error { message } => BridgeError::UnexpectedReply { expected, got: format!("error: {message}") },
    other => BridgeError::UnexpectedReply { expected, got: other.kind().to_string() },
  }
}
