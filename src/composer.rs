//! ResponseComposer: turns a lesson directive into a short learner-facing reply via an
//! external text generator.
//!
//! The composer always answers. A missing generator, a failed call, an empty reply, or a
//! call that outlives the deadline all become `Rendered::Degraded`, and `render` maps
//! that to `FALLBACK_REPLY`. Generation errors never leave this module.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::error::GenerationError;
use crate::lesson::Directive;
use crate::util::{fill_template, trunc_for_log};

pub const FALLBACK_REPLY: &str = "I'm having trouble thinking right now. Let's try again!";

const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f32 = 0.7;
const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

/// One completion request.
#[derive(Clone, Debug)]
pub struct Completion {
  pub system: String,
  pub user: String,
  pub max_tokens: u32,
  pub temperature: f32,
}

/// External text-generation service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
  fn describe(&self) -> String;
  async fn complete(&self, req: Completion) -> Result<String, GenerationError>;
}

/// Outcome of a render attempt.
#[derive(Debug)]
pub enum Rendered {
  Text(String),
  Degraded(GenerationError),
}

impl Rendered {
  pub fn into_text(self) -> String {
    match self {
      Rendered::Text(t) => t,
      Rendered::Degraded(_) => FALLBACK_REPLY.to_string(),
    }
  }
}

#[derive(Clone)]
pub struct ResponseComposer {
  generator: Option<Arc<dyn TextGenerator>>,
  system_template: String,
  deadline: Duration,
}

impl ResponseComposer {
  /// `system_template` may contain `{lesson_context}`.
  pub fn new(generator: Option<Arc<dyn TextGenerator>>, system_template: String) -> Self {
    Self { generator, system_template, deadline: DEFAULT_DEADLINE }
  }

  pub fn with_deadline(mut self, deadline: Duration) -> Self {
    self.deadline = deadline;
    self
  }

  pub fn is_enabled(&self) -> bool { self.generator.is_some() }

  /// Rendered text, or the fallback reply. Never fails.
  pub async fn render(&self, directive: &Directive, context: &str) -> String {
    self.try_render(directive, context).await.into_text()
  }

  #[instrument(level = "info", skip(self, directive, context), fields(kind = ?directive.kind, context_len = context.len()))]
  pub async fn try_render(&self, directive: &Directive, context: &str) -> Rendered {
    let Some(generator) = &self.generator else {
      debug!(target: "lesson", "No text generator configured; fallback reply");
      return Rendered::Degraded(GenerationError::NotConfigured);
    };

    let req = Completion {
      system: fill_template(&self.system_template, &[("lesson_context", context)]),
      user: directive.prompt.clone(),
      max_tokens: MAX_TOKENS,
      temperature: TEMPERATURE,
    };

    let outcome = match tokio::time::timeout(self.deadline, generator.complete(req)).await {
      Ok(Ok(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
      Ok(Ok(_)) => Err(GenerationError::EmptyReply),
      Ok(Err(e)) => Err(e),
      Err(_) => Err(GenerationError::Timeout),
    };

    match outcome {
      Ok(text) => {
        debug!(target: "lesson", generator = %generator.describe(), reply = %trunc_for_log(&text, 80), "Rendered reply");
        Rendered::Text(text)
      }
      Err(e) => {
        warn!(target: "lesson", generator = %generator.describe(), error = %e, "Text generation failed; fallback reply");
        Rendered::Degraded(e)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lesson::DirectiveKind;
  use std::sync::Mutex;

  struct Echo { seen: Mutex<Option<Completion>> }

  #[async_trait]
  impl TextGenerator for Echo {
    fn describe(&self) -> String { "echo".into() }
    async fn complete(&self, req: Completion) -> Result<String, GenerationError> {
      let reply = format!("  echo: {}  ", req.user);
      *self.seen.lock().unwrap() = Some(req);
      Ok(reply)
    }
  }

  struct Failing;

  #[async_trait]
  impl TextGenerator for Failing {
    fn describe(&self) -> String { "failing".into() }
    async fn complete(&self, _req: Completion) -> Result<String, GenerationError> {
      Err(GenerationError::Status { status: 429, message: "quota exceeded".into() })
    }
  }

  struct Slow;

  #[async_trait]
  impl TextGenerator for Slow {
    fn describe(&self) -> String { "slow".into() }
    async fn complete(&self, _req: Completion) -> Result<String, GenerationError> {
      tokio::time::sleep(Duration::from_secs(5)).await;
      Ok("too late".into())
    }
  }

  struct Blank;

  #[async_trait]
  impl TextGenerator for Blank {
    fn describe(&self) -> String { "blank".into() }
    async fn complete(&self, _req: Completion) -> Result<String, GenerationError> { Ok("   ".into()) }
  }

  fn directive() -> Directive {
    Directive { kind: DirectiveKind::ExplainWallet, prompt: "Explain wallets to Ada".into() }
  }

  #[tokio::test]
  async fn renders_trimmed_text_and_fills_context() {
    let echo = Arc::new(Echo { seen: Mutex::new(None) });
    let composer = ResponseComposer::new(Some(echo.clone()), "Mentor.\nCONTEXT: {lesson_context}".into());
    let out = composer.render(&directive(), "STAGE: wallet").await;
    assert_eq!(out, "echo: Explain wallets to Ada");
    let seen = echo.seen.lock().unwrap().clone().unwrap();
    assert_eq!(seen.system, "Mentor.\nCONTEXT: STAGE: wallet");
    assert_eq!(seen.max_tokens, 150);
  }

  #[tokio::test]
  async fn missing_generator_falls_back() {
    let composer = ResponseComposer::new(None, String::new());
    assert!(!composer.is_enabled());
    assert!(matches!(composer.try_render(&directive(), "").await, Rendered::Degraded(GenerationError::NotConfigured)));
    assert_eq!(composer.render(&directive(), "").await, FALLBACK_REPLY);
  }

  #[tokio::test]
  async fn failing_generator_falls_back() {
    let composer = ResponseComposer::new(Some(Arc::new(Failing)), String::new());
    assert_eq!(composer.render(&directive(), "").await, FALLBACK_REPLY);
  }

  #[tokio::test]
  async fn timeout_falls_back() {
    let composer = ResponseComposer::new(Some(Arc::new(Slow)), String::new())
      .with_deadline(Duration::from_millis(20));
    assert!(matches!(composer.try_render(&directive(), "").await, Rendered::Degraded(GenerationError::Timeout)));
    assert_eq!(composer.render(&directive(), "").await, FALLBACK_REPLY);
  }

  #[tokio::test]
  async fn blank_reply_falls_back() {
    let composer = ResponseComposer::new(Some(Arc::new(Blank)), String::new());
    assert!(matches!(composer.try_render(&directive(), "").await, Rendered::Degraded(GenerationError::EmptyReply)));
  }
}
