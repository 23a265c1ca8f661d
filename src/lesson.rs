//! Lesson progression: the fixed intro → wallet → transaction → verification sequence.
//!
//! Stateless. The caller re-supplies the current stage on every call and decides
//! whether to move on; `advance` only says what the next reply should accomplish
//! and which client action to offer.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::LessonStage;

/// Client-facing action tag returned with every mentor reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
  WaitForInput,
  CreateWallet,
  SendTransaction,
  Continue,
}

impl NextAction {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::WaitForInput => "wait_for_input",
      Self::CreateWallet => "create_wallet",
      Self::SendTransaction => "send_transaction",
      Self::Continue => "continue",
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
  Introduce,
  AcknowledgeAndSteerToWallet,
  ExplainWallet,
  ExplainTransaction,
  CelebrateCompletion,
  AnswerFreeForm,
}

/// What the next natural-language reply should accomplish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
  pub kind: DirectiveKind,
  pub prompt: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Advance {
  pub stage: Option<LessonStage>,
  pub directive: Directive,
  pub next_action: NextAction,
}

/// Which stages lie strictly behind the given one. Derived, never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressFlags {
  #[serde(rename = "intro")]
  pub intro_done: bool,
  #[serde(rename = "wallet")]
  pub wallet_done: bool,
  #[serde(rename = "transaction")]
  pub transaction_done: bool,
  #[serde(rename = "verification")]
  pub verification_done: bool,
}

impl ProgressFlags {
  /// Verification is terminal, so reaching it also counts as completing it.
  pub fn for_stage(stage: Option<LessonStage>) -> Self {
    let Some(stage) = stage else { return Self::default() };
    Self {
      intro_done: stage > LessonStage::Intro,
      wallet_done: stage > LessonStage::Wallet,
      transaction_done: stage > LessonStage::Transaction,
      verification_done: stage == LessonStage::Verification,
    }
  }
}

/// Static curriculum record for one stage.
#[derive(Clone, Debug, Serialize)]
pub struct StageCurriculum {
  pub title: &'static str,
  pub content: &'static str,
  #[serde(skip_serializing_if = "is_empty")]
  pub questions: &'static [&'static str],
  #[serde(skip_serializing_if = "is_empty")]
  pub concepts: &'static [&'static str],
  #[serde(skip_serializing_if = "is_empty")]
  pub steps: &'static [&'static str],
  #[serde(skip_serializing_if = "Option::is_none")]
  pub achievement: Option<&'static str>,
}

fn is_empty(items: &&'static [&'static str]) -> bool { items.is_empty() }

static INTRO: StageCurriculum = StageCurriculum {
  title: "Welcome to Crypto Adventure!",
  content: "Hi there! I'm your AI crypto mentor. We're going to learn about cryptocurrency by actually using it safely. Are you ready to start your crypto journey?",
  questions: &[
    "What do you think cryptocurrency is?",
    "Have you ever heard of Bitcoin or other digital money?",
    "What would you like to learn about crypto?",
  ],
  concepts: &[],
  steps: &[],
  achievement: None,
};

static WALLET: StageCurriculum = StageCurriculum {
  title: "Your Digital Wallet",
  content: "Great! First, we need to create your digital wallet. Think of it like a special digital backpack that holds your crypto coins. The cool thing is, you don't need to remember any complicated passwords!",
  questions: &[],
  concepts: &["digital wallet", "safe storage", "easy access"],
  steps: &[],
  achievement: None,
};

static TRANSACTION: StageCurriculum = StageCurriculum {
  title: "Your First Transaction",
  content: "Now let's send your first crypto transaction! We'll send a small amount of testnet FLOW tokens. This is like practice money - it's not real money, so it's completely safe to learn with.",
  questions: &[],
  concepts: &[],
  steps: &[
    "Choose how much to send (we'll start with 0.1 FLOW)",
    "Pick a destination address",
    "Review the transaction",
    "Send it and watch it happen!",
  ],
  achievement: None,
};

static VERIFICATION: StageCurriculum = StageCurriculum {
  title: "Proof of Learning",
  content: "Awesome! You just completed your first blockchain transaction. Now let's verify your new skill and earn your 'Crypto Explorer' certificate as an NFT!",
  questions: &[],
  concepts: &[],
  steps: &[],
  achievement: Some("First Transaction Master"),
};

/// Curriculum for a stage; unrecognized stages read the intro record.
pub fn curriculum(stage: Option<LessonStage>) -> &'static StageCurriculum {
  match stage.unwrap_or(LessonStage::Intro) {
    LessonStage::Intro => &INTRO,
    LessonStage::Wallet => &WALLET,
    LessonStage::Transaction => &TRANSACTION,
    LessonStage::Verification => &VERIFICATION,
  }
}

/// Decide the next directive and client action. `stage` is parsed leniently:
/// anything that is not one of the four stage names runs the free-form branch.
#[instrument(level = "debug", skip(user_name, user_input), fields(input_len = user_input.len()))]
pub fn advance(stage: &str, user_name: &str, user_input: &str) -> Advance {
  let parsed = LessonStage::parse(stage);
  let (kind, prompt, next_action) = match parsed {
    Some(LessonStage::Intro) if !user_input.trim().is_empty() => (
      DirectiveKind::AcknowledgeAndSteerToWallet,
      format!("The student {user_name} said: '{user_input}'. Respond to their answer and guide them toward creating their first digital wallet."),
      NextAction::WaitForInput,
    ),
    Some(LessonStage::Intro) => (
      DirectiveKind::Introduce,
      format!("Introduce cryptocurrency learning to {user_name}. Ask them what they know about digital money to gauge their starting level."),
      NextAction::WaitForInput,
    ),
    Some(LessonStage::Wallet) => (
      DirectiveKind::ExplainWallet,
      format!("Explain digital wallets to {user_name} in simple terms. They're about to create their first wallet with just their email - no complicated passwords needed!"),
      NextAction::CreateWallet,
    ),
    Some(LessonStage::Transaction) => (
      DirectiveKind::ExplainTransaction,
      format!("Guide {user_name} through their first crypto transaction. Explain we're using safe 'practice money' (testnet FLOW) and walk them through the steps."),
      NextAction::SendTransaction,
    ),
    Some(LessonStage::Verification) => (
      DirectiveKind::CelebrateCompletion,
      format!("Celebrate {user_name}'s success! They just completed their first blockchain transaction. Explain how they're earning a special NFT certificate to prove their new skills."),
      NextAction::Continue,
    ),
    None => (
      DirectiveKind::AnswerFreeForm,
      format!("Help {user_name} with their crypto learning question: {user_input}"),
      NextAction::WaitForInput,
    ),
  };
  debug!(target: "lesson", ?kind, next_action = next_action.as_str(), "Stage advanced");
  Advance { stage: parsed, directive: Directive { kind, prompt }, next_action }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn intro_without_input_introduces() {
    let a = advance("intro", "Ada", "");
    assert_eq!(a.next_action, NextAction::WaitForInput);
    assert_eq!(a.directive.kind, DirectiveKind::Introduce);
    assert!(a.directive.prompt.contains("Ada"));
  }

  #[test]
  fn intro_with_input_acknowledges() {
    let a = advance("intro", "Ada", "digital money?");
    assert_eq!(a.next_action, NextAction::WaitForInput);
    assert_eq!(a.directive.kind, DirectiveKind::AcknowledgeAndSteerToWallet);
    assert!(a.directive.prompt.contains("digital money?"));
  }

  #[test]
  fn fixed_actions_per_stage() {
    assert_eq!(advance("wallet", "Ada", "anything").next_action, NextAction::CreateWallet);
    assert_eq!(advance("transaction", "Ada", "").next_action, NextAction::SendTransaction);
    assert_eq!(advance("verification", "Ada", "anything").next_action, NextAction::Continue);
  }

  #[test]
  fn unknown_stage_answers_free_form() {
    let a = advance("graduation", "Ada", "what is gas?");
    assert_eq!(a.stage, None);
    assert_eq!(a.next_action, NextAction::WaitForInput);
    assert_eq!(a.directive.kind, DirectiveKind::AnswerFreeForm);
    assert!(a.directive.prompt.ends_with("what is gas?"));
  }

  #[test]
  fn progress_for_transaction() {
    let p = ProgressFlags::for_stage(Some(LessonStage::Transaction));
    assert_eq!(p, ProgressFlags { intro_done: true, wallet_done: true, transaction_done: false, verification_done: false });
  }

  #[test]
  fn progress_edges() {
    assert_eq!(ProgressFlags::for_stage(Some(LessonStage::Intro)), ProgressFlags::default());
    let v = ProgressFlags::for_stage(Some(LessonStage::Verification));
    assert!(v.intro_done && v.wallet_done && v.transaction_done && v.verification_done);
    assert_eq!(ProgressFlags::for_stage(None), ProgressFlags::default());
  }

  #[test]
  fn progress_serializes_with_stage_names() {
    let v = serde_json::to_value(ProgressFlags::for_stage(Some(LessonStage::Wallet))).unwrap();
    assert_eq!(v, serde_json::json!({"intro": true, "wallet": false, "transaction": false, "verification": false}));
  }

  #[test]
  fn unknown_stage_reads_intro_curriculum() {
    assert_eq!(curriculum(None).title, "Welcome to Crypto Adventure!");
    let v = serde_json::to_value(curriculum(Some(LessonStage::Verification))).unwrap();
    assert_eq!(v["achievement"], "First Transaction Master");
    assert!(v.get("steps").is_none());
  }
}
