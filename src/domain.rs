//! Domain models: learner preferences, lesson stages, and the content/quiz bundles
//! handed back to callers. Bundles are built fresh per request and never stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

/// How deep an explanation should go.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProficiencyLevel {
  #[default]
  Beginner,
  Intermediate,
  Advanced,
}

impl ProficiencyLevel {
  pub const ALL: [ProficiencyLevel; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Beginner => "Beginner",
      Self::Intermediate => "Intermediate",
      Self::Advanced => "Advanced",
    }
  }

  /// Phrase interpolated into catalog explanations.
  pub fn complexity_phrase(&self) -> &'static str {
    match self {
      Self::Beginner => "simple terms with basic examples",
      Self::Intermediate => "moderate complexity with practical applications",
      Self::Advanced => "detailed technical depth with complex examples",
    }
  }
}

impl FromStr for ProficiencyLevel {
  type Err = UnknownVariant;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim();
    Self::ALL
      .into_iter()
      .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
      .ok_or_else(|| UnknownVariant::new("user_level", s, &Self::ALL.map(|v| v.as_str())))
  }
}

impl fmt::Display for ProficiencyLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Preferred delivery style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LearningStyle {
  #[default]
  Visual,
  Auditory,
  Reading,
  Kinesthetic,
}

impl LearningStyle {
  pub const ALL: [LearningStyle; 4] = [Self::Visual, Self::Auditory, Self::Reading, Self::Kinesthetic];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Visual => "Visual",
      Self::Auditory => "Auditory",
      Self::Reading => "Reading",
      Self::Kinesthetic => "Kinesthetic",
    }
  }

  pub fn delivery_phrase(&self) -> &'static str {
    match self {
      Self::Visual => "with diagrams, charts, and visual metaphors",
      Self::Auditory => "with discussions, explanations, and verbal examples",
      Self::Reading => "with detailed text, definitions, and written materials",
      Self::Kinesthetic => "with hands-on activities and practical exercises",
    }
  }
}

impl FromStr for LearningStyle {
  type Err = UnknownVariant;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim();
    Self::ALL
      .into_iter()
      .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
      .ok_or_else(|| UnknownVariant::new("learning_style", s, &Self::ALL.map(|v| v.as_str())))
  }
}

impl fmt::Display for LearningStyle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// One step of the fixed lesson sequence. Ordered: intro < wallet < transaction < verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStage {
  Intro,
  Wallet,
  Transaction,
  Verification,
}

impl LessonStage {
  pub const ALL: [LessonStage; 4] = [Self::Intro, Self::Wallet, Self::Transaction, Self::Verification];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Intro => "intro",
      Self::Wallet => "wallet",
      Self::Transaction => "transaction",
      Self::Verification => "verification",
    }
  }

  /// Lenient parse: anything outside the four stage names is `None` (free-form mode).
  pub fn parse(s: &str) -> Option<Self> {
    let wanted = s.trim();
    Self::ALL.into_iter().find(|v| v.as_str().eq_ignore_ascii_case(wanted))
  }
}

impl fmt::Display for LessonStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Explanation bundle returned by `/learn` and the `learning` message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBundle {
  pub explanation: String,
  pub key_points: Vec<String>,
  pub next_steps: Vec<String>,
  pub resources: Vec<String>,
}

/// A multiple-choice question. `correct_index` travels as `correct` on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
  pub question: String,
  pub options: Vec<String>,
  #[serde(rename = "correct")]
  pub correct_index: usize,
  pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizBundle {
  pub topic: String,
  pub questions: Vec<QuizQuestion>,
}

/// Outcome of the (simulated) practice transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
  pub success: bool,
  pub transaction_id: String,
  pub next_lesson: LessonStage,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn level_parse_is_case_insensitive() {
    assert_eq!("advanced".parse::<ProficiencyLevel>().unwrap(), ProficiencyLevel::Advanced);
    assert_eq!(" Intermediate ".parse::<ProficiencyLevel>().unwrap(), ProficiencyLevel::Intermediate);
  }

  #[test]
  fn unknown_style_names_the_allowed_values() {
    let err = "Telepathic".parse::<LearningStyle>().unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("learning_style"));
    assert!(msg.contains("Telepathic"));
    assert!(msg.contains("Kinesthetic"));
  }

  #[test]
  fn stage_order_and_lenient_parse() {
    assert!(LessonStage::Intro < LessonStage::Wallet);
    assert!(LessonStage::Transaction < LessonStage::Verification);
    assert_eq!(LessonStage::parse("WALLET"), Some(LessonStage::Wallet));
    assert_eq!(LessonStage::parse("graduation"), None);
  }

  #[test]
  fn quiz_question_uses_correct_on_the_wire() {
    let q = QuizQuestion {
      question: "q".into(),
      options: vec!["a".into(), "b".into()],
      correct_index: 1,
      explanation: "e".into(),
    };
    let v = serde_json::to_value(&q).unwrap();
    assert_eq!(v["correct"], 1);
    assert!(v.get("correct_index").is_none());
  }
}
