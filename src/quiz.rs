//! Quiz selection from the catalog.
//!
//! A topic that matches a quiz-bearing entry only ever gets that entry's questions
//! for the requested difficulty, which may be none. A topic matching nothing gets
//! one generic question. The result is truncated to the requested count and never padded.

use tracing::{debug, instrument};

use crate::catalog::ContentCatalog;
use crate::domain::{QuizBundle, QuizQuestion};

pub const DEFAULT_DIFFICULTY: &str = "medium";
pub const DEFAULT_QUESTION_COUNT: i64 = 5;

#[instrument(level = "debug", skip(catalog, topic), fields(topic_len = topic.len()))]
pub fn quiz(catalog: &ContentCatalog, topic: &str, difficulty: &str, count: i64) -> QuizBundle {
  let mut questions = match catalog.lookup_quiz(topic) {
    Some(entry) => {
      let found = entry
        .quiz
        .as_ref()
        .and_then(|q| q.get(difficulty))
        .cloned()
        .unwrap_or_default();
      debug!(target: "quiz", entry = %entry.name, %difficulty, available = found.len(), "Catalog quiz match");
      found
    }
    None => {
      debug!(target: "quiz", %difficulty, "No quiz entry; generic question");
      vec![generic_question(topic)]
    }
  };

  let limit = usize::try_from(count).unwrap_or(0);
  questions.truncate(limit);

  QuizBundle { topic: topic.to_string(), questions }
}

fn generic_question(topic: &str) -> QuizQuestion {
  QuizQuestion {
    question: format!("What is the main concept behind {topic}?"),
    options: vec![
      format!("Basic principle of {topic}"),
      format!("Advanced concept in {topic}"),
      format!("Application of {topic}"),
      format!("History of {topic}"),
    ],
    correct_index: 0,
    explanation: format!("This relates to the fundamental principles of {topic}."),
  }
}

/// Single-question quiz that asks the learner to retry; used when a request cannot be served.
pub fn degraded_quiz(topic: &str) -> QuizBundle {
  QuizBundle {
    topic: topic.to_string(),
    questions: vec![QuizQuestion {
      question: "What would you like to learn about?".into(),
      options: vec![
        "Try again".into(),
        "Ask for help".into(),
        "Choose different topic".into(),
        "Contact support".into(),
      ],
      correct_index: 0,
      explanation: "There was an error generating your quiz. Please try again.".into(),
    }],
  }
}
