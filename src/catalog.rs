//! Static topic catalog: explanation and quiz content keyed by domain keywords.
//!
//! Entries are matched in declaration order by case-insensitive substring, so the
//! first entry whose keyword appears in the topic wins (blockchain > ai > programming
//! for the built-in set). The catalog is built once at startup, validated, and then
//! shared read-only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::QuizQuestion;
use crate::error::CatalogError;

/// One keyword group with its canned content.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogEntry {
  pub name: String,
  pub keywords: Vec<String>,
  /// First sentence of the explanation; level/style phrases are appended.
  pub explanation: String,
  pub key_points: Vec<String>,
  pub next_steps: Vec<String>,
  pub resources: Vec<String>,
  /// Questions per difficulty. `None` means the entry carries no quiz content at all.
  #[serde(default)]
  pub quiz: Option<BTreeMap<String, Vec<QuizQuestion>>>,
  /// Keywords that select the quiz; `keywords` when absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub quiz_keywords: Option<Vec<String>>,
}

impl CatalogEntry {
  fn matches(&self, topic_lower: &str) -> bool {
    contains_any(topic_lower, &self.keywords)
  }

  fn matches_quiz(&self, topic_lower: &str) -> bool {
    contains_any(topic_lower, self.quiz_keywords.as_deref().unwrap_or(&self.keywords))
  }

  pub fn has_quiz(&self) -> bool { self.quiz.is_some() }
}

#[derive(Clone, Debug)]
pub struct ContentCatalog {
  entries: Vec<CatalogEntry>,
}

impl ContentCatalog {
  /// Validate and freeze a set of entries. Keywords are lower-cased here so
  /// matching only has to lower-case the topic.
  pub fn new(mut entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
    for entry in &mut entries {
      entry.keywords = normalize(&entry.keywords);
      entry.quiz_keywords = entry.quiz_keywords.as_deref().map(normalize);
      if entry.keywords.is_empty() {
        return Err(CatalogError::NoKeywords { entry: entry.name.clone() });
      }
      let Some(quiz) = &entry.quiz else { continue };
      for (difficulty, questions) in quiz {
        for (index, q) in questions.iter().enumerate() {
          if q.options.is_empty() {
            return Err(CatalogError::NoOptions {
              entry: entry.name.clone(),
              difficulty: difficulty.clone(),
              index,
            });
          }
          if q.correct_index >= q.options.len() {
            return Err(CatalogError::CorrectOutOfRange {
              entry: entry.name.clone(),
              difficulty: difficulty.clone(),
              index,
              correct: q.correct_index,
              options: q.options.len(),
            });
          }
        }
      }
    }
    info!(target: "superlearn_backend", entries = entries.len(), "Content catalog loaded");
    Ok(Self { entries })
  }

  /// The built-in blockchain / ai / programming catalog.
  pub fn builtin() -> Result<Self, CatalogError> { Self::new(builtin_entries()) }

  pub fn entries(&self) -> &[CatalogEntry] { &self.entries }

  /// First entry (in priority order) whose keyword occurs in `topic`.
  pub fn lookup(&self, topic: &str) -> Option<&CatalogEntry> {
    let topic = topic.to_lowercase();
    self.entries.iter().find(|e| e.matches(&topic))
  }

  /// Like `lookup`, restricted to entries that carry quiz content and matched on
  /// their quiz keywords.
  pub fn lookup_quiz(&self, topic: &str) -> Option<&CatalogEntry> {
    let topic = topic.to_lowercase();
    self.entries.iter().filter(|e| e.has_quiz()).find(|e| e.matches_quiz(&topic))
  }
}

fn contains_any(topic_lower: &str, keywords: &[String]) -> bool {
  keywords.iter().any(|k| topic_lower.contains(k.as_str()))
}

fn normalize(keywords: &[String]) -> Vec<String> {
  keywords.iter().map(|k| k.trim().to_lowercase()).filter(|k| !k.is_empty()).collect()
}

fn strings(items: &[&str]) -> Vec<String> {
  items.iter().map(|s| s.to_string()).collect()
}

fn question(text: &str, options: [&str; 4], correct_index: usize, explanation: &str) -> QuizQuestion {
  QuizQuestion {
    question: text.into(),
    options: strings(&options),
    correct_index,
    explanation: explanation.into(),
  }
}

fn builtin_entries() -> Vec<CatalogEntry> {
  vec![
    CatalogEntry {
      name: "blockchain".into(),
      keywords: strings(&["blockchain"]),
      explanation: "Blockchain is a distributed ledger technology that maintains a continuously growing list of records.".into(),
      key_points: strings(&[
        "Decentralized network of computers",
        "Immutable transaction records",
        "Cryptographic security",
        "Consensus mechanisms",
      ]),
      next_steps: strings(&[
        "Learn about cryptocurrency basics",
        "Understand smart contracts",
        "Explore different blockchain platforms",
      ]),
      resources: strings(&[
        "Blockchain fundamentals course",
        "Ethereum documentation",
        "Bitcoin whitepaper",
      ]),
      quiz: Some(BTreeMap::from([
        ("easy".to_string(), vec![
          question(
            "What is a blockchain?",
            ["A type of database", "A distributed ledger", "A cryptocurrency", "A programming language"],
            1,
            "A blockchain is a distributed ledger that maintains a continuously growing list of records.",
          ),
          question(
            "What makes blockchain secure?",
            ["Passwords", "Cryptography", "Firewalls", "Antivirus"],
            1,
            "Blockchain uses cryptographic hashing and digital signatures for security.",
          ),
        ]),
        ("medium".to_string(), vec![
          question(
            "What is a consensus mechanism?",
            ["A voting system", "A way to agree on network state", "A type of cryptocurrency", "A blockchain platform"],
            1,
            "Consensus mechanisms ensure all network participants agree on the current state.",
          ),
          question(
            "What is the difference between proof-of-work and proof-of-stake?",
            ["Energy consumption", "Security model", "Validator selection", "All of the above"],
            3,
            "PoW and PoS differ in energy use, security approach, and how validators are chosen.",
          ),
        ]),
      ])),
      quiz_keywords: None,
    },
    CatalogEntry {
      name: "ai".into(),
      keywords: strings(&["ai", "artificial intelligence"]),
      explanation: "Artificial Intelligence is the simulation of human intelligence in machines.".into(),
      key_points: strings(&[
        "Machine learning algorithms",
        "Neural networks",
        "Data processing and analysis",
        "Pattern recognition",
      ]),
      next_steps: strings(&[
        "Study machine learning basics",
        "Learn Python programming",
        "Practice with datasets",
      ]),
      resources: strings(&[
        "Introduction to AI course",
        "Python machine learning tutorials",
        "Kaggle datasets and competitions",
      ]),
      quiz: Some(BTreeMap::from([
        ("easy".to_string(), vec![
          question(
            "What does AI stand for?",
            ["Advanced Intelligence", "Artificial Intelligence", "Automated Intelligence", "Algorithmic Intelligence"],
            1,
            "AI stands for Artificial Intelligence.",
          ),
          question(
            "What is machine learning?",
            ["A type of AI", "A programming language", "A computer", "A website"],
            0,
            "Machine learning is a subset of artificial intelligence.",
          ),
        ]),
      ])),
      quiz_keywords: Some(strings(&["ai"])),
    },
    CatalogEntry {
      name: "programming".into(),
      keywords: strings(&["programming", "coding"]),
      explanation: "Programming is the process of creating instructions for computers to follow.".into(),
      key_points: strings(&[
        "Variables and data types",
        "Control structures (loops, conditions)",
        "Functions and methods",
        "Problem-solving approach",
      ]),
      next_steps: strings(&[
        "Choose a programming language",
        "Practice with coding exercises",
        "Build small projects",
      ]),
      resources: strings(&[
        "Interactive coding platforms",
        "Programming language documentation",
        "Open source projects on GitHub",
      ]),
      quiz: None,
      quiz_keywords: None,
    },
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  fn catalog() -> ContentCatalog { ContentCatalog::builtin().expect("builtin catalog is valid") }

  #[test]
  fn lookup_is_case_insensitive_substring() {
    let c = catalog();
    assert_eq!(c.lookup("Intro to BLOCKCHAIN wallets").unwrap().name, "blockchain");
    assert_eq!(c.lookup("Artificial Intelligence").unwrap().name, "ai");
    assert_eq!(c.lookup("Coding for kids").unwrap().name, "programming");
    assert!(c.lookup("gardening").is_none());
  }

  #[test]
  fn declared_order_breaks_ties() {
    let c = catalog();
    assert_eq!(c.lookup("blockchain and ai programming").unwrap().name, "blockchain");
    assert_eq!(c.lookup("ai programming").unwrap().name, "ai");
  }

  #[test]
  fn quiz_lookup_skips_entries_without_quiz() {
    let c = catalog();
    assert!(c.lookup("programming").is_some());
    assert!(c.lookup_quiz("programming").is_none());
    assert_eq!(c.lookup_quiz("ai programming").unwrap().name, "ai");
  }

  #[test]
  fn quiz_lookup_uses_quiz_keywords() {
    let c = catalog();
    assert_eq!(c.lookup("Artificial Intelligence").unwrap().name, "ai");
    assert!(c.lookup_quiz("Artificial Intelligence").is_none());
    assert_eq!(c.lookup_quiz("AI ethics").unwrap().name, "ai");
    assert_eq!(c.lookup_quiz("Blockchain 101").unwrap().name, "blockchain");
  }

  #[test]
  fn builtin_entries_keep_correct_index_in_range() {
    for entry in catalog().entries() {
      for questions in entry.quiz.iter().flat_map(|q| q.values()) {
        for q in questions {
          assert!(q.correct_index < q.options.len(), "{}: {}", entry.name, q.question);
        }
      }
    }
  }

  #[test]
  fn out_of_range_correct_index_is_rejected() {
    let mut entries = builtin_entries();
    if let Some(quiz) = entries[0].quiz.as_mut() {
      quiz.get_mut("easy").unwrap()[1].correct_index = 4;
    }
    let err = ContentCatalog::new(entries).unwrap_err();
    assert!(matches!(err, CatalogError::CorrectOutOfRange { correct: 4, options: 4, index: 1, .. }));
  }

  #[test]
  fn entry_without_keywords_is_rejected() {
    let mut entries = builtin_entries();
    entries[2].keywords = vec!["  ".into()];
    assert!(matches!(ContentCatalog::new(entries), Err(CatalogError::NoKeywords { .. })));
  }

  #[test]
  fn keywords_are_normalized() {
    let mut entries = builtin_entries();
    entries[2].keywords = vec![" Rust ".into()];
    let c = ContentCatalog::new(entries).unwrap();
    assert_eq!(c.lookup("learning rust").unwrap().name, "programming");
  }
}
