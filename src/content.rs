//! Explanation bundles: catalog content when a keyword matches, a templated
//! generic bundle otherwise.

use tracing::{debug, instrument};

use crate::catalog::ContentCatalog;
use crate::domain::{ContentBundle, LearningStyle, ProficiencyLevel};

#[instrument(level = "debug", skip(catalog, topic), fields(topic_len = topic.len()))]
pub fn explain(catalog: &ContentCatalog, topic: &str, level: ProficiencyLevel, style: LearningStyle) -> ContentBundle {
  let tail = format!("{} {}.", level.complexity_phrase(), style.delivery_phrase());

  if let Some(entry) = catalog.lookup(topic) {
    debug!(target: "learn", entry = %entry.name, "Catalog match");
    return ContentBundle {
      explanation: format!("{} {}", entry.explanation, tail),
      key_points: entry.key_points.clone(),
      next_steps: entry.next_steps.clone(),
      resources: entry.resources.clone(),
    };
  }

  debug!(target: "learn", "No catalog match; generic bundle");
  ContentBundle {
    explanation: format!("Let me help you learn about {topic}. {tail}"),
    key_points: vec![
      format!("Understanding the basics of {topic}"),
      format!("Key concepts in {topic}"),
      format!("Practical applications of {topic}"),
      format!("Common challenges in {topic}"),
    ],
    next_steps: vec![
      format!("Research fundamentals of {topic}"),
      format!("Find practical examples of {topic}"),
      format!("Connect with experts in {topic}"),
    ],
    resources: vec![
      format!("Online courses about {topic}"),
      format!("Books and articles on {topic}"),
      format!("Community forums for {topic}"),
    ],
  }
}

/// Reply used on the messaging surface when a request cannot be served.
pub fn degraded_bundle(topic: &str) -> ContentBundle {
  ContentBundle {
    explanation: format!("I encountered an error while processing your request about {topic}. Please try again."),
    key_points: vec!["Error occurred during processing".into()],
    next_steps: vec!["Please rephrase your question and try again".into()],
    resources: vec!["Check your connection and retry".into()],
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn catalog() -> ContentCatalog { ContentCatalog::builtin().unwrap() }

  #[test]
  fn blockchain_template_regardless_of_level_and_style() {
    let c = catalog();
    for level in ProficiencyLevel::ALL {
      for style in LearningStyle::ALL {
        let b = explain(&c, "What is Blockchain?", level, style);
        assert!(b.explanation.starts_with("Blockchain is a distributed ledger technology"));
        assert!(b.explanation.contains(level.complexity_phrase()));
        assert!(b.explanation.contains(style.delivery_phrase()));
        assert_eq!(b.key_points[0], "Decentralized network of computers");
        assert_eq!(b.resources.len(), 3);
      }
    }
  }

  #[test]
  fn unmatched_topic_is_substituted_everywhere() {
    let b = explain(&catalog(), "Volcanoes", ProficiencyLevel::Beginner, LearningStyle::Visual);
    assert!(b.explanation.contains("Volcanoes"));
    assert_eq!(b.key_points.len(), 4);
    assert!(b.key_points.iter().all(|s| s.contains("Volcanoes")));
    assert!(b.next_steps.iter().all(|s| s.contains("Volcanoes")));
    assert!(b.resources.iter().all(|s| s.contains("Volcanoes")));
    assert_eq!(
      b.explanation,
      "Let me help you learn about Volcanoes. simple terms with basic examples with diagrams, charts, and visual metaphors."
    );
  }

  #[test]
  fn advanced_kinesthetic_programming() {
    let b = explain(&catalog(), "coding", ProficiencyLevel::Advanced, LearningStyle::Kinesthetic);
    assert_eq!(
      b.explanation,
      "Programming is the process of creating instructions for computers to follow. detailed technical depth with complex examples with hands-on activities and practical exercises."
    );
  }

  #[test]
  fn degraded_bundle_mentions_topic() {
    let b = degraded_bundle("rust");
    assert!(b.explanation.contains("rust"));
    assert_eq!(b.key_points, vec!["Error occurred during processing".to_string()]);
  }
}
