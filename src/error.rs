//! Error types. Only `ApiError` ever reaches a client; the others are recovered
//! locally (generation, bridge) or abort startup (config, catalog).

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;

/// An enum-like input that matched none of its variants.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unrecognized {field} '{value}'; expected one of {allowed}")]
pub struct UnknownVariant {
  pub field: &'static str,
  pub value: String,
  pub allowed: String,
}

impl UnknownVariant {
  pub fn new(field: &'static str, value: &str, allowed: &[&str]) -> Self {
    Self { field, value: value.to_string(), allowed: allowed.join(", ") }
  }
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("{0}")]
  Validation(String),
  #[error("{0}")]
  Internal(String),
}

impl From<UnknownVariant> for ApiError {
  fn from(e: UnknownVariant) -> Self { ApiError::Validation(e.to_string()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

/// Failures of the external text-generation service.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
  #[error("text generation is not configured")]
  NotConfigured,
  #[error("text generation timed out")]
  Timeout,
  #[error("OpenAI HTTP {status}: {message}")]
  Status { status: u16, message: String },
  #[error("transport error: {0}")]
  Transport(String),
  #[error("model returned an empty reply")]
  EmptyReply,
}

impl From<reqwest::Error> for GenerationError {
  fn from(e: reqwest::Error) -> Self {
    if e.is_timeout() { GenerationError::Timeout } else { GenerationError::Transport(e.to_string()) }
  }
}

/// Failures talking to a downstream agent process.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
  #[error("Agent request timed out")]
  Timeout,
  #[error("Agent returned status {0}")]
  Status(u16),
  #[error("Network error: {0}")]
  Network(String),
  #[error("Malformed agent reply: {0}")]
  Malformed(String),
  #[error("Agent replied with '{got}' where '{expected}' was expected")]
  UnexpectedReply { expected: &'static str, got: String },
}

impl From<reqwest::Error> for BridgeError {
  fn from(e: reqwest::Error) -> Self {
    if e.is_timeout() {
      BridgeError::Timeout
    } else if e.is_decode() {
      BridgeError::Malformed(e.to_string())
    } else {
      BridgeError::Network(e.to_string())
    }
  }
}

/// Static catalog data that breaks an invariant.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
  #[error("catalog entry '{entry}' has no keywords")]
  NoKeywords { entry: String },
  #[error("catalog entry '{entry}' ({difficulty}) question {index} has no options")]
  NoOptions { entry: String, difficulty: String, index: usize },
  #[error("catalog entry '{entry}' ({difficulty}) question {index}: correct index {correct} out of range for {options} options")]
  CorrectOutOfRange { entry: String, difficulty: String, index: usize, correct: usize, options: usize },
}

/// Environment values that could not be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for environment variable {0}: {1}")]
  InvalidValue(String, String),
}

/// Anything that stops the service from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error("invalid catalog: {0}")]
  Catalog(#[from] CatalogError),
  #[error("agent bridge: {0}")]
  Bridge(#[from] BridgeError),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validation_maps_to_400() {
    let resp = ApiError::Validation("Missing topic in request".into()).into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[test]
  fn internal_maps_to_500() {
    let resp = ApiError::Internal("boom".into()).into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn unknown_variant_message() {
    let e = UnknownVariant::new("user_level", "Expert", &["Beginner", "Advanced"]);
    assert_eq!(e.to_string(), "Unrecognized user_level 'Expert'; expected one of Beginner, Advanced");
  }
}
