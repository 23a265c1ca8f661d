//! Runtime configuration.
//!
//! Two sources:
//! - environment variables for the process (`Settings`)
//! - an optional TOML file at AGENT_CONFIG_PATH for prompts and a replacement catalog (`AgentConfig`)

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

use crate::catalog::CatalogEntry;
use crate::error::ConfigError;

/// Whether `/learn` and `/quiz` answer locally or go through a downstream agent first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BridgeMode {
  #[default]
  Local,
  Forward,
}

impl FromStr for BridgeMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "local" => Ok(BridgeMode::Local),
      "forward" => Ok(BridgeMode::Forward),
      other => Err(format!("'{other}' is not one of local, forward")),
    }
  }
}

#[derive(Clone, Debug)]
pub struct Settings {
  pub port: u16,
  pub agent_url: String,
  pub agent_status_url: String,
  pub agent_timeout: Duration,
  pub status_timeout: Duration,
  pub bridge_mode: BridgeMode,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      port: 8001,
      agent_url: "http://localhost:8002/submit".into(),
      agent_status_url: "http://localhost:8002".into(),
      agent_timeout: Duration::from_secs(30),
      status_timeout: Duration::from_secs(5),
      bridge_mode: BridgeMode::Local,
    }
  }
}

impl Settings {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  /// Build settings from any variable source; unset variables keep their defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let defaults = Self::default();
    let timeout_secs: u64 = parse_var(&lookup, "AGENT_TIMEOUT_SECS", defaults.agent_timeout.as_secs())?;
    if timeout_secs == 0 {
      return Err(ConfigError::InvalidValue("AGENT_TIMEOUT_SECS".into(), "'0': must be at least 1 second".into()));
    }
    Ok(Self {
      port: parse_var(&lookup, "PORT", defaults.port)?,
      agent_url: lookup("AGENT_URL").unwrap_or(defaults.agent_url),
      agent_status_url: lookup("AGENT_STATUS_URL").unwrap_or(defaults.agent_status_url),
      agent_timeout: Duration::from_secs(timeout_secs),
      status_timeout: defaults.status_timeout,
      bridge_mode: parse_var(&lookup, "BRIDGE_MODE", defaults.bridge_mode)?,
    })
  }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T, ConfigError>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match lookup(name) {
    None => Ok(default),
    Some(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("'{raw}': {e}"))),
  }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AgentConfig {
  #[serde(default)]
  pub prompts: Prompts,
  /// Replaces the built-in catalog when present.
  #[serde(default)]
  pub catalog: Option<Vec<CatalogEntry>>,
}

/// Prompts used by the text generator. Override in TOML to tune tone/structure.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  /// System instruction for mentor replies; `{lesson_context}` is substituted.
  pub mentor_system: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      mentor_system: r#"You are a friendly AI mentor teaching kids (ages 10-16) about cryptocurrency and blockchain technology.

TEACHING CONTEXT: {lesson_context}

GUIDELINES:
- Use simple, age-appropriate language
- Make complex concepts fun and relatable
- Encourage questions and exploration
- Keep responses to 2-3 sentences max
- Use encouraging, positive tone
- Relate crypto concepts to familiar things (like digital games, apps, etc.)
- Focus on practical learning through doing
- Always emphasize safety and that we're using "practice money"

CURRENT LESSON FOCUS: Help them understand the current step and guide them to the next action."#
        .into(),
    }
  }
}

/// Attempt to load `AgentConfig` from AGENT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_agent_config_from_env() -> Option<AgentConfig> {
  let path = std::env::var("AGENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AgentConfig>(&s) {
      Ok(cfg) => {
        info!(target: "superlearn_backend", %path, custom_catalog = cfg.catalog.is_some(), "Loaded agent config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "superlearn_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "superlearn_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
