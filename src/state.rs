//! Application state: settings, the frozen content catalog, the response composer,
//! and the agent bridge.
//!
//! Nothing in here is mutated after startup. Learner progress is never stored; the
//! caller re-supplies the lesson stage on every request.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::agent::AgentBridge;
use crate::catalog::ContentCatalog;
use crate::composer::{ResponseComposer, TextGenerator};
use crate::config::{load_agent_config_from_env, AgentConfig, Settings};
use crate::error::StartupError;
use crate::openai::OpenAI;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub catalog: ContentCatalog,
    pub composer: ResponseComposer,
    pub bridge: AgentBridge,
}

impl AppState {
    /// Build state from env: settings, optional TOML config, optional OpenAI client.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Result<Self, StartupError> {
        let settings = Settings::from_env()?;
        let cfg = load_agent_config_from_env().unwrap_or_default();

        let generator: Option<Arc<dyn TextGenerator>> = match OpenAI::from_env() {
            Some(oa) => {
                info!(target: "superlearn_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
                Some(Arc::new(oa))
            }
            None => {
                info!(target: "superlearn_backend", "OpenAI disabled (no OPENAI_API_KEY). Mentor replies use the fallback text.");
                None
            }
        };

        Self::new(settings, cfg, generator)
    }

    /// Assemble state from explicit parts. A catalog supplied in `cfg` replaces the
    /// built-in one and is validated here.
    pub fn new(
        settings: Settings,
        cfg: AgentConfig,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Result<Self, StartupError> {
        let catalog = match cfg.catalog {
            Some(entries) => ContentCatalog::new(entries)?,
            None => ContentCatalog::builtin()?,
        };
        let composer = ResponseComposer::new(generator, cfg.prompts.mentor_system).with_deadline(settings.agent_timeout);
        let bridge = AgentBridge::new(&settings)?;

        info!(
            target: "superlearn_backend",
            bridge_mode = ?settings.bridge_mode,
            agent_url = %settings.agent_url,
            catalog_entries = catalog.entries().len(),
            generation = composer.is_enabled(),
            "Application state ready"
        );

        Ok(Self { settings, catalog, composer, bridge })
    }
}
