// src/state.rs
use std::sync::Arc;

use crate::config::{Config, ConfigError, ResponderKind};
use crate::services::Responder;
use crate::services::agent::LocalAgent;
use crate::services::gemini::GeminiResponder;

pub type SharedState = Arc<AppState>;

/// Built once at startup and only read afterwards.
pub struct AppState {
    pub responder: Arc<dyn Responder>,
}

impl AppState {
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self { responder }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let responder: Arc<dyn Responder> = match config.responder {
            ResponderKind::Agent => Arc::new(LocalAgent::new()),
            ResponderKind::Gemini => {
                let gemini = config
                    .gemini
                    .clone()
                    .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;
                Arc::new(GeminiResponder::new(gemini))
            }
        };
        Ok(Self::new(responder))
    }
}
