//! Session configuration.
//!
//! Loaded from TOML; every field is optional and falls back to
//! [`SessionConfig::default`].
//!
//! ```toml
//! session_id = "goblin-ambush"
//! seed = 42
//! default_speed = 30
//! verify_replay = true
//! ```

use std::path::Path;

use combat_core::{CombatConfig, SessionId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid session config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("session_id must not be empty")]
    EmptySessionId,
}

/// Parameters of one combat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub session_id: String,
    /// Seed of the session's dice stream.
    pub seed: u64,
    /// Speed given to combatants created without an explicit one.
    pub default_speed: u32,
    /// Re-fold every emitted batch of events and compare it with the state
    /// the transition produced.
    pub verify_replay: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: "default".to_string(),
            seed: 0,
            default_speed: CombatConfig::DEFAULT_SPEED,
            verify_replay: true,
        }
    }
}

impl SessionConfig {
    pub fn new(session_id: impl Into<String>, seed: u64) -> Self {
        Self {
            session_id: session_id.into(),
            seed,
            ..Self::default()
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_id.trim().is_empty() {
            return Err(ConfigError::EmptySessionId);
        }
        Ok(())
    }

    pub fn session_id(&self) -> SessionId {
        SessionId::new(self.session_id.clone())
    }

    pub fn combat_config(&self) -> CombatConfig {
        CombatConfig::with_default_speed(self.default_speed)
    }
}
