//! Utility functions for xtask commands

use std::path::Path;

use anyhow::{Context, Result};
use combat_core::CombatEvent;
use combat_runtime::SessionConfig;
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber; `RUST_LOG` overrides the INFO default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn load_config(path: Option<&Path>) -> Result<Option<SessionConfig>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let config = SessionConfig::from_toml_file(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;
    tracing::debug!(session = %config.session_id, seed = config.seed, "config loaded");
    Ok(Some(config))
}

/// Reads a JSON array of events.
pub fn read_events(path: &Path) -> Result<Vec<CombatEvent>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event log: {}", path.display()))?;
    parse_events(&source).with_context(|| format!("Failed to parse event log: {}", path.display()))
}

pub fn parse_events(source: &str) -> Result<Vec<CombatEvent>> {
    Ok(serde_json::from_str(source)?)
}

/// Formats a byte count for display
pub fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
