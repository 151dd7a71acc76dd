//! State fingerprints for logging and replay comparison.

use combat_core::RoundState;

/// Full hex-encoded state root.
pub fn state_root_hex(state: &RoundState) -> Result<String, bincode::Error> {
    Ok(hex::encode(state.state_root()?))
}

/// First 8 bytes of the state root, for compact log lines.
pub fn short_root(state: &RoundState) -> String {
    match state.state_root() {
        Ok(root) => hex::encode(&root[..8]),
        Err(_) => "unavailable".to_string(),
    }
}
