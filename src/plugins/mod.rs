// ============================================================================
// Plugin Registrars
// ============================================================================
//
// Each plugin wires itself against the application handle at startup. A
// plugin either registers fully or the process exits: there is no partial
// plugin state and no runtime-degraded mode.
//
// ============================================================================

pub mod migrations;
pub mod scripting;
pub mod update;

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("invalid plugin configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fail-fast registration: a misconfigured plugin is a startup-time fatal
/// error the operator must fix before restart.
pub fn must_register(name: &str, result: Result<(), PluginError>) {
    if let Err(err) = result {
        tracing::error!(plugin = name, error = %err, "plugin registration failed");
        std::process::exit(1);
    }
}
