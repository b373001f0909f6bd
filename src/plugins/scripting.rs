use std::fs;
use std::path::{Path, PathBuf};

use super::PluginError;
use crate::app::App;
use crate::hooks::HookHandler;

// ============================================================================
// Scripting Runtime Plugin
// ============================================================================
//
// Registers the hot-reloadable JS hook runtime. The runtime itself lives
// outside this crate; registration validates the pool configuration, scans
// the hooks directory for sources and reports at serve time what was picked
// up.
//
// ============================================================================

/// Extension claimed by app hook scripts.
const HOOKS_EXT: &str = ".sb.js";
/// Extension claimed by JS migration sources.
const MIGRATIONS_EXT: &str = ".js";

#[derive(Debug, Clone)]
pub struct ScriptingConfig {
    /// Directory with the JS app hooks; `None` disables script loading.
    pub hooks_dir: Option<PathBuf>,
    /// Restart the app when a hook source changes.
    pub hooks_watch: bool,
    /// Prewarmed runtime instances for hook execution.
    pub hooks_pool: usize,
    /// Directory with JS migration sources handed to the runtime.
    pub migrations_dir: Option<PathBuf>,
}

pub fn register(app: &mut App, config: ScriptingConfig) -> Result<(), PluginError> {
    if config.hooks_pool == 0 {
        return Err(PluginError::Config("hooksPool must be at least 1".into()));
    }

    let scripts = match &config.hooks_dir {
        Some(dir) => scan_sources(dir, HOOKS_EXT)?,
        None => Vec::new(),
    };
    let migrations = match &config.migrations_dir {
        Some(dir) => scan_sources(dir, MIGRATIONS_EXT)?,
        None => Vec::new(),
    };

    app.on_serve().bind(HookHandler {
        id: "scripting-runtime",
        priority: 0,
        func: Box::new(move |event| {
            if scripts.is_empty() && migrations.is_empty() {
                tracing::debug!("no app hook scripts registered");
            } else {
                tracing::info!(
                    scripts = scripts.len(),
                    migrations = migrations.len(),
                    pool = config.hooks_pool,
                    watch = config.hooks_watch,
                    "app hook scripts loaded"
                );
            }
            event.next();
            Ok(())
        }),
    });

    Ok(())
}

/// A missing source dir means nothing to load; an unreadable one is a
/// configuration error.
fn scan_sources(dir: &Path, ext: &str) -> Result<Vec<PathBuf>, PluginError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut sources = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.ends_with(ext))
            .unwrap_or(false);
        if path.is_file() && matches {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}
