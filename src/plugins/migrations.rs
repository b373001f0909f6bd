use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::PluginError;
use crate::app::App;
use crate::hooks::{HookError, HookHandler};

// ============================================================================
// Migrations Plugin
// ============================================================================
//
// Wires the `migrate create` subcommand and, with automigrate enabled,
// reports the user migration files picked up at serve time. Diffing and
// execution of migrations stay with the storage layer.
//
// ============================================================================

const TEMPLATE: &str = "migrate((app) => {\n  // add up queries...\n}, (app) => {\n  // add down queries...\n});\n";

#[derive(Debug, Clone)]
pub struct MigrationsConfig {
    /// Directory with the user defined migrations; `None` disables them.
    pub dir: Option<PathBuf>,
    /// Report pending user migrations at serve time.
    pub automigrate: bool,
}

pub fn register(app: &mut App, config: &MigrationsConfig) -> Result<(), PluginError> {
    if !config.automigrate {
        tracing::debug!("automigrate disabled");
        return Ok(());
    }

    // Listed at serve time so the server picks up files created after
    // registration; an unreadable dir aborts startup through the hook chain.
    let dir = config.dir.clone();
    app.on_serve().bind(HookHandler {
        id: "migrations",
        priority: 0,
        func: Box::new(move |event| {
            let pending = match &dir {
                Some(dir) => list_migrations(dir)
                    .map_err(|err| HookError::Handler(format!("migrations: {err}")))?,
                None => Vec::new(),
            };
            if pending.is_empty() {
                tracing::debug!("no user migrations found");
            } else {
                tracing::info!(
                    migrations = pending.len(),
                    "user migrations picked up; execution is handled by the storage layer"
                );
            }
            event.next();
            Ok(())
        }),
    });

    Ok(())
}

/// Scaffold a blank timestamped migration file in the configured dir.
pub fn create(config: &MigrationsConfig, name: &str) -> Result<PathBuf, PluginError> {
    let dir = config
        .dir
        .clone()
        .ok_or_else(|| PluginError::Config("migrationsDir is not configured".into()))?;

    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}_{}.js", Utc::now().timestamp(), slug));
    fs::write(&path, TEMPLATE)?;

    Ok(path)
}

fn list_migrations(dir: &Path) -> Result<Vec<PathBuf>, PluginError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut migrations = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_migration = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext == "js")
            .unwrap_or(false);
        if path.is_file() && is_migration {
            migrations.push(path);
        }
    }
    migrations.sort();
    Ok(migrations)
}
