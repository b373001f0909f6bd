use std::env;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

// ============================================================================
// Configuration - Immutable Startup Snapshot
// ============================================================================
//
// All options are parsed exactly once at process start. Malformed values
// fail through clap's own error path (usage message + exit). The resulting
// Config is passed by reference into every registrar; nothing mutates it
// afterwards, so it is safe to share across workers without synchronization.
//
// ============================================================================

/// Command line surface: global flags shared by every subcommand, plus the
/// optional subcommand itself (`serve` is the default).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "shopbase",
    version,
    about = "E-commerce backend with hook-driven extension points"
)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the web server (default when no subcommand is given)
    Serve,

    /// Migration utilities
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },

    /// Check whether a newer release is available
    Update,
}

#[derive(Subcommand, Debug, Clone)]
pub enum MigrateAction {
    /// Create a new blank migration file
    Create { name: String },
}

/// Immutable configuration snapshot for one process lifetime.
#[derive(clap::Args, Debug, Clone)]
pub struct Config {
    /// Stripe secret key for payment processing
    #[arg(long = "stripeKey", default_value = "")]
    pub stripe_key: String,

    /// The directory with the JS app hooks
    #[arg(long = "hooksDir")]
    pub hooks_dir: Option<PathBuf>,

    /// Auto restart the app on hook source change
    #[arg(long = "hooksWatch", default_value_t = true, action = ArgAction::Set)]
    pub hooks_watch: bool,

    /// Total prewarmed script runtime instances for hook execution
    #[arg(long = "hooksPool", default_value_t = 15)]
    pub hooks_pool: usize,

    /// The directory with the user defined migrations
    #[arg(long = "migrationsDir")]
    pub migrations_dir: Option<PathBuf>,

    /// Enable/disable auto migrations
    #[arg(long = "automigrate", default_value_t = true, action = ArgAction::Set)]
    pub automigrate: bool,

    /// The directory to serve static files from
    #[arg(long = "publicDir", default_value_os_t = default_public_dir())]
    pub public_dir: PathBuf,

    /// Fallback the request to index.html on missing static path
    #[arg(long = "indexFallback", default_value_t = true, action = ArgAction::Set)]
    pub index_fallback: bool,

    /// TCP address for the HTTP server
    #[arg(long = "http", default_value = "127.0.0.1:8090")]
    pub http: String,
}

/// Static asset root: next to the binary for release deployments, the
/// working tree when running out of a cargo build dir.
pub fn default_public_dir() -> PathBuf {
    if is_probably_cargo_run() {
        return PathBuf::from("./sb_public");
    }
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("sb_public")))
        .unwrap_or_else(|| PathBuf::from("./sb_public"))
}

fn is_probably_cargo_run() -> bool {
    env::current_exe()
        .map(|exe| exe.components().any(|c| c.as_os_str() == "target"))
        .unwrap_or(false)
}
