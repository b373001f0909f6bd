use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod app;
mod config;
mod hooks;
mod metrics;
mod plugins;
mod records;
mod router;
mod shop;

use app::App;
use config::{Cli, Command, MigrateAction};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,shopbase=debug")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    tracing::info!("🛒 Starting shopbase e-commerce backend");

    let mut app = App::new(config.clone())?;

    // === Plugins ===
    // Each plugin wires its own hooks; a misconfigured plugin is a fatal
    // startup error, never a degraded mode.
    plugins::must_register(
        "scripting",
        plugins::scripting::register(
            &mut app,
            plugins::scripting::ScriptingConfig {
                hooks_dir: config.hooks_dir.clone(),
                hooks_watch: config.hooks_watch,
                hooks_pool: config.hooks_pool,
                migrations_dir: config.migrations_dir.clone(),
            },
        ),
    );

    let migrations_config = plugins::migrations::MigrationsConfig {
        dir: config.migrations_dir.clone(),
        automigrate: config.automigrate,
    };
    plugins::must_register(
        "migrations",
        plugins::migrations::register(&mut app, &migrations_config),
    );

    let update_config = plugins::update::UpdateConfig::default();
    plugins::must_register(
        "update",
        plugins::update::register(&mut app, &update_config),
    );

    // === Shop hooks and routes ===
    shop::orders::register(&mut app);
    shop::inventory::register(&mut app);
    shop::static_files::register(&mut app);

    match cli.command {
        Some(Command::Migrate {
            action: MigrateAction::Create { name },
        }) => {
            let path = plugins::migrations::create(&migrations_config, &name)?;
            tracing::info!(path = %path.display(), "✅ Created new migration");
        }
        Some(Command::Update) => plugins::update::check(&update_config),
        Some(Command::Serve) | None => app.serve().await?,
    }

    Ok(())
}
