//! Roster CLI server
//!
//! Users / groups REST API suitable for deployment as a systemd service,
//! Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/roster/config.toml)
//! roster-service
//!
//! # Custom config path
//! roster-service --config /etc/roster/config.toml
//!
//! # Override the port
//! roster-service --port 8080
//!
//! # Validate config without starting
//! roster-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use roster::config::AppConfig;
use roster::server::{init_tracing, ServerHandle, ServerOptions};

/// Roster: users, groups and memberships over REST.
#[derive(Parser, Debug)]
#[command(
    name = "roster-service",
    version,
    about = "REST API for managing users, groups and memberships",
    long_about = "Roster: authenticated REST API for users, groups and \
                  the memberships between them.\n\n\
                  Default config: ~/.config/roster/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "ROSTER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(roster::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) if cli.check => {
            eprintln!("❌ Invalid configuration: {}", e);
            return Err(e.into());
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        config.validate()?;
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // Init tracing first so subsequent logs are formatted properly
    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    // Wait for shutdown signal, then clean up
    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
