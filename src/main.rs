//! Hotel reservation server
//!
//! ```sh
//! # Default config (~/.config/hotel-reservations/config.toml)
//! hotel-reservations
//!
//! # Custom config path and port
//! hotel-reservations --config /etc/hotel/config.toml --port 9000
//!
//! # Validate config without starting
//! hotel-reservations --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use hotel_reservations::config::AppConfig;
use hotel_reservations::server::{init_tracing, run, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "hotel-reservations",
    version,
    about = "Hotel room reservation service",
    long_about = "REST API for hotel room reservations with double-booking \
                  prevention and booking emails.\n\n\
                  Default config: ~/.config/hotel-reservations/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "HOTEL_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
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
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(hotel_reservations::default_config_path);

    // The log level override has to be applied before tracing starts
    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            if cli.check {
                return Err(e.into());
            }
            error!("Using default configuration.");
        }
    }

    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }

    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}:{}", config.server.host, config.server.port);
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        println!("   Mail        : {}", if config.mail.enabled { "smtp" } else { "log" });
        println!("   Seed rooms  : {}", config.rooms.len());
        return Ok(());
    }

    run(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await
}
