//! Audioshare — storage bootstrap
//!
//! Loads configuration, brings the database schema up to date and makes sure
//! the configured administrator exists.
//!
//! ```sh
//! # Default config (~/.config/audioshare/config.toml)
//! audioshare
//!
//! # Validate config and exit
//! audioshare --config ./config.toml --check
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use audioshare::config::{resolve_config, ConfigSource};
use audioshare::{
    default_config_path, init_database_with_migrations, BcryptCredentialVerifier,
    IdentityService, SeaOrmRepositoryProvider,
};

#[derive(Parser, Debug)]
#[command(name = "audioshare", version, about = "Audio sharing service storage bootstrap")]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "AUDIOSHARE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit.
    #[arg(long)]
    check: bool,
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let (mut config, source) = match resolve_config(&config_path) {
        Ok(resolved) => resolved,
        Err(e) => {
            init_tracing(cli.log_level.as_deref().unwrap_or("info"));
            error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.check {
        println!("Configuration is valid");
        match source {
            ConfigSource::File => println!("   Config file : {}", config_path.display()),
            ConfigSource::Defaults => {
                println!("   Config file : {} (not found, defaults)", config_path.display())
            }
        }
        println!("   Database    : {}", config.database.url);
        println!("   Favourites  : {}", config.playlists.favourites_default_name);
        println!("   Audio dir   : {}", config.storage.audio_dir.display());
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_tracing(&config.logging.level);

    match source {
        ConfigSource::File => info!("Configuration loaded from {}", config_path.display()),
        ConfigSource::Defaults => warn!(
            "No config file at {}, using default configuration",
            config_path.display()
        ),
    }

    // ── Database ───────────────────────────────────────────────
    let db = match init_database_with_migrations(&config.database_config()).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to prepare database: {}", e);
            return Err(e.into());
        }
    };
    let repos = Arc::new(SeaOrmRepositoryProvider::new(db));

    // ── Audio storage ──────────────────────────────────────────
    tokio::fs::create_dir_all(&config.storage.audio_dir).await?;
    info!(audio_dir = %config.storage.audio_dir.display(), "Audio storage ready");

    // ── Bootstrap administrator ────────────────────────────────
    let identity = IdentityService::builder()
        .repositories(repos)
        .credentials(Arc::new(BcryptCredentialVerifier::new(
            config.security.bcrypt_cost,
        )))
        .favourites_name(config.playlists.favourites_default_name.clone())
        .build()?;

    match &config.admin {
        Some(admin) => {
            let user = identity
                .register_admin(&admin.username, &admin.email, &admin.password)
                .await?;
            info!(user_id = %user.id, email = %user.email, "Administrator available");
        }
        None => info!("No [admin] section configured, skipping bootstrap administrator"),
    }

    info!("Audioshare storage is ready");
    Ok(())
}
