use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use marquee::api::CatalogClient;
use marquee::app::{App, AppEvent, DisplaySettings};
use marquee::catalog::{load_catalog, Section};
use marquee::config::{Config, ConfigError, TOKEN_ENV_VAR};
use marquee::ui;

/// Get the config directory path (~/.config/marquee/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("marquee");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(name = "marquee", about = "Browse movies and TV shows from the terminal")]
struct Args {
    /// Config file (default: ~/.config/marquee/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the API base URL (e.g. a local mock server)
    #[arg(long, value_name = "URL")]
    api_base_url: Option<String>,

    /// Load the catalog once, print per-section counts and exit
    #[arg(long)]
    check: bool,
}

/// Log to a file when RUST_LOG is set; the TUI owns stdout.
fn init_tracing(config_dir: &std::path::Path) -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let log_path = config_dir.join("marquee.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    // Config dir may hold the API token; keep it user-only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = std::fs::metadata(&config_dir) {
            let mut perms = metadata.permissions();
            perms.set_mode(0o700);
            if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                eprintln!(
                    "Warning: failed to restrict permissions on {}: {}",
                    config_dir.display(),
                    e
                );
            }
        }
    }

    init_tracing(&config_dir)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if let Some(url) = args.api_base_url {
        config.api_base_url = url;
    }
    tracing::debug!(config = ?config, "Resolved configuration");

    let token = match config.resolve_token(std::env::var(TOKEN_ENV_VAR).ok()) {
        Ok(token) => token,
        Err(ConfigError::MissingToken) => {
            eprintln!("Error: no API token configured.");
            eprintln!();
            eprintln!("Set the {} environment variable:", TOKEN_ENV_VAR);
            eprintln!("  export {}=<your read access token>", TOKEN_ENV_VAR);
            eprintln!();
            eprintln!("or add `api_token = \"...\"` to {}", config_path.display());
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let client = Arc::new(
        CatalogClient::new(config.api_config(token)).context("Failed to create API client")?,
    );

    if args.check {
        let snapshot = load_catalog(&client)
            .await
            .context("Failed to load catalog")?;
        println!("genres: {}", snapshot.genres.len());
        for section in Section::ALL {
            println!("{}: {}", section.label(), snapshot.section(section).len());
        }
        return Ok(());
    }

    let mut app = App::new(client, DisplaySettings::from_config(&config));

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
