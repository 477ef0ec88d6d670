//! # castview server
//!
//! Overview of the videos in an Opencast series and the LMS courses that
//! embed them as activities.
//!
//! The server is built on Axum and uses:
//! - the Opencast External API for series and event metadata
//! - PostgreSQL for the LMS activity tables (optional)

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, anyhow};
use castview_config::{Config, ConfigLoad, ConfigLoader};
use castview_core::database::{self, PostgresActivityStore};
use castview_server::{
    AppState,
    infra::{activities::ActivityPorts, instances::InstanceRegistry},
    routes,
};
use clap::{Args as ClapArgs, Parser, Subcommand};
use sqlx::PgPool;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "castview-server")]
#[command(about = "Overview of Opencast series videos and the courses embedding them")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "CASTVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // Override via RUST_LOG.
                "info,castview=info,tower_http=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_runtime_config(&cli.serve)?;

    match cli.command {
        Some(Command::Db(DbCommand::Migrate)) => run_db_migrate(&config).await,
        None => run_server(config).await,
    }
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Arc<Config>> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_config_path(path.clone());
    }

    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => {
                warn!(message = %warning.message, "configuration warning")
            }
        }
    }

    Ok(Arc::new(config))
}

async fn connect_database(config: &Config) -> anyhow::Result<Option<PgPool>> {
    let Some(url) = config.database.url.as_deref() else {
        return Ok(None);
    };

    let pool = database::connect(url, config.database.max_connections)
        .await
        .context("failed to connect to PostgreSQL")?;
    Ok(Some(pool))
}

async fn run_db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = connect_database(config)
        .await?
        .ok_or_else(|| anyhow!("DATABASE_URL is not configured"))?;
    database::migrate(&pool)
        .await
        .context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_server(config: Arc<Config>) -> anyhow::Result<()> {
    let postgres = connect_database(&config).await?;
    if let Some(pool) = &postgres {
        database::migrate(pool)
            .await
            .context("database migration failed")?;
    }

    let activities = match &postgres {
        Some(pool) => {
            let store = Arc::new(PostgresActivityStore::new(
                pool.clone(),
                config.lms.base_url.clone(),
            ));
            ActivityPorts::postgres(store, config.activities.enabled)
        }
        None => {
            if config.activities.enabled {
                warn!("activities enabled but no database configured; activity columns stay empty");
            }
            ActivityPorts::disabled()
        }
    };
    info!(enabled = activities.is_enabled(), "activity lookups configured");

    let registry = InstanceRegistry::from_config(&config.opencast)
        .context("failed to set up Opencast clients")?;
    info!(
        instances = registry.len(),
        default = %registry.default_instance().id,
        "Opencast instances ready"
    );

    let state = AppState::new(registry, activities, postgres);
    let app = routes::create_app_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "castview server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
