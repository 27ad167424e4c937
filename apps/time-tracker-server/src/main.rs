use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::sqlx::sqlite::SqlitePoolOptions;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, SqlxSqliteConnector};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use time_tracker::config::TimeTrackerConfig;
use time_tracker::TimeTracker;
use url::Url;

mod web;

const MODULE_NAME: &str = "time_tracker";
const MEMORY_DSN: &str = "sqlite::memory:";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
/// - Adds `mode=rwc` when no query is given so the file is created on first start.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if is_memory_dsn(dsn) {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push('?');
    out.push_str(query.unwrap_or("mode=rwc"));
    Ok(out)
}

fn is_memory_dsn(dsn: &str) -> bool {
    dsn.eq_ignore_ascii_case(MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:")
}

/// Time Tracker Server - work time accounting over HTTP
#[derive(Parser)]
#[command(name = "time-tracker-server")]
#[command(about = "Time Tracker Server - work time accounting over HTTP")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Time Tracker Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args),
    }
}

/// Detect DB backend from URL scheme (sqlite/postgres).
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if is_memory_dsn(raw) {
        return Ok("sqlite");
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Resolve the DSN the server will connect to; `--mock` always wins.
fn resolve_dsn(config: &AppConfig, args: &CliArgs) -> Result<String> {
    if args.mock {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("Database URL not configured"))?;
    detect_from_dsn(db_config)?;

    let dsn = db_config.url.trim().to_owned();
    if dsn.starts_with("sqlite") {
        absolutize_sqlite_dsn(&dsn, Path::new(&config.server.home_dir), true)
    } else {
        Ok(dsn)
    }
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let module_cfg: TimeTrackerConfig = config.module_config(MODULE_NAME)?;
    let dsn = resolve_dsn(&config, &args)?;

    let db_config = config.database.clone();
    let acquire_timeout = Duration::from_secs(
        db_config
            .as_ref()
            .and_then(|d| d.acquire_timeout_sec)
            .unwrap_or(5),
    );

    let db = if is_memory_dsn(&dsn) {
        tracing::info!("Using in-memory database");
        connect_memory(acquire_timeout).await?
    } else {
        let max_conns = db_config.as_ref().and_then(|d| d.max_conns).unwrap_or(10);
        let mut opts = ConnectOptions::new(dsn.clone());
        opts.max_connections(max_conns)
            .acquire_timeout(acquire_timeout)
            .sqlx_logging(false);

        tracing::info!(dsn = %dsn, max_conns, "Connecting to database");
        Database::connect(opts)
            .await
            .with_context(|| format!("Failed to connect to database '{dsn}'"))?
    };
    tracing::info!(backend = ?db.get_database_backend(), "Connected to database");

    TimeTracker::migrate(&db).await?;
    let module = TimeTracker::init(db, &module_cfg)?;
    tracing::info!(identity = %module_cfg.identity_base_url, "time_tracker module initialized");

    let router = web::build_router(&module, config.server.timeout_sec);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = runtime::shutdown::wait_for_shutdown().await {
                tracing::error!(error = %e, "failed to listen for shutdown signals");
            }
        })
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Open the in-memory database behind a single connection that is never reaped.
/// The data lives only as long as that connection, so the pool must not retire it.
async fn connect_memory(acquire_timeout: Duration) -> Result<DatabaseConnection> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .acquire_timeout(acquire_timeout)
        .connect(MEMORY_DSN)
        .await
        .context("Failed to open in-memory database")?;
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    if !args.mock {
        let db_config = config
            .database
            .as_ref()
            .ok_or_else(|| anyhow!("Database URL not configured"))?;
        let backend = detect_from_dsn(db_config)?;
        tracing::info!(backend, "Database configuration is valid");
    }

    let module_cfg: TimeTrackerConfig = config.module_config(MODULE_NAME)?;
    Url::parse(&module_cfg.identity_base_url).with_context(|| {
        format!(
            "Invalid identity_base_url '{}'",
            module_cfg.identity_base_url
        )
    })?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);

    Ok(())
}
