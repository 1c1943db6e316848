use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use clap::{Parser, Subcommand};
use employees::EmployeesModule;
use modkit_db::{resolve_sqlite_dsn, ConnectOpts, DbEngine, DbHandle};
use runtime::{AppConfig, CliArgs, DatabaseConfig, ServerConfig};

const API_INGRESS_MODULE: &str = "api_ingress";

/// Employees Server - CRUD REST service for employee records
#[derive(Parser)]
#[command(name = "employees-server")]
#[command(about = "Employees Server - CRUD REST service for employee records")]
#[command(version)]
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

    /// Use in-memory SQLite instead of the configured database
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
    tracing::info!("Employees Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr> {
    let raw = format!("{}:{}", server.host, server.port);
    raw.parse()
        .map_err(|e| anyhow!("invalid bind address '{}': {}", raw, e))
}

fn database_config(config: &AppConfig) -> Result<&DatabaseConfig> {
    let db = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("Database configuration is required"))?;
    if db.url.trim().is_empty() {
        bail!("Database URL not configured");
    }
    Ok(db)
}

/// Open the pool; relative sqlite paths resolve against `home_dir`.
async fn connect_db(cfg: &DatabaseConfig, home_dir: &Path) -> Result<DbHandle> {
    let raw = cfg.url.trim();
    let engine = DbHandle::detect(raw)?;
    let dsn = match engine {
        DbEngine::Sqlite => resolve_sqlite_dsn(raw, home_dir, true)
            .with_context(|| format!("failed to resolve sqlite DSN '{raw}'"))?,
        DbEngine::Postgres => raw.to_string(),
    };

    let opts = ConnectOpts {
        max_conns: cfg.max_conns,
        acquire_timeout: Some(Duration::from_secs(5)),
        sqlite_busy_timeout: cfg
            .busy_timeout_ms
            .map(|ms| Duration::from_millis(u64::from(ms))),
    };

    tracing::info!(engine = ?engine, "Connecting to database");
    let db = DbHandle::connect(&dsn, opts)
        .await
        .context("failed to connect to database")?;
    tracing::info!("Connected DB backend: {:?}", db.engine());
    Ok(db)
}

async fn run_server(config: AppConfig) -> Result<()> {
    let addr = bind_addr(&config.server)?;
    let ingress_cfg: ApiIngressConfig = config.module_config(API_INGRESS_MODULE)?;
    let db_cfg = database_config(&config)?;

    let db = connect_db(db_cfg, Path::new(&config.server.home_dir)).await?;

    tracing::info!("Initializing modules...");
    let employees = EmployeesModule::init(db.sea()).await?;

    let ingress = ApiIngress::new(ingress_cfg)
        .with_request_timeout(Duration::from_secs(config.server.timeout_sec));
    ingress.register_openapi(EmployeesModule::openapi());
    let router = ingress.build_router(employees.register_rest(axum::Router::new()));

    let cancel = modkit::shutdown_token();
    let served = ingress.serve(addr, router, cancel).await;

    db.close().await;
    tracing::info!("Employees Server stopped");
    served
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    bind_addr(&config.server)?;
    let db_cfg = database_config(config)?;
    DbHandle::detect(db_cfg.url.trim())?;
    let _: ApiIngressConfig = config.module_config(API_INGRESS_MODULE)?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
