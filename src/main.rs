use advisord::ai::client::HostedModelClient;
use advisord::config::AppConfig;
use advisord::storage::{seed::seed_demo_data, Storage};
use advisord::{rest, AppContext};
use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "advisord",
    about = "Consulting back-office service — records, reports, AI-assisted flows",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// REST server port
    #[arg(long, env = "ADVISORD_PORT")]
    port: Option<u16>,

    /// Data directory for the config file and SQLite database
    #[arg(long, env = "ADVISORD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ADVISORD_LOG")]
    log: Option<String>,

    /// Bind address for the REST server (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "ADVISORD_BIND")]
    bind_address: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "ADVISORD_LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST server (default when no subcommand given).
    ///
    /// Examples:
    ///   advisord serve
    ///   advisord
    Serve,
    /// Insert the demo dataset into the database.
    ///
    /// Meant for a fresh data dir — seeding twice duplicates records.
    Seed,
    /// Print the effective configuration and exit.
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Arc::new(AppConfig::new(
        args.port,
        args.data_dir,
        args.log,
        args.bind_address,
    ));

    init_tracing(&config, args.log_file.as_deref());

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Seed => {
            let storage = Storage::open(&config.data_dir)
                .await
                .context("open database")?;
            let count = seed_demo_data(&storage).await?;
            println!("seeded {count} records into {}", config.data_dir.display());
            Ok(())
        }
        Command::Config => {
            println!("{config:#?}");
            Ok(())
        }
    }
}

async fn serve(config: Arc<AppConfig>) -> Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.data_dir.display(),
        "advisord starting"
    );

    let storage = Arc::new(
        Storage::open(&config.data_dir)
            .await
            .context("open database")?,
    );

    if config.ai_api_key.is_none() {
        tracing::warn!("ADVISORD_AI_KEY is not set — AI flow endpoints will answer 502");
    }
    let model = Arc::new(
        HostedModelClient::new(&config.ai, config.ai_api_key.clone())
            .context("build model gateway client")?,
    );

    let ctx = Arc::new(AppContext::new(config, storage, model));
    rest::start_rest_server(ctx).await
}

fn init_tracing(config: &AppConfig, log_file: Option<&std::path::Path>) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_new(&config.log).unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "advisord.log".to_string());
        let appender = tracing_appender::rolling::daily(dir, file);
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(false).with_writer(appender))
            .init();
    } else if config.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
