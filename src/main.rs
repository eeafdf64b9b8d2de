use clap::{Parser, Subcommand};
use std::fs;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use plugbridge::domain::traits::Host;
use plugbridge::infrastructure::adapters::console::{ConsoleDriver, ConsoleEvent};
use plugbridge::infrastructure::adapters::ConsoleHost;
use plugbridge::infrastructure::config::Config;
use plugbridge::infrastructure::storage::JsonStore;
use plugbridge::{BridgeContext, BridgeError};

#[derive(Parser)]
#[command(name = "plugbridge")]
#[command(about = "Shared command and player layer for game server plugins", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Player store path (overrides config)
    #[arg(short, long)]
    store: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a console-driven server session
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            if let Err(e) = run_console(cli.config, cli.store) {
                tracing::error!("Session ended with error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("plugbridge v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config(&cli.config);
        }
    }
}

fn load_config(config_path: &str) -> Config {
    if std::path::Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    }
}

fn run_console(config_path: String, store_override: Option<String>) -> Result<(), BridgeError> {
    let mut config = load_config(&config_path);
    if let Some(store) = store_override {
        config.storage.path = store.into();
    }

    tracing::info!("Starting plugbridge: {}", config.server.name);

    let storage = Box::new(JsonStore::new(config.storage.path.clone()));
    let host: Arc<dyn Host> = Arc::new(ConsoleHost::new());
    let mut ctx = BridgeContext::new(config, host, storage)?;
    ctx.on_server_initialized();

    // Host events are processed one at a time on this thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| BridgeError::Host(format!("Failed to start runtime: {}", e)))?;

    runtime.block_on(console_loop(&mut ctx))?;

    ctx.on_server_shutdown()?;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn console_loop(ctx: &mut BridgeContext) -> Result<(), BridgeError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut driver = ConsoleDriver::new();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, shutting down");
                return Ok(());
            }
            line = lines.next_line() => {
                let line = line.map_err(|e| BridgeError::Host(format!("Console read failed: {}", e)))?;
                let Some(line) = line else {
                    return Ok(());
                };
                match driver.handle(ctx, ConsoleEvent::parse(&line)) {
                    Ok(true) => {}
                    Ok(false) => return Ok(()),
                    Err(e) => tracing::warn!("Console command failed: {}", e),
                }
            }
        }
    }
}

fn init_config(path: &str) {
    let config = Config::default();
    match config.to_yaml() {
        Ok(yaml) => match fs::write(path, yaml) {
            Ok(()) => println!("Wrote default config to {}", path),
            Err(e) => eprintln!("Failed to write {}: {}", path, e),
        },
        Err(e) => eprintln!("{}", e),
    }
}
