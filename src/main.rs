use clap::Parser;
use std::sync::Arc;
use tokio::sync::Notify;

use docs_proxy::config::{AppState, Config};
use docs_proxy::logger;
use docs_proxy::server::{self, signal};
use docs_proxy::storage::{self, StorageBackend};

/// Serve versioned documentation assets from local or remote storage
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Configuration file path (extension optional)
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let cfg = Config::load_from(&args.config)?;
    cfg.validate()?;
    if args.check {
        println!("Configuration OK");
        return Ok(());
    }

    logger::init(&cfg)?;

    let backend = storage::build_backend(&cfg.storage)?;

    // Create Tokio runtime, sizing worker threads from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, backend))
}

async fn async_main(
    cfg: Config,
    backend: Arc<dyn StorageBackend>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    logger::log_server_start(&addr, &cfg, &backend.describe());
    let state = Arc::new(AppState::new(cfg, backend));

    let shutdown = Arc::new(Notify::new());
    signal::start_signal_handler(Arc::clone(&state), Arc::clone(&shutdown))?;

    server::start_server_loop(listener, state, shutdown).await?;
    logger::log_info("Docs proxy stopped");
    Ok(())
}
