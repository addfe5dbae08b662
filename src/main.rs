//! Redirect service.
//!
//! ```text
//!     Client Request ──▶ trace / request id ──▶ redirect middleware ──▶ 404 fallback
//!                                                    │
//!                                                    ▼
//!                                   sanitize → match → resolve → loop guard
//!                                                    │
//!     Client Response ◀── 30x Location / debug report ┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use redirect_engine::config::load_config;
use redirect_engine::config::watcher::ConfigWatcher;
use redirect_engine::lifecycle::{shutdown_signal, Shutdown};
use redirect_engine::observability::{logging, metrics};
use redirect_engine::HttpServer;

#[derive(Parser)]
#[command(name = "redirect-engine")]
#[command(about = "Serve HTTP redirects from an ordered rule list", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "redirects.toml")]
    config: PathBuf,

    /// Reload the configuration when the file changes
    #[arg(short, long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        site = %config.site.base_url,
        redirects = config.redirects.len(),
        debug = config.site.debug,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    // Dropping the watcher closes the update channel when not watching
    let (watcher, config_updates) = ConfigWatcher::new(&args.config);
    let _watch_handle = if args.watch { Some(watcher.run()?) } else { None };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
