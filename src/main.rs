//! QR code generation service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ ┌──────────┐    ┌──────────────┐    ┌──────────────┐
//!                     │  http    │───▶│ qr::options  │───▶│qr::dispatcher│
//!                     │ handlers │    │  validate    │    │   render     │
//!     Client Response └──────────┘    └──────────────┘    └──────┬───────┘
//!     ◀──────────────      ▲                                     │
//!                          │                                     ▼
//!                          │                             ┌──────────────┐
//!                          └──── JSON / image bytes ─────│ qr::renderer │
//!                                                        │ (qrcode+png) │
//!                                                        └──────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use qr_service::config::resolve_config;
use qr_service::http::HttpServer;
use qr_service::lifecycle::{signals, Shutdown};
use qr_service::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "qr-service")]
#[command(about = "HTTP service that renders URLs as QR codes", long_about = None)]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "QR_SERVICE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(args.config.as_deref())?;

    logging::init_logging(&config.observability);

    tracing::info!("qr-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        request_timeout_secs = config.timeouts.request_secs,
        render_timeout_secs = config.render.timeout_secs,
        public_dir = %config.service.public_dir,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Address already checked by config validation.
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
