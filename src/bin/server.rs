//! ScoreKV Server Binary
//!
//! Starts the TCP server for ScoreKV.

use std::sync::Arc;

use clap::Parser;
use scorekv::network::Server;
use scorekv::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// ScoreKV Server
#[derive(Parser, Debug)]
#[command(name = "scorekv-server")]
#[command(about = "In-memory score-indexed ordered container store")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7379")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Connection write timeout in milliseconds (0 disables it)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,scorekv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("ScoreKV Server v{}", scorekv::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    let engine = Arc::new(Engine::new());

    // Start server
    let mut server = match Server::bind(config, engine) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", args.listen, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
