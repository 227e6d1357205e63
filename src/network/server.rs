//! TCP Server
//!
//! Accepts connections and dispatches each to its own handler thread.

use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::Result;
use crate::network::Connection;

/// TCP server for ScoreKV
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
}

impl Server {
    /// Bind the listen address and prepare to serve.
    pub fn bind(config: Config, engine: Arc<Engine>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr)?;
        Ok(Self {
            config,
            engine,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// The actually bound address (useful when binding port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// A handle that makes `run` stop accepting new connections.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Accept connections until shutdown (blocking).
    ///
    /// Each accepted connection gets its own thread; connections past
    /// the configured cap are dropped after a warning.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            "Listening on {} (max {} connections)",
            self.listener.local_addr()?,
            self.config.max_connections
        );

        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::Relaxed) {
                tracing::info!("Shutdown requested, no longer accepting connections");
                break;
            }

            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::warn!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            if self.active.load(Ordering::Relaxed) >= self.config.max_connections {
                tracing::warn!(
                    "Connection limit reached ({}), refusing client",
                    self.config.max_connections
                );
                drop(stream);
                continue;
            }

            let engine = Arc::clone(&self.engine);
            let active = Arc::clone(&self.active);
            let read_timeout_ms = self.config.read_timeout_ms;
            let write_timeout_ms = self.config.write_timeout_ms;

            active.fetch_add(1, Ordering::Relaxed);
            thread::spawn(move || {
                let result = Connection::new(stream, engine).and_then(|mut conn| {
                    conn.set_timeouts(read_timeout_ms, write_timeout_ms)?;
                    conn.handle()
                });
                if let Err(e) = result {
                    tracing::warn!("Connection ended with error: {}", e);
                }
                active.fetch_sub(1, Ordering::Relaxed);
            });
        }

        Ok(())
    }
}
