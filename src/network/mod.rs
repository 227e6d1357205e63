//! Network Module
//!
//! TCP server and per-connection handling.

mod connection;
mod server;

pub use connection::Connection;
pub use server::Server;
