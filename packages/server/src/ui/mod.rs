//! Relay server UI layer: axum router, WebSocket and HTTP handlers.

mod handler;
pub mod network;
mod server;
mod signal;
pub mod state;

pub use server::Server;
