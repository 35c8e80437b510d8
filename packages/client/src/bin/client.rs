//! Terminal client for the two-player room relay.
//!
//! `host` creates a room and prints the code to share; `join` enters a room
//! with a code. Each typed line is sent to the other player as a game action.
//! The client exits when joining fails or the host leaves.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kakehashi-client -- host
//! cargo run --bin kakehashi-client -- --url ws://192.168.1.10:3001 join abc123
//! ```

use clap::{Parser, Subcommand};

use kakehashi_client::{SessionMode, run_client_session};
use kakehashi_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kakehashi-client")]
#[command(about = "Terminal client for the two-player room relay", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3001")]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a room and wait for the other player
    Host,
    /// Join an existing room by its code
    Join {
        /// Room code shared by the host
        room_id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let mode = match args.command {
        Command::Host => SessionMode::Host,
        Command::Join { room_id } => SessionMode::Join(room_id),
    };

    if let Err(e) = run_client_session(&args.url, mode).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
