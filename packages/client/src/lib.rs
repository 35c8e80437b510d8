//! Terminal client for the Kakehashi relay.
//!
//! Plays either side of a room: `host` creates a room and prints its code,
//! `join` enters an existing room. Typed lines are relayed to the other player.

pub mod domain;
pub mod error;
pub mod formatter;
mod session;
mod ui;

pub use domain::SessionMode;
pub use error::ClientError;
pub use session::run_client_session;
