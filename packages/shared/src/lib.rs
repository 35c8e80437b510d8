//! Utilities shared by the Kakehashi relay server and client.

pub mod logger;
pub mod time;
