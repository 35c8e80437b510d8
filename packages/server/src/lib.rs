//! Two-player room relay server library.
//!
//! A host creates a room and receives a short room code, a guest joins with
//! that code, and from then on every game message one peer sends is relayed
//! verbatim to the other.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
