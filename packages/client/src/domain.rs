//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use kakehashi_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage};
use serde_json::value::RawValue;

use crate::error::ClientError;

/// Which side of the room this client plays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    /// Create a new room
    Host,
    /// Join the room with the given code
    Join(String),
}

impl SessionMode {
    /// The message sent right after connecting
    pub fn opening_message(&self) -> ClientMessage {
        match self {
            SessionMode::Host => ClientMessage::CreateRoom,
            SessionMode::Join(room_id) => ClientMessage::JoinRoom {
                room_id: room_id.clone(),
            },
        }
    }

    /// Prompt shown in front of the input line
    pub fn prompt(&self) -> &'static str {
        match self {
            SessionMode::Host => "host> ",
            SessionMode::Join(_) => "guest> ",
        }
    }
}

/// One line typed by the user
#[derive(Debug)]
pub enum InputCommand {
    /// Send a `game_action` with this payload
    Action(Box<RawValue>),
    /// Send a `game_state` with this payload
    State(Box<RawValue>),
    /// Leave the room
    Quit,
}

impl InputCommand {
    /// Wire message for this command (`None` for `Quit`)
    pub fn into_message(self) -> Option<ClientMessage> {
        match self {
            InputCommand::Action(data) => Some(ClientMessage::GameAction { data: Some(data) }),
            InputCommand::State(state) => Some(ClientMessage::GameState { state: Some(state) }),
            InputCommand::Quit => None,
        }
    }
}

/// Parse one input line.
///
/// * `/quit` leaves the room.
/// * `/state <json>` sends a game state; the argument must be valid JSON.
/// * Anything else is a game action. Valid JSON is sent as is, any other
///   text is sent as a JSON string.
pub fn parse_input(line: &str) -> Result<InputCommand, ClientError> {
    let line = line.trim();

    if line == "/quit" {
        return Ok(InputCommand::Quit);
    }

    let state_arg = if line == "/state" {
        Some("")
    } else {
        line.strip_prefix("/state ")
    };
    if let Some(rest) = state_arg {
        let rest = rest.trim();
        if rest.is_empty() {
            return Err(ClientError::InvalidInput(
                "usage: /state <json>".to_string(),
            ));
        }
        let state = serde_json::from_str::<Box<RawValue>>(rest)
            .map_err(|e| ClientError::InvalidInput(format!("state is not valid JSON: {}", e)))?;
        return Ok(InputCommand::State(state));
    }

    if let Ok(data) = serde_json::from_str::<Box<RawValue>>(line) {
        return Ok(InputCommand::Action(data));
    }

    let quoted = serde_json::to_string(line)
        .map_err(|e| ClientError::InvalidInput(e.to_string()))?;
    let data =
        RawValue::from_string(quoted).map_err(|e| ClientError::InvalidInput(e.to_string()))?;
    Ok(InputCommand::Action(data))
}

/// Tracks whether the client has made it into a room.
#[derive(Debug)]
pub struct SessionState {
    in_room: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self { in_room: false }
    }

    pub fn in_room(&self) -> bool {
        self.in_room
    }

    /// Apply one server message.
    ///
    /// Returns an error when the session cannot continue: the room could not
    /// be created or joined, or the host left.
    pub fn on_message(&mut self, message: &ServerMessage) -> Result<(), ClientError> {
        match message {
            ServerMessage::RoomCreated { .. } | ServerMessage::JoinedRoom => {
                self.in_room = true;
                Ok(())
            }
            ServerMessage::Error { message } if !self.in_room => {
                Err(ClientError::Rejected(message.clone()))
            }
            ServerMessage::HostDisconnected => Err(ClientError::HostDisconnected),
            _ => Ok(()),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
