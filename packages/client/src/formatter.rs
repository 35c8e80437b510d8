//! Message formatting utilities for client display.

use kakehashi_server::infrastructure::dto::websocket::ServerMessage;
use serde_json::value::RawValue;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a message received from the relay
    ///
    /// # Arguments
    ///
    /// * `message` - The decoded server message
    ///
    /// # Returns
    ///
    /// A formatted string ready to print
    pub fn format_server_message(message: &ServerMessage) -> String {
        match message {
            ServerMessage::RoomCreated { room_id } => Self::format_room_created(room_id),
            ServerMessage::JoinedRoom => "\n+ You joined the room\n".to_string(),
            ServerMessage::PlayerJoined => "\n+ The other player joined the room\n".to_string(),
            ServerMessage::GameAction { data } => {
                format!("\n@peer action: {}\n", Self::payload_text(data.as_deref()))
            }
            ServerMessage::GameState { state } => {
                format!("\n@peer state: {}\n", Self::payload_text(state.as_deref()))
            }
            ServerMessage::Error { message } => format!("\n! {}\n", message),
            ServerMessage::HostDisconnected => "\n- The host left, room closed\n".to_string(),
            ServerMessage::GuestDisconnected => {
                "\n- The guest left, waiting for another player\n".to_string()
            }
        }
    }

    /// Format the room-created banner showing the code to share
    pub fn format_room_created(room_id: &str) -> String {
        format!(
            "\n\n{}\nRoom code: {}\nShare this code with the other player.\n{}\n",
            RULE, room_id, RULE
        )
    }

    /// Format a text frame that could not be decoded
    pub fn format_raw_message(text: &str) -> String {
        format!("\n{}\n", text)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\nReceived binary data: {} bytes\n", byte_count)
    }

    /// Format a confirmation message after sending
    pub fn format_sent_confirmation(kind: &str) -> String {
        format!("sent {}\n", kind)
    }

    fn payload_text(payload: Option<&RawValue>) -> &str {
        payload.map(RawValue::get).unwrap_or("null")
    }
}
