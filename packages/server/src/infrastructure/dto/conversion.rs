//! Conversion logic between DTOs and domain entities.

use kakehashi_shared::time::timestamp_to_rfc3339;

use crate::domain::{Notification, Payload, Room};
use crate::infrastructure::dto::{
    http::{RoomDetailDto, RoomSummaryDto},
    websocket::ServerMessage,
};

// ========================================
// Domain → WebSocket DTO
// ========================================

impl From<Notification> for ServerMessage {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::RoomCreated { room_id } => Self::RoomCreated {
                room_id: room_id.into_string(),
            },
            Notification::JoinedRoom => Self::JoinedRoom,
            Notification::PlayerJoined => Self::PlayerJoined,
            Notification::GameAction { data } => Self::GameAction {
                data: data.map(Payload::into_raw),
            },
            Notification::GameState { state } => Self::GameState {
                state: state.map(Payload::into_raw),
            },
            Notification::Error { message } => Self::Error { message },
            Notification::HostDisconnected => Self::HostDisconnected,
            Notification::GuestDisconnected => Self::GuestDisconnected,
        }
    }
}

// ========================================
// Domain → HTTP DTO
// ========================================

impl From<Room> for RoomSummaryDto {
    fn from(room: Room) -> Self {
        Self {
            has_guest: room.has_guest(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
            id: room.id.into_string(),
        }
    }
}

impl From<Room> for RoomDetailDto {
    fn from(room: Room) -> Self {
        Self {
            has_guest: room.has_guest(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
            game_state: room.game_state.map(Payload::into_raw),
            id: room.id.into_string(),
        }
    }
}
