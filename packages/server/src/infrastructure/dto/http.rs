//! HTTP API response DTOs.

use serde::Serialize;
use serde_json::value::RawValue;

/// Entry of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub has_guest: bool,
    /// RFC 3339
    pub created_at: String,
}

/// Body of `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub has_guest: bool,
    /// Last shared game state, as sent by the players
    pub game_state: Option<Box<RawValue>>,
    /// RFC 3339
    pub created_at: String,
}
