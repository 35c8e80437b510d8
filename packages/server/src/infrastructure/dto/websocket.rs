//! WebSocket message DTOs.
//!
//! Every message is a JSON object with a `type` discriminator. Game payloads
//! (`data`, `state`) are held as [`RawValue`] and never parsed, so they are
//! forwarded byte-for-byte.
//!
//! Parsing splits the object into raw top-level fields first, reads `type`,
//! and then only looks at the fields that type uses. Unrelated fields are
//! ignored whatever their JSON type.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::value::RawValue;
use thiserror::Error;

/// Errors raised while decoding a wire message
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("message has no string 'type' field")]
    MissingType,

    #[error("unknown message type '{0}'")]
    UnknownType(String),

    #[error("message type '{kind}' requires field '{field}'")]
    MissingField { kind: String, field: &'static str },
}

/// Top-level fields of a message, each kept as raw JSON
struct Envelope {
    kind: String,
    fields: HashMap<String, Box<RawValue>>,
}

impl Envelope {
    fn parse(text: &str) -> Result<Self, ProtocolError> {
        let mut fields: HashMap<String, Box<RawValue>> = serde_json::from_str(text)?;
        let kind = fields
            .remove("type")
            .and_then(|raw| serde_json::from_str::<String>(raw.get()).ok())
            .ok_or(ProtocolError::MissingType)?;
        Ok(Self { kind, fields })
    }

    /// Payload field as sent; `None` only when the key is absent
    fn take_raw(&mut self, field: &str) -> Option<Box<RawValue>> {
        self.fields.remove(field)
    }

    /// String field; absent and non-string values both give `None`
    fn take_string(&mut self, field: &str) -> Option<String> {
        self.fields
            .remove(field)
            .and_then(|raw| serde_json::from_str::<String>(raw.get()).ok())
    }
}

/// Client → server messages
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    CreateRoom,
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    GameAction {
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<Box<RawValue>>,
    },
    GameState {
        #[serde(skip_serializing_if = "Option::is_none")]
        state: Option<Box<RawValue>>,
    },
}

impl ClientMessage {
    /// Decode a text frame sent by a client.
    ///
    /// `join_room` without a string `roomId` decodes to an empty room id,
    /// which the relay then reports as a missing room.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let mut envelope = Envelope::parse(text)?;
        match envelope.kind.as_str() {
            "create_room" => Ok(Self::CreateRoom),
            "join_room" => Ok(Self::JoinRoom {
                room_id: envelope.take_string("roomId").unwrap_or_default(),
            }),
            "game_action" => Ok(Self::GameAction {
                data: envelope.take_raw("data"),
            }),
            "game_state" => Ok(Self::GameState {
                state: envelope.take_raw("state"),
            }),
            _ => Err(ProtocolError::UnknownType(envelope.kind)),
        }
    }

    /// The `type` discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateRoom => "create_room",
            Self::JoinRoom { .. } => "join_room",
            Self::GameAction { .. } => "game_action",
            Self::GameState { .. } => "game_state",
        }
    }
}

/// Server → client messages
///
/// A payload that was absent on the way in stays absent on the way out.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    RoomCreated {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    JoinedRoom,
    PlayerJoined,
    GameAction {
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<Box<RawValue>>,
    },
    GameState {
        #[serde(skip_serializing_if = "Option::is_none")]
        state: Option<Box<RawValue>>,
    },
    Error {
        message: String,
    },
    HostDisconnected,
    GuestDisconnected,
}

impl ServerMessage {
    /// Decode a text frame sent by the relay.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let mut envelope = Envelope::parse(text)?;
        match envelope.kind.as_str() {
            "room_created" => {
                let room_id =
                    envelope
                        .take_string("roomId")
                        .ok_or_else(|| ProtocolError::MissingField {
                            kind: envelope.kind.clone(),
                            field: "roomId",
                        })?;
                Ok(Self::RoomCreated { room_id })
            }
            "joined_room" => Ok(Self::JoinedRoom),
            "player_joined" => Ok(Self::PlayerJoined),
            "game_action" => Ok(Self::GameAction {
                data: envelope.take_raw("data"),
            }),
            "game_state" => Ok(Self::GameState {
                state: envelope.take_raw("state"),
            }),
            "error" => Ok(Self::Error {
                message: envelope.take_string("message").unwrap_or_default(),
            }),
            "host_disconnected" => Ok(Self::HostDisconnected),
            "guest_disconnected" => Ok(Self::GuestDisconnected),
            _ => Err(ProtocolError::UnknownType(envelope.kind)),
        }
    }

    /// The `type` discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RoomCreated { .. } => "room_created",
            Self::JoinedRoom => "joined_room",
            Self::PlayerJoined => "player_joined",
            Self::GameAction { .. } => "game_action",
            Self::GameState { .. } => "game_state",
            Self::Error { .. } => "error",
            Self::HostDisconnected => "host_disconnected",
            Self::GuestDisconnected => "guest_disconnected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_room() {
        // テスト項目: create_room を解析できる
        // given (前提条件):
        let text = r#"{"type":"create_room"}"#;

        // when (操作):
        let result = ClientMessage::parse(text);

        // then (期待する結果):
        assert!(matches!(result, Ok(ClientMessage::CreateRoom)));
    }

    #[test]
    fn test_parse_join_room() {
        // テスト項目: join_room の roomId を取り出せる
        // given (前提条件):
        let text = r#"{"type":"join_room","roomId":"ab12cd"}"#;

        // when (操作):
        let result = ClientMessage::parse(text).unwrap();

        // then (期待する結果):
        match result {
            ClientMessage::JoinRoom { room_id } => assert_eq!(room_id, "ab12cd"),
            other => panic!("expected JoinRoom, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_join_room_without_room_id() {
        // テスト項目: roomId のない join_room は空のルームコードとして扱われる
        // given (前提条件):
        let text = r#"{"type":"join_room"}"#;

        // when (操作):
        let result = ClientMessage::parse(text).unwrap();

        // then (期待する結果):
        assert!(matches!(result, ClientMessage::JoinRoom { room_id } if room_id.is_empty()));
    }

    #[test]
    fn test_parse_game_action_keeps_payload_verbatim() {
        // テスト項目: game_action の data は書式を含めてそのまま保持される
        // given (前提条件):
        let text = r#"{"type":"game_action","data":{ "answer" : [1, 2,3] }}"#;

        // when (操作):
        let result = ClientMessage::parse(text).unwrap();

        // then (期待する結果):
        match result {
            ClientMessage::GameAction { data } => {
                assert_eq!(data.unwrap().get(), r#"{ "answer" : [1, 2,3] }"#)
            }
            other => panic!("expected GameAction, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_game_state_null_and_absent() {
        // テスト項目: state が null の場合は null のまま保持され、state がない場合は空になる
        // given (前提条件):
        let with_null = r#"{"type":"game_state","state":null}"#;
        let absent = r#"{"type":"game_state"}"#;

        // when (操作):
        let with_null = ClientMessage::parse(with_null).unwrap();
        let absent = ClientMessage::parse(absent).unwrap();

        // then (期待する結果):
        match with_null {
            ClientMessage::GameState { state } => assert_eq!(state.unwrap().get(), "null"),
            other => panic!("expected GameState, got {other:?}"),
        }
        assert!(matches!(absent, ClientMessage::GameState { state: None }));
    }

    #[test]
    fn test_parse_ignores_unrelated_fields_of_any_type() {
        // テスト項目: その type が使わないフィールドは、JSON の型にかかわらず無視される
        // given (前提条件):
        let create = r#"{"type":"create_room","roomId":7}"#;
        let action = r#"{"type":"game_action","data":{"x":1},"message":42,"state":[true]}"#;

        // when (操作):
        let create = ClientMessage::parse(create);
        let action = ClientMessage::parse(action).unwrap();

        // then (期待する結果):
        assert!(matches!(create, Ok(ClientMessage::CreateRoom)));
        match action {
            ClientMessage::GameAction { data } => assert_eq!(data.unwrap().get(), r#"{"x":1}"#),
            other => panic!("expected GameAction, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_join_room_with_non_string_room_id() {
        // テスト項目: roomId が文字列でない join_room は空のルームコードとして扱われる
        // given (前提条件):
        let text = r#"{"type":"join_room","roomId":123456}"#;

        // when (操作):
        let result = ClientMessage::parse(text).unwrap();

        // then (期待する結果):
        assert!(matches!(result, ClientMessage::JoinRoom { room_id } if room_id.is_empty()));
    }

    #[test]
    fn test_parse_unknown_type() {
        // テスト項目: 未知の type はエラーになる
        // given (前提条件):
        let text = r#"{"type":"dance"}"#;

        // when (操作):
        let result = ClientMessage::parse(text);

        // then (期待する結果):
        assert!(matches!(result, Err(ProtocolError::UnknownType(kind)) if kind == "dance"));
    }

    #[test]
    fn test_parse_malformed_json() {
        // テスト項目: JSON オブジェクトでないテキストや、文字列の type を持たないオブジェクトはエラーになる
        // given (前提条件):
        let not_json = "hello";
        let not_object = "[1,2]";
        let no_type = r#"{"roomId":"ab12cd"}"#;
        let numeric_type = r#"{"type":5}"#;

        // when (操作):
        let result1 = ClientMessage::parse(not_json);
        let result2 = ClientMessage::parse(not_object);
        let result3 = ClientMessage::parse(no_type);
        let result4 = ClientMessage::parse(numeric_type);

        // then (期待する結果):
        assert!(matches!(result1, Err(ProtocolError::Malformed(_))));
        assert!(matches!(result2, Err(ProtocolError::Malformed(_))));
        assert!(matches!(result3, Err(ProtocolError::MissingType)));
        assert!(matches!(result4, Err(ProtocolError::MissingType)));
    }

    #[test]
    fn test_serialize_server_messages() {
        // テスト項目: サーバーメッセージが仕様どおりの JSON になる
        // given (前提条件):
        let messages = vec![
            ServerMessage::RoomCreated {
                room_id: "ab12cd".to_string(),
            },
            ServerMessage::JoinedRoom,
            ServerMessage::Error {
                message: "Room not found".to_string(),
            },
            ServerMessage::GameState { state: None },
            ServerMessage::HostDisconnected,
        ];

        // when (操作):
        let json: Vec<String> = messages
            .iter()
            .map(|m| serde_json::to_string(m).unwrap())
            .collect();

        // then (期待する結果):
        assert_eq!(json[0], r#"{"type":"room_created","roomId":"ab12cd"}"#);
        assert_eq!(json[1], r#"{"type":"joined_room"}"#);
        assert_eq!(json[2], r#"{"type":"error","message":"Room not found"}"#);
        assert_eq!(json[3], r#"{"type":"game_state"}"#);
        assert_eq!(json[4], r#"{"type":"host_disconnected"}"#);
    }

    #[test]
    fn test_client_message_serialize_then_parse() {
        // テスト項目: クライアントが送る JSON をサーバーが解析できる
        // given (前提条件):
        let message = ClientMessage::JoinRoom {
            room_id: "ab12cd".to_string(),
        };

        // when (操作):
        let json = serde_json::to_string(&message).unwrap();
        let parsed = ClientMessage::parse(&json).unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"type":"join_room","roomId":"ab12cd"}"#);
        assert_eq!(parsed.kind(), "join_room");
    }

    #[test]
    fn test_parse_server_error_message() {
        // テスト項目: クライアント側で error メッセージを解析できる
        // given (前提条件):
        let text = r#"{"type":"error","message":"Room is full"}"#;

        // when (操作):
        let result = ServerMessage::parse(text).unwrap();

        // then (期待する結果):
        assert!(matches!(result, ServerMessage::Error { message } if message == "Room is full"));
    }

    #[test]
    fn test_parse_room_created_requires_room_id() {
        // テスト項目: roomId のない room_created はエラーになる
        // given (前提条件):
        let text = r#"{"type":"room_created"}"#;

        // when (操作):
        let result = ServerMessage::parse(text);

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(ProtocolError::MissingField { field: "roomId", .. })
        ));
    }
}
