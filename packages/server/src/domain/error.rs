//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクト生成時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("room id is too long ({actual} > {max} characters)")]
    RoomIdTooLong { max: usize, actual: usize },

    #[error("room id contains a non-alphanumeric character: {0:?}")]
    InvalidRoomIdCharacter(char),
}

/// Room エンティティの操作エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room already has a guest")]
    RoomFull,
}

/// Connection エンティティの操作エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("connection is already bound to room '{0}'")]
    AlreadyBound(String),
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("room '{0}' is full")]
    RoomFull(String),

    #[error("could not generate a unique room id after {0} attempts")]
    RoomIdExhausted(usize),
}

/// MessagePusher 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("send queue of client '{0}' is full")]
    QueueFull(String),

    #[error("failed to serialize message: {0}")]
    SerializationFailed(String),
}
