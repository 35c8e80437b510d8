//! UseCase 層のエラー型
//!
//! `Display` の文字列はそのまま `error` メッセージとしてクライアントに送られる。

use thiserror::Error;

/// ルーム作成のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("Already in a room")]
    AlreadyInRoom,

    #[error("Could not allocate a room code, please try again")]
    RoomIdExhausted,
}

/// ルーム参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("Already in a room")]
    AlreadyInRoom,

    #[error("Room not found")]
    RoomNotFound(String),

    #[error("Room is full")]
    RoomFull(String),
}

/// 中継のエラー（いずれも送信者には通知しない）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("connection is not in a room")]
    NotInRoom,

    #[error("room '{0}' no longer exists")]
    RoomClosed(String),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}
