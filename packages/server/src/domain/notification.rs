//! クライアントへ通知するイベント
//!
//! ワイヤ形式（JSON）への変換は Infrastructure 層の DTO が担当する。

use super::value_object::{Payload, RoomId};

/// サーバーからクライアントへの通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// ルーム作成完了（作成者へ）
    RoomCreated { room_id: RoomId },
    /// ルーム参加完了（参加者へ）
    JoinedRoom,
    /// guest が参加した（host へ）
    PlayerJoined,
    /// 相手から中継されたゲーム操作
    GameAction { data: Option<Payload> },
    /// 相手から中継されたゲーム状態
    GameState { state: Option<Payload> },
    /// 要求の失敗
    Error { message: String },
    HostDisconnected,
    GuestDisconnected,
}
