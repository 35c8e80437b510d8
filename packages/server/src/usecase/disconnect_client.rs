//! UseCase: クライアント切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - host が切断したらルームが削除され、guest に host_disconnected が届くことを保証
//! - guest が切断したらルームは残り、host に guest_disconnected が届くことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：host / guest の切断
//! - エッジケース：ルームに属していない接続の切断、guest のいないルームの host の切断

use std::sync::Arc;

use crate::domain::{Connection, MessagePusher, Notification, Role, RoomRepository};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// 正常な切断と異常切断を区別しない。
    ///
    /// # Returns
    ///
    /// 切断した接続が持っていた役割（ルームに属していなければ `None`）
    pub async fn execute(&self, connection: &Connection) -> Option<Role> {
        // 1. 以後この接続には送信しない
        self.message_pusher.unregister_client(&connection.id).await;

        let binding = connection.binding()?;
        match binding.role {
            // 2a. host: ルームごと削除し、guest に通知
            Role::Host => {
                let Some(room) = self.repository.remove_room(&binding.room_id).await else {
                    return Some(Role::Host);
                };
                tracing::info!(
                    "Host '{}' left, room '{}' closed",
                    connection.id,
                    room.id
                );
                if let Some(guest) = room.guest {
                    if let Err(e) = self
                        .message_pusher
                        .push_to(&guest, Notification::HostDisconnected)
                        .await
                    {
                        tracing::debug!("Could not notify guest '{}': {}", guest, e);
                    }
                }
            }
            // 2b. guest: guest 枠だけ空け、host に通知
            Role::Guest => {
                let Some(room) = self
                    .repository
                    .remove_guest(&binding.room_id, &connection.id)
                    .await
                else {
                    return Some(Role::Guest);
                };
                tracing::info!(
                    "Guest '{}' left room '{}', room is open again",
                    connection.id,
                    room.id
                );
                if let Err(e) = self
                    .message_pusher
                    .push_to(&room.host, Notification::GuestDisconnected)
                    .await
                {
                    tracing::debug!("Could not notify host '{}': {}", room.host, e);
                }
            }
        }

        Some(binding.role)
    }
}
