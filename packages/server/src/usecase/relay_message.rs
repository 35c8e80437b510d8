//! UseCase: ゲームメッセージの中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::relay_action() / relay_state() メソッド
//!
//! ### なぜこのテストが必要か
//! - ペイロードが解釈されずにそのまま相手に届くことを保証
//! - game_state がルームの共有状態として保存されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：host → guest、guest → host の中継
//! - エッジケース：相手がいない（送信者には何も通知しない）
//! - 異常系：ルームに属していない接続、閉じたルームに残った guest

use std::sync::Arc;

use crate::domain::{
    Connection, ConnectionId, MessagePushError, MessagePusher, Notification, Payload, Room,
    RoomId, RoomRepository,
};

use super::error::RelayError;

/// ゲームメッセージ中継のユースケース
pub struct RelayMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayMessageUseCase {
    /// 新しい RelayMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// game_action を相手に中継
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 相手に届けた
    /// * `Ok(false)` - 相手がいないため破棄した
    /// * `Err(RelayError)` - 送信者がルームに属していない
    pub async fn relay_action(
        &self,
        sender: &Connection,
        data: Option<Payload>,
    ) -> Result<bool, RelayError> {
        let room = self.current_room(sender).await?;
        Ok(self
            .forward(&room, &sender.id, Notification::GameAction { data })
            .await)
    }

    /// game_state をルームに保存し、相手に中継
    ///
    /// 戻り値は `relay_action` と同じ。
    pub async fn relay_state(
        &self,
        sender: &Connection,
        state: Option<Payload>,
    ) -> Result<bool, RelayError> {
        let room_id = Self::binding_room(sender)?;
        let room = self
            .repository
            .update_game_state(&room_id, &sender.id, state.clone())
            .await
            .ok_or_else(|| RelayError::RoomClosed(room_id.as_str().to_string()))?;
        Ok(self
            .forward(&room, &sender.id, Notification::GameState { state })
            .await)
    }

    fn binding_room(sender: &Connection) -> Result<RoomId, RelayError> {
        sender
            .binding()
            .map(|binding| binding.room_id.clone())
            .ok_or(RelayError::NotInRoom)
    }

    async fn current_room(&self, sender: &Connection) -> Result<Room, RelayError> {
        let room_id = Self::binding_room(sender)?;
        self.repository
            .get_room(&room_id)
            .await
            .filter(|room| room.role_of(&sender.id).is_some())
            .ok_or_else(|| RelayError::RoomClosed(room_id.into_string()))
    }

    /// 相手がいれば送信する。相手がいない・送信できない場合は破棄する
    async fn forward(&self, room: &Room, from: &ConnectionId, notification: Notification) -> bool {
        let Some(target) = room.counterpart_of(from) else {
            tracing::debug!(
                "No peer in room '{}' for message from '{}', dropping",
                room.id,
                from
            );
            return false;
        };

        match self.message_pusher.push_to(&target, notification).await {
            Ok(()) => true,
            Err(MessagePushError::ClientNotFound(_)) => {
                tracing::debug!("Peer '{}' already gone, dropping message", target);
                false
            }
            Err(e) => {
                tracing::warn!("Failed to relay message to '{}': {}", target, e);
                false
            }
        }
    }
}
