//! UseCase: ルーム作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 作成者が host として登録され、ルームコードが通知されることを保証
//! - 既にルームに属している接続が 2 つ目のルームを作れないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：未割り当ての接続によるルーム作成
//! - 異常系：割り当て済みの接続による作成
//! - エッジケース：ルームコードの払い出しに失敗

use std::sync::Arc;

use kakehashi_shared::time::Clock;

use crate::domain::{
    Connection, MessagePusher, Notification, RepositoryError, Role, RoomId, RoomRepository,
    Timestamp,
};

use super::error::CreateRoomError;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 作成時刻の取得元
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// ルーム作成を実行
    ///
    /// 成功時は `room_created` を、失敗時は `error` を要求元に送る。
    ///
    /// # Returns
    ///
    /// * `Ok(RoomId)` - 作成したルームのコード
    /// * `Err(CreateRoomError)` - 作成失敗（状態は変更されない）
    pub async fn execute(&self, connection: &mut Connection) -> Result<RoomId, CreateRoomError> {
        let result = self.create(connection).await;

        let notification = match &result {
            Ok(room_id) => Notification::RoomCreated {
                room_id: room_id.clone(),
            },
            Err(e) => Notification::Error {
                message: e.to_string(),
            },
        };
        if let Err(e) = self.message_pusher.push_to(&connection.id, notification).await {
            tracing::warn!(
                "Failed to reply to create_room from '{}': {}",
                connection.id,
                e
            );
        }

        result
    }

    async fn create(&self, connection: &mut Connection) -> Result<RoomId, CreateRoomError> {
        // 1. 割り当て済みの接続は拒否
        connection
            .ensure_unbound()
            .map_err(|_| CreateRoomError::AlreadyInRoom)?;

        // 2. Repository にルームを登録
        let created_at = Timestamp::new(self.clock.now_millis());
        let room = self
            .repository
            .create_room(connection.id, created_at)
            .await
            .map_err(|e| match e {
                RepositoryError::RoomIdExhausted(_) => CreateRoomError::RoomIdExhausted,
                other => {
                    tracing::error!("Unexpected repository error on create_room: {}", other);
                    CreateRoomError::RoomIdExhausted
                }
            })?;

        // 3. 接続を host として割り当て
        connection
            .bind(room.id.clone(), Role::Host)
            .map_err(|_| CreateRoomError::AlreadyInRoom)?;

        tracing::info!("Room '{}' created by '{}'", room.id, connection.id);
        Ok(room.id)
    }
}
