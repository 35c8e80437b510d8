//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 参加成功時に guest へ joined_room、host へ player_joined がちょうど 1 通ずつ届くことを保証
//! - 参加失敗時に要求元へ error が 1 通届き、どのルームも変更されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：空きのあるルームへの参加
//! - 異常系：存在しないルーム、満員のルーム、割り当て済みの接続
//! - エッジケース：不正な形式のルームコード

use std::sync::Arc;

use crate::domain::{
    Connection, ConnectionId, MessagePusher, Notification, RepositoryError, Role, RoomId,
    RoomRepository,
};

use super::error::JoinRoomError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `connection` - 参加する接続
    /// * `room_id` - クライアントが送ってきたルームコード（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(RoomId)` - 参加したルームのコード
    /// * `Err(JoinRoomError)` - 参加失敗（状態は変更されない）
    pub async fn execute(
        &self,
        connection: &mut Connection,
        room_id: &str,
    ) -> Result<RoomId, JoinRoomError> {
        match self.join(connection, room_id).await {
            Ok((room_id, host)) => {
                self.push(connection, &connection.id, Notification::JoinedRoom)
                    .await;
                self.push(connection, &host, Notification::PlayerJoined)
                    .await;
                Ok(room_id)
            }
            Err(e) => {
                tracing::info!(
                    "Connection '{}' failed to join room '{}': {}",
                    connection.id,
                    room_id,
                    e
                );
                self.push(
                    connection,
                    &connection.id,
                    Notification::Error {
                        message: e.to_string(),
                    },
                )
                .await;
                Err(e)
            }
        }
    }

    async fn join(
        &self,
        connection: &mut Connection,
        room_id: &str,
    ) -> Result<(RoomId, ConnectionId), JoinRoomError> {
        // 1. 割り当て済みの接続は拒否
        connection
            .ensure_unbound()
            .map_err(|_| JoinRoomError::AlreadyInRoom)?;

        // 2. 形式の不正なコードは存在しないルームとして扱う
        let room_id = RoomId::try_from(room_id)
            .map_err(|_| JoinRoomError::RoomNotFound(room_id.to_string()))?;

        // 3. Repository 経由で guest 枠を確保（確認と更新は 1 回の排他区間で行われる）
        let room = self
            .repository
            .join_room(&room_id, connection.id)
            .await
            .map_err(|e| match e {
                RepositoryError::RoomFull(id) => JoinRoomError::RoomFull(id),
                RepositoryError::RoomNotFound(id) => JoinRoomError::RoomNotFound(id),
                RepositoryError::RoomIdExhausted(_) => {
                    JoinRoomError::RoomNotFound(room_id.as_str().to_string())
                }
            })?;

        // 4. 接続を guest として割り当て
        connection
            .bind(room.id.clone(), Role::Guest)
            .map_err(|_| JoinRoomError::AlreadyInRoom)?;

        tracing::info!("Connection '{}' joined room '{}'", connection.id, room.id);
        Ok((room.id, room.host))
    }

    async fn push(
        &self,
        connection: &Connection,
        target: &ConnectionId,
        notification: Notification,
    ) {
        if let Err(e) = self.message_pusher.push_to(target, notification).await {
            tracing::warn!(
                "Failed to notify '{}' about join by '{}': {}",
                target,
                connection.id,
                e
            );
        }
    }
}
