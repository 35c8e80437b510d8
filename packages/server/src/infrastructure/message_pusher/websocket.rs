//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの上限付き `Sender` を管理
//! - ドメインの `Notification` を JSON にしてクライアントへ送信
//!
//! ## 設計ノート
//!
//! WebSocket の受付は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `Sender` を受け取り、メッセージ送信に使用します。
//! 送信は `try_send` で行い、キューが満杯なら待たずに破棄する。
//! 送信チャンネルは接続ごとに 1 本なので、同じ相手への送信順は保たれる。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, Notification, PusherChannel},
    infrastructure::dto::websocket::ServerMessage,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new(Arc::new(Mutex::new(HashMap::new())));
/// pusher.register_client(connection_id, tx).await;
/// pusher.push_to(&connection_id, Notification::JoinedRoom).await?;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: Notification,
    ) -> Result<(), MessagePushError> {
        let message = ServerMessage::from(notification);
        let content = serde_json::to_string(&message)
            .map_err(|e| MessagePushError::SerializationFailed(e.to_string()))?;

        let clients = self.clients.lock().await;
        let sender = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;

        sender.try_send(content).map_err(|e| match e {
            TrySendError::Full(_) => MessagePushError::QueueFull(connection_id.to_string()),
            TrySendError::Closed(_) => {
                MessagePushError::PushFailed(format!("connection '{}' closed", connection_id))
            }
        })?;
        tracing::debug!(
            "Pushed '{}' to connection '{}'",
            message.kind(),
            connection_id
        );
        Ok(())
    }
}
