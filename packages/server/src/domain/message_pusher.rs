//! MessagePusher trait 定義
//!
//! クライアントへの通知手段を抽象化します。
//! 具体的な実装（WebSocket）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, Notification};

/// 接続ごとの送信キューの上限。読まない相手への通知はここで打ち切る
pub const PUSHER_CHANNEL_CAPACITY: usize = 256;

/// クライアントへ送る JSON テキストのチャンネル
pub type PusherChannel = mpsc::Sender<String>;

/// `PusherChannel` の受信側
pub type PusherReceiver = mpsc::Receiver<String>;

/// 上限付きの送信チャンネルを作成
pub fn pusher_channel() -> (PusherChannel, PusherReceiver) {
    mpsc::channel(PUSHER_CHANNEL_CAPACITY)
}

/// MessagePusher trait
///
/// 送信はベストエフォート。相手がいない場合はキューに積まず
/// `MessagePushError::ClientNotFound` を返す。相手のキューが満杯の場合は
/// 待たずに破棄し `MessagePushError::QueueFull` を返す。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定のクライアントに通知を送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: Notification,
    ) -> Result<(), MessagePushError>;
}
