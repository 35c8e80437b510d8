//! UseCase: クライアント接続処理

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, MessagePusher, PusherChannel};

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続を受け付ける
    ///
    /// 新しい `ConnectionId` を払い出し、送信チャンネルを登録する。
    /// 返す `Connection` はまだどのルームにも属していない。
    pub async fn execute(&self, sender: PusherChannel) -> Connection {
        let connection = Connection::new(ConnectionId::generate());
        self.message_pusher
            .register_client(connection.id, sender)
            .await;
        connection
    }
}
