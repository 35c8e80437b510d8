//! Repository trait 定義
//!
//! ドメイン層が必要とするルーム登録簿へのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 各メソッドは「確認して更新する」までを 1 回の排他区間で行うこと。
//! 同じルームへの同時 join で 2 人とも成功する、といった競合を防ぐため。

use async_trait::async_trait;

use super::{ConnectionId, Payload, RepositoryError, Room, RoomId, Timestamp};

/// Room Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 一意なルームコードを払い出し、`host` を host とするルームを登録
    ///
    /// 払い出したコードは、ルームが削除された後も再利用しない。
    async fn create_room(
        &self,
        host: ConnectionId,
        created_at: Timestamp,
    ) -> Result<Room, RepositoryError>;

    /// ルームに guest を登録
    ///
    /// ルームが存在しない、または guest 枠が埋まっている場合は何も変更しない。
    async fn join_room(
        &self,
        room_id: &RoomId,
        guest: ConnectionId,
    ) -> Result<Room, RepositoryError>;

    /// ルームを取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 全てのルームを作成順に取得
    async fn get_rooms(&self) -> Vec<Room>;

    /// ルームの共有ゲーム状態を更新し、更新後のルームを返す
    ///
    /// `sender` がルームの host でも guest でもなければ何も変更せず `None` を返す。
    async fn update_game_state(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        state: Option<Payload>,
    ) -> Option<Room>;

    /// ルームを削除し、削除したルームを返す
    async fn remove_room(&self, room_id: &RoomId) -> Option<Room>;

    /// `guest` が現在の guest であれば guest 枠を空け、更新後のルームを返す
    async fn remove_guest(&self, room_id: &RoomId, guest: &ConnectionId) -> Option<Room>;

    /// 登録されているルーム数
    async fn count_rooms(&self) -> usize;
}
