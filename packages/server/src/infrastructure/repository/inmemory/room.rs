//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリの登録簿として使用し、プロセス終了とともに消える。
//!
//! 登録簿全体を 1 つの Mutex で守る。メッセージ頻度は低いため
//! ルーム単位のロックは使わない。
//!
//! 一度払い出したルームコードはプロセスが終了するまで再利用しない。
//! 閉じたルームに残った接続が、同じコードの新しいルームに届かないようにするため。

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Payload, RepositoryError, Room, RoomError, RoomId, RoomIdGenerator,
    RoomRepository, Timestamp,
};

/// ルームコード生成の最大試行回数
pub const MAX_ROOM_ID_ATTEMPTS: usize = 16;

/// Mutex で守られる登録簿の中身
#[derive(Debug, Default)]
struct RoomRegistry {
    /// Key: RoomId, Value: Room
    rooms: HashMap<RoomId, Room>,
    /// これまでに払い出した全てのルームコード（削除済みのルームを含む）
    issued: HashSet<RoomId>,
}

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    registry: Mutex<RoomRegistry>,
    /// ルームコード生成器
    id_generator: Arc<dyn RoomIdGenerator>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(id_generator: Arc<dyn RoomIdGenerator>) -> Self {
        Self {
            registry: Mutex::new(RoomRegistry::default()),
            id_generator,
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(
        &self,
        host: ConnectionId,
        created_at: Timestamp,
    ) -> Result<Room, RepositoryError> {
        let mut registry = self.registry.lock().await;

        for attempt in 1..=MAX_ROOM_ID_ATTEMPTS {
            let room_id = self.id_generator.generate();
            if registry.issued.contains(&room_id) {
                tracing::debug!(
                    "Room id '{}' already issued, retrying (attempt {}/{})",
                    room_id,
                    attempt,
                    MAX_ROOM_ID_ATTEMPTS
                );
                continue;
            }

            let room = Room::new(room_id.clone(), host, created_at);
            registry.issued.insert(room_id.clone());
            registry.rooms.insert(room_id, room.clone());
            return Ok(room);
        }

        Err(RepositoryError::RoomIdExhausted(MAX_ROOM_ID_ATTEMPTS))
    }

    async fn join_room(
        &self,
        room_id: &RoomId,
        guest: ConnectionId,
    ) -> Result<Room, RepositoryError> {
        let mut registry = self.registry.lock().await;
        let room = registry
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))?;

        room.add_guest(guest).map_err(|e| match e {
            RoomError::RoomFull => RepositoryError::RoomFull(room_id.as_str().to_string()),
        })?;

        Ok(room.clone())
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let registry = self.registry.lock().await;
        registry.rooms.get(room_id).cloned()
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let registry = self.registry.lock().await;
        let mut rooms: Vec<Room> = registry.rooms.values().cloned().collect();
        rooms.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        rooms
    }

    async fn update_game_state(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        state: Option<Payload>,
    ) -> Option<Room> {
        let mut registry = self.registry.lock().await;
        let room = registry.rooms.get_mut(room_id)?;
        // ルームのメンバー以外からの更新は受け付けない
        room.role_of(sender)?;
        room.update_game_state(state);
        Some(room.clone())
    }

    async fn remove_room(&self, room_id: &RoomId) -> Option<Room> {
        let mut registry = self.registry.lock().await;
        registry.rooms.remove(room_id)
    }

    async fn remove_guest(&self, room_id: &RoomId, guest: &ConnectionId) -> Option<Room> {
        let mut registry = self.registry.lock().await;
        let room = registry.rooms.get_mut(room_id)?;
        if room.remove_guest(guest) {
            Some(room.clone())
        } else {
            None
        }
    }

    async fn count_rooms(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use serde_json::value::RawValue;

    use super::*;
    use crate::domain::RandomRoomIdGenerator;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRoomRepository のルーム作成・参加・削除・状態更新
    // - ルームコード重複時の再試行
    //
    // 【なぜこのテストが必要か】
    // - 登録簿はリレー全体で唯一の共有可変状態
    // - join の「確認して更新」が 1 回の排他区間で行われることを保証する
    //
    // 【どのようなシナリオをテストするか】
    // 1. ルーム作成とコードの一意性
    // 2. 存在しないルーム・満員ルームへの参加（エラーケース）
    // 3. 同時 join で成功するのは 1 人だけ
    // 4. guest の離脱とルーム削除
    // 5. コード重複時の再試行と試行回数の上限
    // 6. 削除済みルームのコードは再利用されない
    // 7. メンバー以外からのゲーム状態更新は拒否される
    // ========================================

    /// 決められた順にコードを返す生成器
    struct SequenceRoomIdGenerator {
        ids: StdMutex<Vec<&'static str>>,
    }

    impl SequenceRoomIdGenerator {
        fn new(mut ids: Vec<&'static str>) -> Self {
            ids.reverse();
            Self {
                ids: StdMutex::new(ids),
            }
        }
    }

    impl RoomIdGenerator for SequenceRoomIdGenerator {
        fn generate(&self) -> RoomId {
            let mut ids = self.ids.lock().unwrap();
            let next = ids.pop().unwrap_or("fallback");
            RoomId::new(next.to_string()).unwrap()
        }
    }

    fn create_test_repository() -> InMemoryRoomRepository {
        InMemoryRoomRepository::new(Arc::new(RandomRoomIdGenerator::default()))
    }

    #[tokio::test]
    async fn test_create_room_registers_host() {
        // テスト項目: ルームを作成すると作成者が host として登録される
        // given (前提条件):
        let repo = create_test_repository();
        let host = ConnectionId::generate();

        // when (操作):
        let room = repo.create_room(host, Timestamp::new(1000)).await.unwrap();

        // then (期待する結果):
        assert_eq!(room.host, host);
        assert!(!room.has_guest());
        assert_eq!(repo.count_rooms().await, 1);
        assert_eq!(repo.get_room(&room.id).await, Some(room));
    }

    #[tokio::test]
    async fn test_create_room_ids_are_unique() {
        // テスト項目: 多数のルームを作成してもコードは全て一意
        // given (前提条件):
        let repo = create_test_repository();

        // when (操作):
        let mut ids = Vec::new();
        for _ in 0..200 {
            let room = repo
                .create_room(ConnectionId::generate(), Timestamp::new(1000))
                .await
                .unwrap();
            ids.push(room.id);
        }

        // then (期待する結果):
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 200);
        assert_eq!(repo.count_rooms().await, 200);
    }

    #[tokio::test]
    async fn test_create_room_retries_on_collision() {
        // テスト項目: コードが重複した場合は別のコードで再試行される
        // given (前提条件):
        let generator = SequenceRoomIdGenerator::new(vec!["aaaaaa", "aaaaaa", "bbbbbb"]);
        let repo = InMemoryRoomRepository::new(Arc::new(generator));
        let first = repo
            .create_room(ConnectionId::generate(), Timestamp::new(1000))
            .await
            .unwrap();

        // when (操作):
        let second = repo
            .create_room(ConnectionId::generate(), Timestamp::new(2000))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(first.id.as_str(), "aaaaaa");
        assert_eq!(second.id.as_str(), "bbbbbb");
        assert_eq!(repo.count_rooms().await, 2);
    }

    #[tokio::test]
    async fn test_create_room_gives_up_after_max_attempts() {
        // テスト項目: 試行回数の上限まで重複が続くとエラーになり、既存ルームは変わらない
        // given (前提条件):
        let ids = vec!["aaaaaa"; MAX_ROOM_ID_ATTEMPTS + 1];
        let repo = InMemoryRoomRepository::new(Arc::new(SequenceRoomIdGenerator::new(ids)));
        let existing = repo
            .create_room(ConnectionId::generate(), Timestamp::new(1000))
            .await
            .unwrap();

        // when (操作):
        let result = repo
            .create_room(ConnectionId::generate(), Timestamp::new(2000))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::RoomIdExhausted(MAX_ROOM_ID_ATTEMPTS))
        );
        assert_eq!(repo.get_room(&existing.id).await, Some(existing));
    }

    #[tokio::test]
    async fn test_join_room_success() {
        // テスト項目: 空きのあるルームに guest として参加できる
        // given (前提条件):
        let repo = create_test_repository();
        let host = ConnectionId::generate();
        let room = repo.create_room(host, Timestamp::new(1000)).await.unwrap();
        let guest = ConnectionId::generate();

        // when (操作):
        let joined = repo.join_room(&room.id, guest).await.unwrap();

        // then (期待する結果):
        assert_eq!(joined.host, host);
        assert_eq!(joined.guest, Some(guest));
        assert_eq!(repo.get_room(&room.id).await.unwrap().guest, Some(guest));
    }

    #[tokio::test]
    async fn test_join_nonexistent_room() {
        // テスト項目: 存在しないルームへの参加はエラーになり、他のルームは変わらない
        // given (前提条件):
        let repo = create_test_repository();
        let room = repo
            .create_room(ConnectionId::generate(), Timestamp::new(1000))
            .await
            .unwrap();
        let missing = RoomId::new("zzzzzzzz".to_string()).unwrap();

        // when (操作):
        let result = repo.join_room(&missing, ConnectionId::generate()).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::RoomNotFound("zzzzzzzz".to_string()))
        );
        assert_eq!(repo.get_room(&room.id).await, Some(room));
    }

    #[tokio::test]
    async fn test_join_full_room_keeps_existing_guest() {
        // テスト項目: 満員のルームへの参加はエラーになり、既存の guest は維持される
        // given (前提条件):
        let repo = create_test_repository();
        let room = repo
            .create_room(ConnectionId::generate(), Timestamp::new(1000))
            .await
            .unwrap();
        let first_guest = ConnectionId::generate();
        repo.join_room(&room.id, first_guest).await.unwrap();

        // when (操作):
        let result = repo.join_room(&room.id, ConnectionId::generate()).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::RoomFull(room.id.as_str().to_string()))
        );
        assert_eq!(
            repo.get_room(&room.id).await.unwrap().guest,
            Some(first_guest)
        );
    }

    #[tokio::test]
    async fn test_concurrent_joins_only_one_succeeds() {
        // テスト項目: 同じルームへの同時 join では 1 人だけが成功する
        // given (前提条件):
        let repo = Arc::new(create_test_repository());
        let room = repo
            .create_room(ConnectionId::generate(), Timestamp::new(1000))
            .await
            .unwrap();

        // when (操作):
        let mut handles = Vec::new();
        for _ in 0..16 {
            let repo = repo.clone();
            let room_id = room.id.clone();
            handles.push(tokio::spawn(async move {
                repo.join_room(&room_id, ConnectionId::generate()).await
            }));
        }
        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        // then (期待する結果):
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn test_remove_guest_reopens_room() {
        // テスト項目: guest が抜けるとルームは残り、再び参加できる
        // given (前提条件):
        let repo = create_test_repository();
        let room = repo
            .create_room(ConnectionId::generate(), Timestamp::new(1000))
            .await
            .unwrap();
        let guest = ConnectionId::generate();
        repo.join_room(&room.id, guest).await.unwrap();

        // when (操作):
        let updated = repo.remove_guest(&room.id, &guest).await;

        // then (期待する結果):
        assert!(!updated.unwrap().has_guest());
        assert!(
            repo.join_room(&room.id, ConnectionId::generate())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_remove_guest_ignores_other_connection() {
        // テスト項目: 現在の guest 以外を指定しても guest 枠は変わらない
        // given (前提条件):
        let repo = create_test_repository();
        let room = repo
            .create_room(ConnectionId::generate(), Timestamp::new(1000))
            .await
            .unwrap();
        let guest = ConnectionId::generate();
        repo.join_room(&room.id, guest).await.unwrap();

        // when (操作):
        let result = repo.remove_guest(&room.id, &ConnectionId::generate()).await;

        // then (期待する結果):
        assert_eq!(result, None);
        assert_eq!(repo.get_room(&room.id).await.unwrap().guest, Some(guest));
    }

    #[tokio::test]
    async fn test_remove_room() {
        // テスト項目: ルームを削除すると以後取得も参加もできない
        // given (前提条件):
        let repo = create_test_repository();
        let room = repo
            .create_room(ConnectionId::generate(), Timestamp::new(1000))
            .await
            .unwrap();

        // when (操作):
        let removed = repo.remove_room(&room.id).await;

        // then (期待する結果):
        assert_eq!(removed, Some(room.clone()));
        assert_eq!(repo.get_room(&room.id).await, None);
        assert_eq!(repo.count_rooms().await, 0);
        assert!(
            repo.join_room(&room.id, ConnectionId::generate())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_update_game_state() {
        // テスト項目: 共有ゲーム状態を更新でき、存在しないルームでは None を返す
        // given (前提条件):
        let repo = create_test_repository();
        let host = ConnectionId::generate();
        let room = repo.create_room(host, Timestamp::new(1000)).await.unwrap();
        let state = Payload::from(RawValue::from_string(r#"{"score":5}"#.to_string()).unwrap());
        let missing = RoomId::new("missing".to_string()).unwrap();

        // when (操作):
        let updated = repo
            .update_game_state(&room.id, &host, Some(state.clone()))
            .await;
        let not_found = repo
            .update_game_state(&missing, &host, Some(state.clone()))
            .await;

        // then (期待する結果):
        assert_eq!(updated.unwrap().game_state, Some(state));
        assert_eq!(not_found, None);
    }

    #[tokio::test]
    async fn test_get_rooms_sorted_by_creation() {
        // テスト項目: ルーム一覧は作成順に並ぶ
        // given (前提条件):
        let repo = create_test_repository();
        let later = repo
            .create_room(ConnectionId::generate(), Timestamp::new(2000))
            .await
            .unwrap();
        let earlier = repo
            .create_room(ConnectionId::generate(), Timestamp::new(1000))
            .await
            .unwrap();

        // when (操作):
        let rooms = repo.get_rooms().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].id, earlier.id);
        assert_eq!(rooms[1].id, later.id);
    }

    #[tokio::test]
    async fn test_removed_room_id_is_never_reissued() {
        // テスト項目: 削除済みルームのコードが再び生成されても、別のコードで再試行される
        // given (前提条件):
        let generator = SequenceRoomIdGenerator::new(vec!["aaaaaa", "aaaaaa", "bbbbbb"]);
        let repo = InMemoryRoomRepository::new(Arc::new(generator));
        let first = repo
            .create_room(ConnectionId::generate(), Timestamp::new(1000))
            .await
            .unwrap();
        repo.remove_room(&first.id).await.unwrap();

        // when (操作):
        let second = repo
            .create_room(ConnectionId::generate(), Timestamp::new(2000))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(first.id.as_str(), "aaaaaa");
        assert_eq!(second.id.as_str(), "bbbbbb");
        assert_eq!(
            repo.get_room(&RoomId::new("aaaaaa".to_string()).unwrap())
                .await,
            None
        );
    }

    #[tokio::test]
    async fn test_update_game_state_rejects_non_member() {
        // テスト項目: ルームのメンバーでない接続からのゲーム状態更新は None を返し、状態は変わらない
        // given (前提条件):
        let repo = create_test_repository();
        let host = ConnectionId::generate();
        let room = repo.create_room(host, Timestamp::new(1000)).await.unwrap();
        let guest = ConnectionId::generate();
        repo.join_room(&room.id, guest).await.unwrap();
        let state = Payload::from(RawValue::from_string(r#"{"hijack":true}"#.to_string()).unwrap());

        // when (操作):
        let result = repo
            .update_game_state(&room.id, &ConnectionId::generate(), Some(state))
            .await;

        // then (期待する結果):
        assert_eq!(result, None);
        assert_eq!(repo.get_room(&room.id).await.unwrap().game_state, None);
    }
}
