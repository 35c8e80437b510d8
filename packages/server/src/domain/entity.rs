//! エンティティ
//!
//! - `Room`: host と guest の 2 人を結びつけるペアリング記録
//! - `Connection`: 1 本の WebSocket 接続と、そのルームへの割り当て

use super::{
    error::{ConnectionError, RoomError},
    value_object::{ConnectionId, Payload, Role, RoomId, Timestamp},
};

/// ルーム
///
/// ## 不変条件
///
/// - host は作成時に設定され、ルームが削除されるまで変わらない
/// - guest は高々 1 人
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub host: ConnectionId,
    pub guest: Option<ConnectionId>,
    /// 最後に受け取った共有ゲーム状態（未解釈）
    pub game_state: Option<Payload>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, host: ConnectionId, created_at: Timestamp) -> Self {
        Self {
            id,
            host,
            guest: None,
            game_state: None,
            created_at,
        }
    }

    pub fn has_guest(&self) -> bool {
        self.guest.is_some()
    }

    /// guest を追加する
    pub fn add_guest(&mut self, guest: ConnectionId) -> Result<(), RoomError> {
        if self.guest.is_some() {
            return Err(RoomError::RoomFull);
        }
        self.guest = Some(guest);
        Ok(())
    }

    /// 指定した接続が現在の guest であれば guest 枠を空ける
    ///
    /// 空けた場合は `true` を返す。
    pub fn remove_guest(&mut self, guest: &ConnectionId) -> bool {
        if self.guest.as_ref() == Some(guest) {
            self.guest = None;
            true
        } else {
            false
        }
    }

    /// 指定した接続のルーム内での役割
    pub fn role_of(&self, connection_id: &ConnectionId) -> Option<Role> {
        if &self.host == connection_id {
            Some(Role::Host)
        } else if self.guest.as_ref() == Some(connection_id) {
            Some(Role::Guest)
        } else {
            None
        }
    }

    /// 指定した接続の相手
    ///
    /// host なら guest（未参加なら `None`）、guest なら host。
    /// どちらでもない接続には `None` を返す。
    pub fn counterpart_of(&self, connection_id: &ConnectionId) -> Option<ConnectionId> {
        match self.role_of(connection_id)? {
            Role::Host => self.guest,
            Role::Guest => Some(self.host),
        }
    }

    pub fn update_game_state(&mut self, state: Option<Payload>) {
        self.game_state = state;
    }
}

/// 接続がどのルームにどの役割で割り当てられているか
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub room_id: RoomId,
    pub role: Role,
}

/// 1 本のクライアント接続
///
/// 状態遷移は `Unbound → Host` または `Unbound → Guest` のみで、
/// 一度割り当てられたら切断まで変わらない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    binding: Option<Binding>,
}

impl Connection {
    pub fn new(id: ConnectionId) -> Self {
        Self { id, binding: None }
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// 割り当て済みでないことを確認する
    pub fn ensure_unbound(&self) -> Result<(), ConnectionError> {
        match &self.binding {
            Some(binding) => Err(ConnectionError::AlreadyBound(
                binding.room_id.as_str().to_string(),
            )),
            None => Ok(()),
        }
    }

    /// ルームに割り当てる
    pub fn bind(&mut self, room_id: RoomId, role: Role) -> Result<(), ConnectionError> {
        self.ensure_unbound()?;
        self.binding = Some(Binding { room_id, role });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    #[test]
    fn test_new_room_has_no_guest() {
        // テスト項目: 作成直後のルームには guest がいない
        // given (前提条件):
        let host = ConnectionId::generate();

        // when (操作):
        let room = Room::new(room_id("ab12cd"), host, Timestamp::new(1000));

        // then (期待する結果):
        assert_eq!(room.host, host);
        assert!(!room.has_guest());
        assert_eq!(room.game_state, None);
    }

    #[test]
    fn test_add_guest_rejects_second_guest() {
        // テスト項目: guest がいるルームへの 2 人目の追加は拒否され、既存の guest は維持される
        // given (前提条件):
        let mut room = Room::new(
            room_id("ab12cd"),
            ConnectionId::generate(),
            Timestamp::new(1000),
        );
        let first = ConnectionId::generate();
        room.add_guest(first).unwrap();

        // when (操作):
        let result = room.add_guest(ConnectionId::generate());

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::RoomFull));
        assert_eq!(room.guest, Some(first));
    }

    #[test]
    fn test_remove_guest_only_for_current_guest() {
        // テスト項目: 現在の guest 以外を指定しても guest 枠は変わらない
        // given (前提条件):
        let mut room = Room::new(
            room_id("ab12cd"),
            ConnectionId::generate(),
            Timestamp::new(1000),
        );
        let guest = ConnectionId::generate();
        room.add_guest(guest).unwrap();

        // when (操作):
        let removed_other = room.remove_guest(&ConnectionId::generate());
        let removed_guest = room.remove_guest(&guest);

        // then (期待する結果):
        assert!(!removed_other);
        assert!(removed_guest);
        assert!(!room.has_guest());
    }

    #[test]
    fn test_counterpart_of() {
        // テスト項目: host の相手は guest、guest の相手は host、部外者には相手がいない
        // given (前提条件):
        let host = ConnectionId::generate();
        let guest = ConnectionId::generate();
        let mut room = Room::new(room_id("ab12cd"), host, Timestamp::new(1000));

        // when (操作):
        let before_join = room.counterpart_of(&host);
        room.add_guest(guest).unwrap();

        // then (期待する結果):
        assert_eq!(before_join, None);
        assert_eq!(room.counterpart_of(&host), Some(guest));
        assert_eq!(room.counterpart_of(&guest), Some(host));
        assert_eq!(room.counterpart_of(&ConnectionId::generate()), None);
    }

    #[test]
    fn test_connection_bind_is_terminal() {
        // テスト項目: 一度ルームに割り当てられた接続は再割り当てできない
        // given (前提条件):
        let mut connection = Connection::new(ConnectionId::generate());
        connection.bind(room_id("ab12cd"), Role::Host).unwrap();

        // when (操作):
        let result = connection.bind(room_id("zz99zz"), Role::Guest);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConnectionError::AlreadyBound("ab12cd".to_string()))
        );
        let binding = connection.binding().unwrap();
        assert_eq!(binding.room_id.as_str(), "ab12cd");
        assert_eq!(binding.role, Role::Host);
    }
}
