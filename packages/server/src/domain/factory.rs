//! RoomId の生成

use rand::Rng;

use super::value_object::RoomId;

/// ルームコードに使う文字（小文字英字と数字）
const ROOM_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// ルームコードの既定の長さ
pub const DEFAULT_ROOM_ID_LEN: usize = 6;

/// RoomId の生成器
///
/// 一意性は保証しない。重複チェックは Repository 側で行う。
pub trait RoomIdGenerator: Send + Sync {
    fn generate(&self) -> RoomId;
}

/// 乱数でルームコードを生成する
#[derive(Debug, Clone, Copy)]
pub struct RandomRoomIdGenerator {
    len: usize,
}

impl RandomRoomIdGenerator {
    /// `len` は 1 以上 `RoomId::MAX_LEN` 以下に丸められる
    pub fn new(len: usize) -> Self {
        Self {
            len: len.clamp(1, RoomId::MAX_LEN),
        }
    }
}

impl Default for RandomRoomIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_ID_LEN)
    }
}

impl RoomIdGenerator for RandomRoomIdGenerator {
    fn generate(&self) -> RoomId {
        let mut rng = rand::thread_rng();
        let code: String = (0..self.len)
            .map(|_| ROOM_ID_ALPHABET[rng.gen_range(0..ROOM_ID_ALPHABET.len())] as char)
            .collect();
        // alphabet and length are always within RoomId's constraints
        RoomId(code)
    }
}
