//! Domain layer: value objects, entities and the interfaces the relay needs.

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod notification;
pub mod repository;
pub mod value_object;

pub use entity::{Binding, Connection, Room};
pub use error::{ConnectionError, MessagePushError, RepositoryError, RoomError, ValueObjectError};
pub use factory::{RandomRoomIdGenerator, RoomIdGenerator};
pub use message_pusher::{
    MessagePusher, PUSHER_CHANNEL_CAPACITY, PusherChannel, PusherReceiver, pusher_channel,
};
pub use notification::Notification;
pub use repository::RoomRepository;
pub use value_object::{ConnectionId, Payload, Role, RoomId, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
