//! UseCase 層: リレーの操作ごとに 1 つのユースケース

mod connect_client;
mod create_room;
mod disconnect_client;
mod error;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod relay_message;

pub use connect_client::ConnectClientUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{CreateRoomError, GetRoomDetailError, JoinRoomError, RelayError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use relay_message::RelayMessageUseCase;
