//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};

use crate::{
    domain::{Connection, Payload, PusherReceiver, pusher_channel},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: notifications addressed to this
/// connection (via rx channel) are written to its WebSocket in the order they were pushed.
///
/// # Arguments
///
/// * `rx` - Channel receiver registered with the message pusher
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: PusherReceiver,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Create a channel for this client to receive notifications
    let (tx, rx) = pusher_channel();

    // Use ConnectClientUseCase to register the connection
    let mut connection = state.connect_client_usecase.execute(tx).await;
    tracing::info!("Client '{}' connected", connection.id);

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    // The receive loop runs on this task so the connection (and its room binding)
    // is still available when the socket goes away.
    {
        let recv = receive_loop(&mut receiver, &state, &mut connection);
        tokio::select! {
            _ = recv => {},
            _ = &mut send_task => {},
        }
    }
    send_task.abort();

    // Use DisconnectClientUseCase to tear down the room and notify the other player
    match state.disconnect_client_usecase.execute(&connection).await {
        Some(role) => {
            tracing::info!("Client '{}' ({}) disconnected", connection.id, role);
        }
        None => {
            tracing::info!("Client '{}' disconnected without a room", connection.id);
        }
    }
}

async fn receive_loop(
    receiver: &mut SplitStream<WebSocket>,
    state: &AppState,
    connection: &mut Connection,
) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!("WebSocket error on '{}': {}", connection.id, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                handle_frame(state, connection, text.as_str()).await;
            }
            Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
                Ok(text) => handle_frame(state, connection, text).await,
                Err(_) => {
                    tracing::warn!(
                        "Ignoring non UTF-8 binary frame from '{}' ({} bytes)",
                        connection.id,
                        bytes.len()
                    );
                }
            },
            Message::Ping(_) | Message::Pong(_) => {
                // Ping/pong is handled automatically by the WebSocket protocol
            }
            Message::Close(_) => {
                tracing::debug!("Client '{}' requested close", connection.id);
                break;
            }
        }
    }
}

async fn handle_frame(state: &AppState, connection: &mut Connection, text: &str) {
    let message = match ClientMessage::parse(text) {
        Ok(message) => message,
        Err(e) => {
            // 不正なメッセージは破棄し、接続は維持する
            tracing::warn!("Ignoring message from '{}': {}", connection.id, e);
            return;
        }
    };

    tracing::debug!("Received '{}' from '{}'", message.kind(), connection.id);
    dispatch(state, connection, message).await;
}

async fn dispatch(state: &AppState, connection: &mut Connection, message: ClientMessage) {
    match message {
        // create / join の結果（成功・失敗とも）はユースケースが要求元に通知する
        ClientMessage::CreateRoom => {
            if let Err(e) = state.create_room_usecase.execute(connection).await {
                tracing::debug!("create_room from '{}' rejected: {}", connection.id, e);
            }
        }
        ClientMessage::JoinRoom { room_id } => {
            if let Err(e) = state.join_room_usecase.execute(connection, &room_id).await {
                tracing::debug!("join_room from '{}' rejected: {}", connection.id, e);
            }
        }
        ClientMessage::GameAction { data } => {
            let result = state
                .relay_message_usecase
                .relay_action(connection, data.map(Payload::from))
                .await;
            log_relay(connection, "game_action", result);
        }
        ClientMessage::GameState { state: game_state } => {
            let result = state
                .relay_message_usecase
                .relay_state(connection, game_state.map(Payload::from))
                .await;
            log_relay(connection, "game_state", result);
        }
    }
}

fn log_relay(
    connection: &Connection,
    kind: &str,
    result: Result<bool, crate::usecase::RelayError>,
) {
    match result {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!("Dropped {} from '{}': no counterpart", kind, connection.id);
        }
        Err(e) => {
            tracing::debug!("Dropped {} from '{}': {}", kind, connection.id, e);
        }
    }
}
