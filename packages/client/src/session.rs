//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use kakehashi_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    domain::{SessionMode, SessionState, parse_input},
    error::ClientError,
};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

fn encode(message: &ClientMessage) -> Result<Message, ClientError> {
    serde_json::to_string(message)
        .map(|json| Message::Text(json.into()))
        .map_err(|e| ClientError::InvalidInput(e.to_string()))
}

/// Run the WebSocket client session
///
/// Returns when the user quits, or with an error when the room could not be
/// created or joined, the host left, or the connection dropped.
pub async fn run_client_session(url: &str, mode: SessionMode) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to relay at {}", url);

    let (mut write, mut read) = ws_stream.split();

    write
        .send(encode(&mode.opening_message())?)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    println!(
        "\nType a message and press Enter to send it as a game action.\n\
         /state <json> sends a game state, /quit leaves.\n"
    );

    let prompt = mode.prompt();

    // Spawn a task to handle incoming messages
    let mut read_task = tokio::spawn(async move {
        let mut state = SessionState::new();

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => match ServerMessage::parse(text.as_str()) {
                    Ok(server_message) => {
                        print!("{}", MessageFormatter::format_server_message(&server_message));
                        state.on_message(&server_message)?;
                        redisplay_prompt(prompt);
                    }
                    Err(e) => {
                        tracing::debug!("Undecodable message from relay: {}", e);
                        print!("{}", MessageFormatter::format_raw_message(text.as_str()));
                        redisplay_prompt(prompt);
                    }
                },
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt(prompt);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        Err::<(), ClientError>(ClientError::ConnectionError(
            "Connection lost".to_string(),
        ))
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    // Ctrl+C / Ctrl+D
                    let _ = input_tx.send("/quit".to_string());
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to handle stdin input and send to WebSocket
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            let command = match parse_input(&line) {
                Ok(command) => command,
                Err(e) => {
                    println!("{}", e);
                    redisplay_prompt(prompt);
                    continue;
                }
            };

            let Some(message) = command.into_message() else {
                let _ = write.send(Message::Close(None)).await;
                break;
            };

            write
                .send(encode(&message)?)
                .await
                .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

            print!("{}", MessageFormatter::format_sent_confirmation(message.kind()));
            redisplay_prompt(prompt);
        }

        Ok::<(), ClientError>(())
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            read_result.map_err(|e| ClientError::ConnectionError(e.to_string()))?
        }
        write_result = &mut write_task => {
            read_task.abort();
            write_result.map_err(|e| ClientError::ConnectionError(e.to_string()))?
        }
    }
}
