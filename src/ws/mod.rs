pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use std::sync::Arc;
use tokio::sync::{broadcast::error::RecvError, mpsc};

use crate::protocol::{self, ClientMessage, ServerMessage};
use crate::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::info!("WebSocket connection request");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Serialize and send one message. Returns false once the socket is gone.
async fn send_message(sender: &mut SplitSink<WebSocket, Message>, msg: &ServerMessage) -> bool {
    match serde_json::to_string(msg) {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to serialize {:?}: {}", msg, e);
            true
        }
    }
}

/// Handle individual WebSocket connection.
///
/// Intents are processed one at a time by a worker task so that broadcasts
/// (word generation progress, cues) keep flowing while an intent awaits.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let welcome = state.welcome_message().await;
    if !send_message(&mut sender, &welcome).await {
        tracing::error!("Failed to send welcome message");
        return;
    }

    let mut broadcast_rx = state.broadcast.subscribe();

    let (intent_tx, mut intent_rx) = mpsc::unbounded_channel::<ClientMessage>();
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<ServerMessage>();

    let worker_state = state.clone();
    let worker = tokio::spawn(async move {
        while let Some(msg) = intent_rx.recv().await {
            if let Some(response) = handlers::handle_message(msg, &worker_state).await {
                if reply_tx.send(response).is_err() {
                    break;
                }
            }
        }
    });

    loop {
        tokio::select! {
            broadcast_msg = broadcast_rx.recv() => {
                match broadcast_msg {
                    Ok(msg) => {
                        if !send_message(&mut sender, &msg).await {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Client lagged behind, skipped {} broadcasts", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            Some(reply) = reply_rx.recv() => {
                if !send_message(&mut sender, &reply).await {
                    tracing::error!("Failed to send response");
                    break;
                }
            }

            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Received message: {}", text);

                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                if intent_tx.send(client_msg).is_err() {
                                    tracing::error!("Intent worker stopped");
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::error!("Failed to parse client message: {}", e);
                                let error = ServerMessage::error(
                                    protocol::PARSE_ERROR,
                                    format!("Invalid message format: {}", e),
                                );
                                if !send_message(&mut sender, &error).await {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("WebSocket closed");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    worker.abort();
    tracing::info!("WebSocket connection closed");
}
