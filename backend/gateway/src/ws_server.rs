//! WebSocket entrypoint and connection handler.
//!
//! Upgrades HTTP to WS and pumps frames between the socket and the lobby.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::server::GatewayState;
use crate::ws_protocol::{parse_client_message, ServerMessage};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<GatewayState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: GatewayState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let id = state.lobby.lock().await.connect(tx);
    info!(%id, "WebSocket connection opened");

    // Drain the outbox into the socket.
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    error!(%id, error = %e, "Failed to encode outbound frame");
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let lobby = state.lobby.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match parse_client_message(&text) {
                    Ok(client_msg) => lobby.lock().await.handle(id, client_msg),
                    Err(e) => {
                        warn!(%id, error = %e, "Dropping malformed frame");
                        lobby.lock().await.reject(id, &e);
                    }
                },
                Message::Close(_) => break,
                _ => debug!(%id, "Ignoring non-text frame"),
            }
        }
    });

    // If either task exits, abort the other.
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    }

    state.lobby.lock().await.disconnect(id);
    info!(%id, "WebSocket connection closed");
}
