use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::Response,
};
use axum::extract::ws::WebSocket;
use tracing::{info, error};
use futures_util::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::handlers;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Serve one chat connection. Frames are handled strictly one at a time;
/// a disconnect abandons whatever turn is in flight.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let client_uid = state.generate_client_uid();
    info!("New WebSocket connection: {}", client_uid);

    let (mut sender, mut receiver) = socket.split();

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let reply = handlers::handle_message(&state, &client_uid, &text).await;
                if sender.send(Message::Text(reply)).await.is_err() {
                    info!("Client {} went away before the reply was sent", client_uid);
                    break;
                }
            }
            Ok(Message::Binary(data)) => {
                let reply = handlers::handle_binary_message(&state, &client_uid, &data).await;
                if sender.send(Message::Text(reply)).await.is_err() {
                    info!("Client {} went away before the reply was sent", client_uid);
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            // Ping and pong are answered by axum
            _ => {}
        }
    }

    info!("Client {} disconnected", client_uid);
}
