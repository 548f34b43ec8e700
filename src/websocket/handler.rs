use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::HeaderMap,
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    auth::verify_token,
    error::{AppError, Result},
    middleware::auth::extract_token,
    state::AppState,
    websocket::types::ServerEvent,
};

#[derive(Deserialize)]
pub struct WsAuthQuery {
    token: Option<String>,
}

/// WebSocket upgrade handler. The credential is checked once, before the
/// upgrade; there is no anonymous access on this channel.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsAuthQuery>,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Response> {
    let token = query
        .token
        .or_else(|| extract_token(&headers))
        .ok_or(AppError::Unauthorized("Authentication required".to_string()))?;

    let claims = verify_token(&token, &state.config.jwt_secret)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

    state
        .user_repository
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::Unauthorized("User not found".to_string()))?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, user_id, state)))
}

/// Handle one realtime session for its lifetime.
async fn handle_socket(socket: WebSocket, user_id: Uuid, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let connection_id = Uuid::new_v4();
    state.connections.join(connection_id, user_id, tx);

    // Forward published events to the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&event) {
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        }
    });

    // The channel is server-push only; drain the read side until the client
    // goes away so we notice the disconnect.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.connections.leave(&connection_id);
    tracing::info!("WebSocket connection closed for user {}", user_id);
}
