/**
 * Notification Socket Handler
 *
 * This module implements `GET /socket`, the WebSocket endpoint browser
 * clients use to subscribe to listing topics.
 *
 * # Connection Management
 *
 * Each connection gets a fresh `SessionId` and an unbounded outbound
 * queue. A writer task drains the queue into the socket; the read loop
 * answers every text frame by queueing an `OK` or `BAD` reply on the same
 * queue, so replies and `UPDATE` pushes leave in the order they were
 * produced.
 *
 * When the peer closes (or the transport drops) the session is removed
 * from the registry with the observed close status.
 *
 * # Protocol
 *
 * ```text
 * client: SUBSCRIBE\n\n/api/instance
 * server: OK\n\n
 * ...
 * server: UPDATE\n\n/api/instance
 * ```
 */

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::backend::middleware::AuthUser;
use crate::backend::realtime::registry::{CloseStatus, SessionId, SessionRegistry};
use crate::shared::{ClientMessage, ClientMethod, ServerMessage};

/// Handle the socket upgrade (GET /socket)
///
/// Requires an authenticated caller; browsers pass the session token as
/// the `token` query parameter because they cannot set headers on an
/// upgrade request.
pub async fn handle_socket_upgrade(
    ws: WebSocketUpgrade,
    State(registry): State<SessionRegistry>,
    AuthUser(user): AuthUser,
) -> Response {
    tracing::info!("[Socket] Upgrade requested by {}", user.username);
    ws.on_upgrade(move |socket| run_session(socket, registry))
}

/// Apply one inbound text payload and build the reply frame
///
/// Decode failures and registry rejections both produce `BAD` carrying
/// the original payload; the session stays connected either way.
pub async fn handle_client_payload(
    registry: &SessionRegistry,
    id: SessionId,
    payload: &str,
) -> ServerMessage {
    let message = match ClientMessage::decode(payload) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!("[Socket] Session {} sent an undecodable frame: {}", id, e);
            return ServerMessage::bad(payload);
        }
    };

    let result = match message.method {
        ClientMethod::Subscribe => registry.subscribe(id, &message.body).await,
        ClientMethod::Unsubscribe => registry.unsubscribe(id, &message.body).await,
    };

    match result {
        Ok(_) => ServerMessage::ok(),
        Err(e) => {
            tracing::warn!("[Socket] Session {} frame rejected: {}", id, e);
            ServerMessage::bad(payload)
        }
    }
}

/// Drive one connection from registration to removal
async fn run_session(socket: WebSocket, registry: SessionRegistry) {
    let id = SessionId::new();
    let (outbound, mut queue) = mpsc::unbounded_channel::<String>();

    if let Err(e) = registry.on_connect(id, outbound.clone()).await {
        tracing::error!("[Socket] Could not register session: {}", e);
        return;
    }

    let (mut sink, mut stream) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(frame) = queue.recv().await {
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
        if let Err(e) = sink.close().await {
            tracing::debug!("[Socket] Closing session {} failed: {}", id, e);
        }
    });

    let mut status = CloseStatus::ABNORMAL;
    while let Some(message) = stream.next().await {
        let reply = match message {
            Ok(Message::Text(text)) => handle_client_payload(&registry, id, text.as_str()).await,
            Ok(Message::Binary(bytes)) => {
                ServerMessage::bad(String::from_utf8_lossy(&bytes).into_owned())
            }
            Ok(Message::Close(frame)) => {
                status = frame
                    .map(|frame| CloseStatus(frame.code))
                    .unwrap_or(CloseStatus::NO_STATUS);
                break;
            }
            // ping/pong are answered by the transport
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!("[Socket] Session {} read error: {}", id, e);
                break;
            }
        };

        if outbound.send(reply.encode()).is_err() {
            break;
        }
    }

    registry.on_disconnect(id, status).await;

    // the registry held the only other sender, so this ends the writer
    drop(outbound);
    if let Err(e) = writer.await {
        tracing::debug!("[Socket] Writer for session {} ended with {}", id, e);
    }
}
