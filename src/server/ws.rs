use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{Sink, SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::protocol::{parse_client_message, ClientMessage, ServerMessage};
use super::routes::AppState;
use crate::api::LanguageModel;
use crate::mcp::ToolExecutor;
use crate::session::{open_session, ConversationSession};

/// Frames buffered between the socket reader and the connection loop.
const FRAME_BUFFER: usize = 32;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn send<S>(sender: &mut S, message: &ServerMessage) -> bool
where
    S: Sink<Message> + Unpin,
{
    sender.send(Message::Text(message.to_json())).await.is_ok()
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::new_v4().to_string();
    state.register(&session_id).await;
    info!("Client connected: {}", session_id);

    let (mut sender, mut receiver) = socket.split();
    let cancel = CancellationToken::new();

    // Frames are read on their own task so a disconnect is noticed while a
    // query is still running.
    let (frame_tx, mut frame_rx) = mpsc::channel::<String>(FRAME_BUFFER);
    let reader_cancel = cancel.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if frame_tx.send(text).await.is_err() {
                        break;
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        reader_cancel.cancel();
    });

    let mut session = tokio::select! {
        _ = cancel.cancelled() => None,
        result = open_session(&state.config) => match result {
            Ok(session) => {
                let message = ServerMessage::SessionId { session_id: session_id.clone() };
                if !send(&mut sender, &message).await {
                    cancel.cancel();
                }
                Some(session)
            }
            Err(e) => {
                error!("Session setup failed for {}: {}", session_id, e);
                let message = ServerMessage::error(format!("Failed to initialize AI client: {}", e));
                if !send(&mut sender, &message).await {
                    cancel.cancel();
                }
                None
            }
        },
    };

    serve_connection(&session_id, &mut sender, &mut frame_rx, &mut session, &cancel).await;

    recv_task.abort();
    state.unregister(&session_id).await;
    info!("Client disconnected: {}", session_id);
}

/// Runs the frame loop, then stops the session's MCP server.
async fn serve_connection<M, E, S>(
    session_id: &str,
    sender: &mut S,
    frames: &mut mpsc::Receiver<String>,
    session: &mut Option<ConversationSession<M, E>>,
    cancel: &CancellationToken,
) where
    M: LanguageModel,
    E: ToolExecutor,
    S: Sink<Message> + Unpin,
{
    run_connection(sender, frames, session, cancel).await;

    if let Some(session) = session.as_ref() {
        if let Err(e) = session.shutdown().await {
            warn!("Failed to shut down MCP server for {}: {}", session_id, e);
        }
    }
}

/// Handles frames one at a time until the client goes away.
async fn run_connection<M, E, S>(
    sender: &mut S,
    frames: &mut mpsc::Receiver<String>,
    session: &mut Option<ConversationSession<M, E>>,
    cancel: &CancellationToken,
) where
    M: LanguageModel,
    E: ToolExecutor,
    S: Sink<Message> + Unpin,
{
    loop {
        let text = tokio::select! {
            _ = cancel.cancelled() => break,
            frame = frames.recv() => match frame {
                Some(text) => text,
                None => break,
            },
        };

        let reply = match parse_client_message(&text) {
            Err(reply) => reply,
            Ok(ClientMessage::Clear) => {
                if let Some(session) = session.as_mut() {
                    session.clear();
                }
                ServerMessage::response("Chat history cleared.")
            }
            Ok(ClientMessage::Query { query }) => {
                if query.trim().is_empty() {
                    ServerMessage::error("Query cannot be empty")
                } else if let Some(session) = session.as_mut() {
                    if !send(sender, &ServerMessage::Thinking).await {
                        break;
                    }
                    debug!("Processing query: {}", query);
                    let outcome = tokio::select! {
                        _ = cancel.cancelled() => {
                            debug!("Query cancelled by disconnect");
                            break;
                        }
                        outcome = session.submit(&query) => outcome,
                    };
                    match outcome {
                        Ok(content) => ServerMessage::response(content),
                        Err(e) => {
                            warn!("Query failed: {}", e);
                            ServerMessage::error(format!("Error processing query: {}", e))
                        }
                    }
                } else {
                    ServerMessage::error("AI client not initialized")
                }
            }
        };

        if !send(sender, &reply).await {
            break;
        }
    }
}
