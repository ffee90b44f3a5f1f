pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;

use crate::protocol::{ChatClientEvent, ClientFrame, CounterClientEvent, ParseErrorReply};
use crate::state::{AppState, ChatState, CounterState};
use crate::state::hub::Outbox;

/// Chat WebSocket upgrade handler
pub async fn chat_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    tracing::info!("Chat WebSocket connection request");
    ws.on_upgrade(move |socket| handle_chat_socket(socket, state.chat))
}

/// Counter WebSocket upgrade handler
pub async fn counter_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    tracing::info!("Counter WebSocket connection request");
    ws.on_upgrade(move |socket| handle_counter_socket(socket, state.counter))
}

async fn handle_chat_socket(socket: WebSocket, state: ChatState) {
    let (connection_id, outbox) = state.connect().await;

    let dispatch_state = state.clone();
    let dispatch_id = connection_id.clone();
    run_session(socket, outbox, move |frame: ClientFrame<ChatClientEvent>| {
        let state = dispatch_state.clone();
        let id = dispatch_id.clone();
        async move { handlers::handle_chat_event(frame, &id, &state).await }
    })
    .await;

    state.disconnect(&connection_id).await;
}

async fn handle_counter_socket(socket: WebSocket, state: CounterState) {
    let (connection_id, outbox) = state.connect().await;

    let dispatch_state = state.clone();
    run_session(socket, outbox, move |frame: ClientFrame<CounterClientEvent>| {
        let state = dispatch_state.clone();
        async move { handlers::handle_counter_event(frame, &state).await }
    })
    .await;

    state.disconnect(&connection_id).await;
}

/// Pump one connection until it closes: outbox messages go to the socket,
/// decoded client frames go to `dispatch` and its reply goes back to this
/// connection only.
async fn run_session<E, M, F, Fut>(socket: WebSocket, mut outbox: Outbox<M>, mut dispatch: F)
where
    E: DeserializeOwned,
    M: Serialize + ParseErrorReply,
    F: FnMut(E) -> Fut,
    Fut: Future<Output = Option<M>>,
{
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            // Fanout addressed to this connection
            outgoing = outbox.recv() => {
                let Some(msg) = outgoing else {
                    // Hub dropped us
                    break;
                };
                if let Ok(json) = serde_json::to_string(&msg) {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
            }

            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Received message: {}", text);

                        let reply = handle_text(&text, &mut dispatch).await;

                        if let Some(response) = reply {
                            if let Ok(json) = serde_json::to_string(&response) {
                                if sender.send(Message::Text(json.into())).await.is_err() {
                                    tracing::error!("Failed to send response");
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
}

/// Decode one text frame and dispatch it. A frame that does not decode gets a
/// `PARSE_ERROR` reply and the connection stays open.
pub async fn handle_text<E, M, F, Fut>(text: &str, dispatch: &mut F) -> Option<M>
where
    E: DeserializeOwned,
    M: ParseErrorReply,
    F: FnMut(E) -> Fut,
    Fut: Future<Output = Option<M>>,
{
    match serde_json::from_str::<E>(text) {
        Ok(frame) => dispatch(frame).await,
        Err(e) => {
            tracing::error!("Failed to parse client message: {}", e);
            Some(M::parse_error(&e))
        }
    }
}
