//! WebSocket event dispatch
//!
//! Turns decoded client frames into state operations. Whatever a handler
//! returns is sent back to the originating connection only.

use crate::protocol::{
    ChatClientEvent, ChatServerMessage, ClientFrame, CounterClientEvent, CounterServerMessage,
};
use crate::state::{ChatState, CounterState};

fn ack(id: Option<u64>, ok: bool, msg: impl Into<String>) -> ChatServerMessage {
    ChatServerMessage::Ack {
        id,
        ok,
        msg: msg.into(),
    }
}

/// Handle a chat frame and return the optional reply for the sender
pub async fn handle_chat_event(
    frame: ClientFrame<ChatClientEvent>,
    connection_id: &str,
    state: &ChatState,
) -> Option<ChatServerMessage> {
    match frame.event {
        ChatClientEvent::Join { name, room } => {
            tracing::info!("Join request: name={}, room={}", name, room);
            match state.join(connection_id, &name, &room).await {
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(connection = %connection_id, "Join rejected: {}", e);
                    Some(ack(frame.ack, false, e.to_string()))
                }
            }
        }

        ChatClientEvent::SendMessage { text } => {
            tracing::debug!("Message from {}: {}", connection_id, text);
            match state.send_message(connection_id, text).await {
                Ok(confirmation) => Some(ack(frame.ack, true, confirmation)),
                Err(e) => Some(ack(frame.ack, false, e.to_string())),
            }
        }
    }
}

/// Handle a counter frame. Counter events never reply directly; the new value
/// arrives through the broadcast like for everyone else.
pub async fn handle_counter_event(
    frame: ClientFrame<CounterClientEvent>,
    state: &CounterState,
) -> Option<CounterServerMessage> {
    let count = match frame.event {
        CounterClientEvent::Increment => state.increment().await,
        CounterClientEvent::Decrement => state.decrement().await,
        CounterClientEvent::Reset => state.reset().await,
    };
    tracing::debug!("Counter event {:?} -> {}", frame.event, count);
    None
}
