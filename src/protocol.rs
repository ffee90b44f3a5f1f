use crate::types::ChatMessage;
use serde::{Deserialize, Serialize};

/// A client frame: the event plus an optional ack correlation id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientFrame<E> {
    #[serde(flatten)]
    pub event: E,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack: Option<u64>,
}

impl<E> ClientFrame<E> {
    pub fn new(event: E) -> Self {
        Self { event, ack: None }
    }

    pub fn with_ack(event: E, ack: u64) -> Self {
        Self {
            event,
            ack: Some(ack),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "camelCase")]
pub enum ChatClientEvent {
    Join { name: String, room: String },
    SendMessage { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "camelCase")]
pub enum ChatServerMessage {
    Message(ChatMessage),
    /// One-shot reply to a single client event
    Ack {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
        ok: bool,
        msg: String,
    },
    Error {
        code: String,
        msg: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "camelCase")]
pub enum CounterClientEvent {
    Increment,
    Decrement,
    Reset,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "camelCase")]
pub enum CounterServerMessage {
    CountUpdated { count: i64 },
    Error { code: String, msg: String },
}

/// Outgoing message types that can report a malformed client frame
pub trait ParseErrorReply {
    fn parse_error(err: &serde_json::Error) -> Self;
}

impl ParseErrorReply for ChatServerMessage {
    fn parse_error(err: &serde_json::Error) -> Self {
        ChatServerMessage::Error {
            code: "PARSE_ERROR".to_string(),
            msg: format!("Invalid message format: {}", err),
        }
    }
}

impl ParseErrorReply for CounterServerMessage {
    fn parse_error(err: &serde_json::Error) -> Self {
        CounterServerMessage::Error {
            code: "PARSE_ERROR".to_string(),
            msg: format!("Invalid message format: {}", err),
        }
    }
}
