use super::hub::{Hub, Outbox, Target};
use super::presence::{PresenceError, PresenceRegistry};
use crate::moderation::ContentFilter;
use crate::protocol::ChatServerMessage;
use crate::types::{ChatMessage, ConnectionId, Participant};
use std::sync::Arc;
use tokio::sync::RwLock;

pub const WELCOME_TEXT: &str = "A new user has joined!";
pub const LEFT_TEXT: &str = "A user has left!";
pub const DELIVERED_TEXT: &str = "Message delivered to everyone!";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error(transparent)]
    Presence(#[from] PresenceError),

    #[error("Profanity is not allowed!")]
    ProfanityRejected,

    #[error("Connection is not open")]
    NotConnected,
}

struct ChatInner {
    registry: PresenceRegistry,
    hub: Hub<ChatServerMessage>,
}

/// Chat room gateway state.
///
/// Every operation takes the write lock once and finishes its fanout before
/// releasing it, so handlers never interleave on the registry.
#[derive(Clone)]
pub struct ChatState {
    inner: Arc<RwLock<ChatInner>>,
    filter: Arc<dyn ContentFilter>,
}

impl ChatState {
    pub fn new(filter: Arc<dyn ContentFilter>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ChatInner {
                registry: PresenceRegistry::new(),
                hub: Hub::new(),
            })),
            filter,
        }
    }

    /// Open a session and greet everyone else
    pub async fn connect(&self) -> (ConnectionId, Outbox<ChatServerMessage>) {
        let mut inner = self.inner.write().await;
        let (id, outbox) = inner.hub.connect();

        let notified = inner.hub.fanout(
            Target::AllExcept(&id),
            ChatServerMessage::Message(ChatMessage::now(WELCOME_TEXT)),
        );
        tracing::info!(connection = %id, notified, "Chat connection opened");

        (id, outbox)
    }

    /// Join a room under a display name
    pub async fn join(&self, id: &str, name: &str, room: &str) -> Result<Participant, ChatError> {
        let mut inner = self.inner.write().await;
        if !inner.hub.is_connected(id) {
            return Err(ChatError::NotConnected);
        }

        let participant = inner.registry.add_user(id, name, room)?;
        inner.hub.join_room(id, &participant.room);

        // Announce the name as typed; the registry keeps the normalized form
        let announcement = format!("{} has joined the room!", name.trim());
        let notified = inner.hub.fanout(
            Target::RoomExcept {
                room: &participant.room,
                except: id,
            },
            ChatServerMessage::Message(ChatMessage::now(announcement)),
        );
        tracing::info!(
            connection = %id,
            name = %participant.name,
            room = %participant.room,
            notified,
            "Participant joined"
        );

        Ok(participant)
    }

    /// Filter a message and deliver it to every connection, sender included.
    /// Returns the confirmation text for the sender's ack.
    pub async fn send_message(&self, id: &str, text: String) -> Result<&'static str, ChatError> {
        if self.filter.is_profane(&text) {
            tracing::warn!(connection = %id, filter = self.filter.name(), "Message rejected");
            return Err(ChatError::ProfanityRejected);
        }

        let inner = self.inner.write().await;
        if !inner.hub.is_connected(id) {
            return Err(ChatError::NotConnected);
        }

        let delivered = inner
            .hub
            .fanout(Target::All, ChatServerMessage::Message(ChatMessage::now(text)));
        tracing::debug!(connection = %id, delivered, "Message broadcast");

        Ok(DELIVERED_TEXT)
    }

    /// Tear down a session. Safe for connections that never joined or are
    /// already gone.
    pub async fn disconnect(&self, id: &str) -> Option<Participant> {
        let mut inner = self.inner.write().await;
        let participant = inner.registry.remove_user(id);
        if !inner.hub.disconnect(id) {
            return participant;
        }

        inner.hub.fanout(
            Target::AllExcept(id),
            ChatServerMessage::Message(ChatMessage::now(LEFT_TEXT)),
        );
        tracing::info!(
            connection = %id,
            name = participant.as_ref().map(|p| p.name.as_str()),
            "Chat connection closed"
        );

        participant
    }

    pub async fn get_user(&self, id: &str) -> Option<Participant> {
        self.inner.read().await.registry.get_user(id).cloned()
    }

    pub async fn users_in_room(&self, room: &str) -> Vec<Participant> {
        self.inner.read().await.registry.get_users_in_room(room)
    }

    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.hub.connection_count()
    }
}
