//! Room-scoped presence registry
//!
//! Tracks which connection joined which room under which name. A `(room, name)`
//! pair is unique, and each connection maps to at most one participant.

use crate::types::{normalize, ConnectionId, Participant};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresenceError {
    #[error("Username and room are required!")]
    Validation,

    #[error("Username is already taken!")]
    DuplicateName,

    #[error("Connection has already joined a room")]
    AlreadyJoined,
}

#[derive(Debug, Default)]
pub struct PresenceRegistry {
    users: HashMap<ConnectionId, Participant>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection under a name in a room
    pub fn add_user(
        &mut self,
        id: &str,
        name: &str,
        room: &str,
    ) -> Result<Participant, PresenceError> {
        let name = normalize(name);
        let room = normalize(room);

        if name.is_empty() || room.is_empty() {
            return Err(PresenceError::Validation);
        }

        if self
            .users
            .values()
            .any(|u| u.room == room && u.name == name)
        {
            return Err(PresenceError::DuplicateName);
        }

        if self.users.contains_key(id) {
            return Err(PresenceError::AlreadyJoined);
        }

        let participant = Participant {
            id: id.to_string(),
            name,
            room,
        };
        self.users.insert(participant.id.clone(), participant.clone());
        Ok(participant)
    }

    /// Remove a connection's participant. Unknown ids are fine.
    pub fn remove_user(&mut self, id: &str) -> Option<Participant> {
        self.users.remove(id)
    }

    pub fn get_user(&self, id: &str) -> Option<&Participant> {
        self.users.get(id)
    }

    /// All participants in a room; the query is normalized like stored rooms
    pub fn get_users_in_room(&self, room: &str) -> Vec<Participant> {
        let room = normalize(room);
        self.users
            .values()
            .filter(|u| u.room == room)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
