//! Session table and fanout
//!
//! Every live connection owns an unbounded outbox. The socket task drains it,
//! so pushing a message never waits on another connection.

use crate::types::{new_connection_id, ConnectionId};
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc;

pub type Outbox<M> = mpsc::UnboundedReceiver<M>;

/// Who receives a fanned-out message
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// Exactly one connection
    Connection(&'a str),
    /// Every connection except one (usually the sender)
    AllExcept(&'a str),
    /// Every connection
    All,
    /// Every member of a room except one
    RoomExcept { room: &'a str, except: &'a str },
    /// Every member of a room
    Room(&'a str),
}

#[derive(Debug)]
struct Session<M> {
    tx: mpsc::UnboundedSender<M>,
    rooms: HashSet<String>,
}

#[derive(Debug)]
pub struct Hub<M> {
    sessions: HashMap<ConnectionId, Session<M>>,
}

impl<M> Default for Hub<M> {
    fn default() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }
}

impl<M: Clone> Hub<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and hand back its id and outbox
    pub fn connect(&mut self) -> (ConnectionId, Outbox<M>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = new_connection_id();
        self.sessions.insert(
            id.clone(),
            Session {
                tx,
                rooms: HashSet::new(),
            },
        );
        (id, rx)
    }

    /// Drop a session and its room subscriptions. Returns false if unknown.
    pub fn disconnect(&mut self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn is_connected(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn join_room(&mut self, id: &str, room: &str) -> bool {
        match self.sessions.get_mut(id) {
            Some(session) => {
                session.rooms.insert(room.to_string());
                true
            }
            None => false,
        }
    }

    pub fn leave_room(&mut self, id: &str, room: &str) -> bool {
        self.sessions
            .get_mut(id)
            .map(|s| s.rooms.remove(room))
            .unwrap_or(false)
    }

    pub fn connection_count(&self) -> usize {
        self.sessions.len()
    }

    /// Ids of sessions subscribed to a room
    pub fn room_members(&self, room: &str) -> Vec<ConnectionId> {
        self.sessions
            .iter()
            .filter(|(_, s)| s.rooms.contains(room))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Deliver `msg` to every session matching `target`.
    /// Returns how many outboxes accepted it; closed outboxes are skipped.
    pub fn fanout(&self, target: Target<'_>, msg: M) -> usize {
        if let Target::Connection(id) = target {
            return match self.sessions.get(id) {
                Some(session) if session.tx.send(msg).is_ok() => 1,
                _ => 0,
            };
        }

        let mut delivered = 0;
        for (id, session) in &self.sessions {
            let wanted = match target {
                Target::Connection(_) => false,
                Target::AllExcept(except) => id != except,
                Target::All => true,
                Target::RoomExcept { room, except } => {
                    id != except && session.rooms.contains(room)
                }
                Target::Room(room) => session.rooms.contains(room),
            };
            if wanted && session.tx.send(msg.clone()).is_ok() {
                delivered += 1;
            }
        }

        tracing::trace!(?target, delivered, "Fanout");
        delivered
    }

    pub fn send_to(&self, id: &str, msg: M) -> bool {
        self.fanout(Target::Connection(id), msg) == 1
    }

    pub fn broadcast(&self, except: &str, msg: M) -> usize {
        self.fanout(Target::AllExcept(except), msg)
    }

    pub fn emit_all(&self, msg: M) -> usize {
        self.fanout(Target::All, msg)
    }

    pub fn broadcast_to_room(&self, room: &str, except: &str, msg: M) -> usize {
        self.fanout(Target::RoomExcept { room, except }, msg)
    }

    pub fn emit_to_room(&self, room: &str, msg: M) -> usize {
        self.fanout(Target::Room(room), msg)
    }
}
