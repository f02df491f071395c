//! A single connected client, as seen by the dispatch worker.

use std::net::SocketAddr;

use gobang_protocol::{RoomId, ServerMessage, SessionId};
use tokio::sync::mpsc;

/// Channel feeding a connection's writer task.
///
/// Unbounded, so the dispatch worker never waits on a slow client. Messages
/// come out in the order they were queued.
pub type SessionSender = mpsc::UnboundedSender<ServerMessage>;

/// Display name given to every session until it enrolls.
pub const DEFAULT_NAME: &str = "Player Unknown";

/// One connected client.
///
/// A session exists from the moment its connection is registered with the
/// dispatch worker until that connection closes. Room membership is tracked
/// here as well as in the room itself; the room registry keeps the two in
/// sync.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    peer: SocketAddr,
    name: String,
    room: Option<RoomId>,
    outbound: SessionSender,
}

impl Session {
    /// Creates a session that is not in any room.
    pub fn new(
        id: SessionId,
        peer: SocketAddr,
        name: impl Into<String>,
        outbound: SessionSender,
    ) -> Self {
        Self {
            id,
            peer,
            name: name.into(),
            room: None,
            outbound,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The room this session occupies, as player or observer.
    pub fn room(&self) -> Option<RoomId> {
        self.room
    }

    /// Returns `true` if the session occupies any room.
    pub fn in_room(&self) -> bool {
        self.room.is_some()
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_room(&mut self, room: Option<RoomId>) {
        self.room = room;
    }

    /// Queues a message for this session's writer.
    ///
    /// Returns `false` if the writer has already gone away; the matching
    /// disconnect will reach the dispatch worker on its own.
    pub fn send(&self, msg: ServerMessage) -> bool {
        self.outbound.send(msg).is_ok()
    }
}
