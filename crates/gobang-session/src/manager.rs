//! The session registry: every live connection, keyed by [`SessionId`].
//!
//! Like the room registry, this is a plain `HashMap` with no locking. It is
//! owned by the dispatch worker and only ever touched from that one task.

use std::collections::HashMap;

use gobang_protocol::{RoomId, ServerMessage, SessionId};

use crate::{Session, SessionError};

/// Registry of connected sessions.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a freshly accepted session.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyRegistered`] if the id is taken.
    pub fn register(&mut self, session: Session) -> Result<(), SessionError> {
        let id = session.id();
        if self.sessions.contains_key(&id) {
            return Err(SessionError::AlreadyRegistered(id));
        }
        tracing::info!(session_id = %id, peer = %session.peer(), "session registered");
        self.sessions.insert(id, session);
        Ok(())
    }

    /// Removes a session, returning it if it was registered.
    ///
    /// Removing an unknown id is not an error: a connection can be reported
    /// closed by both its reader and its writer.
    pub fn remove(&mut self, id: SessionId) -> Option<Session> {
        let removed = self.sessions.remove(&id);
        if let Some(session) = &removed {
            tracing::info!(session_id = %id, name = %session.name(), "session removed");
        }
        removed
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    /// Changes a session's display name.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] for an unknown id.
    pub fn rename(
        &mut self,
        id: SessionId,
        name: impl Into<String>,
    ) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::NotFound(id))?;
        let name = name.into();
        tracing::info!(session_id = %id, from = %session.name(), to = %name, "session renamed");
        session.set_name(name);
        Ok(())
    }

    /// Records that a session now occupies `room`.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] for an unknown id.
    pub fn enter_room(
        &mut self,
        id: SessionId,
        room: RoomId,
    ) -> Result<(), SessionError> {
        self.sessions
            .get_mut(&id)
            .ok_or(SessionError::NotFound(id))?
            .set_room(Some(room));
        Ok(())
    }

    /// Clears a session's room membership. Unknown ids are ignored, since
    /// the session may be mid-teardown.
    pub fn exit_room(&mut self, id: SessionId) {
        if let Some(session) = self.sessions.get_mut(&id) {
            session.set_room(None);
        }
    }

    /// Queues `msg` for the session's writer.
    ///
    /// Returns `false` if the session is unknown or its writer is gone.
    pub fn send(&self, id: SessionId, msg: ServerMessage) -> bool {
        match self.sessions.get(&id) {
            Some(session) => session.send(msg),
            None => {
                tracing::debug!(session_id = %id, "dropping message for unknown session");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
