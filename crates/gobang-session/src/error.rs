//! Error types for the session layer.

use gobang_protocol::SessionId;

/// Errors that can occur during session management.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No session exists with this id. Usually the connection has already
    /// been torn down.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// A session with this id is already registered. Ids come from a
    /// monotonic counter, so this points at a bug in the accept loop.
    #[error("session {0} is already registered")]
    AlreadyRegistered(SessionId),
}
