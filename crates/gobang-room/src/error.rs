//! Error types for the room layer.
//!
//! Every variant here is a logical rejection: the requester gets a
//! failure response and nothing changes.

use gobang_protocol::{RoomId, SessionId, Stone};
use gobang_session::SessionError;

/// Errors that can occur during room operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist (never created, or already closed).
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// A live room already uses this id.
    #[error("room {0} already exists")]
    AlreadyExists(RoomId),

    /// Room id 0 is reserved.
    #[error("room id {0} is reserved")]
    InvalidRoomId(RoomId),

    /// The session already occupies a room and must leave it first.
    #[error("session {0} is already in room {1}")]
    SessionInRoom(SessionId, RoomId),

    /// The session is neither a player nor an observer of this room.
    #[error("session {0} is not in room {1}")]
    NotInRoom(SessionId, RoomId),

    /// The session is not one of this room's players.
    #[error("session {0} is not a player of room {1}")]
    NotAPlayer(SessionId, RoomId),

    /// Every player and observer seat is taken.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// Starting needs both player seats filled.
    #[error("room {0} needs two players to start")]
    NotEnoughPlayers(RoomId),

    /// The match in this room is already running.
    #[error("room {0} has already started")]
    AlreadyStarted(RoomId),

    /// Moves are only accepted once the game has started.
    #[error("room {0} is not playing")]
    NotGaming(RoomId),

    /// The stone color sent is not the one whose turn it is.
    #[error("room {room_id}: {got:?} moved but it is {expected:?}'s turn")]
    WrongTurn {
        room_id: RoomId,
        expected: Stone,
        got: Stone,
    },

    /// The player sent a color other than the one it was assigned.
    #[error("room {room_id}: session {session} does not play {color:?}")]
    WrongColor {
        room_id: RoomId,
        session: SessionId,
        color: Stone,
    },

    /// The board refused the move (off the board or occupied).
    #[error("room {room_id}: illegal move at ({x}, {y})")]
    IllegalMove { room_id: RoomId, x: i32, y: i32 },

    /// The session registry rejected the operation.
    #[error(transparent)]
    Session(#[from] SessionError),
}
