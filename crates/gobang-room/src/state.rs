//! Room lifecycle state and seating limits.

use std::fmt;

/// Player seats per room.
pub const MAX_PLAYERS: usize = 2;

/// Observer seats per room.
pub const MAX_OBSERVERS: usize = 2;

/// The lifecycle state of a room.
///
/// ```text
/// Awaiting → Gaming → (closed: removed from the registry)
/// ```
///
/// - **Awaiting**: created, seats filling up, no moves accepted.
/// - **Gaming**: a player started the match; moves are accepted until a
///   win or draw closes the room.
///
/// There is no `Closed` variant: a closed room no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoomState {
    #[default]
    Awaiting,
    Gaming,
}

impl RoomState {
    /// Returns `true` if moves are accepted.
    pub fn is_gaming(self) -> bool {
        matches!(self, Self::Gaming)
    }
}

impl fmt::Display for RoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Awaiting => write!(f, "Awaiting"),
            Self::Gaming => write!(f, "Gaming"),
        }
    }
}
