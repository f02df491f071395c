//! A single room: its seats, its state, and its board.

use gobang_protocol::{EnterResult, RoomId, SessionId, Stone};

use crate::{Board, MAX_OBSERVERS, MAX_PLAYERS, RoomState};

/// One match container.
///
/// Players and observers are kept in join order. The room itself does not
/// enforce "one room per session"; that is the registry's job, since it is
/// the only place that can see every room.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    state: RoomState,
    players: Vec<SessionId>,
    observers: Vec<SessionId>,
    board: Board,
    /// The player who started the match and plays black.
    black: Option<SessionId>,
}

impl Room {
    /// A fresh `Awaiting` room with `creator` in the first player seat.
    pub fn new(id: RoomId, creator: SessionId) -> Self {
        Self {
            id,
            state: RoomState::Awaiting,
            players: vec![creator],
            observers: Vec::with_capacity(MAX_OBSERVERS),
            board: Board::new(),
            black: None,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    pub fn players(&self) -> &[SessionId] {
        &self.players
    }

    pub fn observers(&self) -> &[SessionId] {
        &self.observers
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_player(&self, session: SessionId) -> bool {
        self.players.contains(&session)
    }

    pub fn is_observer(&self, session: SessionId) -> bool {
        self.observers.contains(&session)
    }

    /// Returns `true` if both player seats are taken.
    pub fn is_full(&self) -> bool {
        self.players.len() == MAX_PLAYERS
    }

    /// The color `session` plays in this match, or `None` before the start
    /// or for anyone without a player seat.
    pub fn color_of(&self, session: SessionId) -> Option<Stone> {
        let black = self.black?;
        if session == black {
            Some(Stone::Black)
        } else if self.is_player(session) {
            Some(Stone::White)
        } else {
            None
        }
    }

    /// Every occupant: players first, then observers.
    pub fn members(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.players.iter().chain(self.observers.iter()).copied()
    }

    /// Seats `session` as a player if one is free, otherwise as an
    /// observer. Returns `None` if neither kind of seat is available.
    pub(crate) fn seat(&mut self, session: SessionId) -> Option<EnterResult> {
        if self.players.len() < MAX_PLAYERS && !self.is_player(session) {
            self.players.push(session);
            Some(EnterResult::Player)
        } else if self.observers.len() < MAX_OBSERVERS && !self.is_observer(session) {
            self.observers.push(session);
            Some(EnterResult::Observer)
        } else {
            None
        }
    }

    /// Removes `session` from whichever seat it holds.
    pub(crate) fn unseat(&mut self, session: SessionId) -> bool {
        if let Some(pos) = self.players.iter().position(|&p| p == session) {
            self.players.remove(pos);
            true
        } else if let Some(pos) = self.observers.iter().position(|&o| o == session) {
            self.observers.remove(pos);
            true
        } else {
            false
        }
    }

    /// Moves the room to `Gaming` with `first` holding black.
    pub(crate) fn begin(&mut self, first: SessionId) {
        self.state = RoomState::Gaming;
        self.black = Some(first);
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}
