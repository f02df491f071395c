//! Room registry: creates rooms, seats sessions, and runs the match state
//! machine.
//!
//! Every operation that changes who is in which room takes the
//! [`SessionRegistry`] as well, so the room's seat lists and each session's
//! `room` field never disagree.
//!
//! # Concurrency note
//!
//! `RoomRegistry` is a plain `HashMap`, not a concurrent one. It is owned
//! by the dispatch worker together with the session registry, and all
//! access goes through that worker's command queue.

use std::collections::HashMap;

use gobang_protocol::{EnterResult, RoomId, SessionId, Stone, Winner};
use gobang_session::{SessionError, SessionRegistry};

use crate::{Room, RoomError};

/// Who should hear about a successful start, and in which role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartPlan {
    /// The initiator. Moves first, as black.
    pub first: SessionId,
    /// The other player. Moves second, as white.
    pub second: SessionId,
    pub observers: Vec<SessionId>,
}

/// The result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    /// [`Winner::None`] while play continues.
    pub winner: Winner,
    /// Everyone who was in the room when the move landed.
    pub audience: Vec<SessionId>,
    /// `true` if the move ended the match and the room is gone.
    pub room_closed: bool,
}

/// What happened to the room after a session left it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// The room still has a player and lives on.
    Left,
    /// The last player left; the room was removed and its observers
    /// released.
    RoomClosed,
}

/// All live rooms, keyed by their client-chosen id.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, room_id: RoomId) -> Option<&Room> {
        self.rooms.get(&room_id)
    }

    pub fn contains(&self, room_id: RoomId) -> bool {
        self.rooms.contains_key(&room_id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Creates room `room_id` with `session` as its first player.
    ///
    /// # Errors
    /// - [`RoomError::SessionInRoom`] if the session is already seated
    ///   somewhere
    /// - [`RoomError::InvalidRoomId`] for id 0
    /// - [`RoomError::AlreadyExists`] if the id is taken
    pub fn create(
        &mut self,
        sessions: &mut SessionRegistry,
        room_id: RoomId,
        session: SessionId,
    ) -> Result<(), RoomError> {
        ensure_roomless(sessions, session)?;
        if !room_id.is_valid() {
            return Err(RoomError::InvalidRoomId(room_id));
        }
        if self.rooms.contains_key(&room_id) {
            return Err(RoomError::AlreadyExists(room_id));
        }

        sessions.enter_room(session, room_id)?;
        self.rooms.insert(room_id, Room::new(room_id, session));
        tracing::info!(%room_id, creator = %session, "room created");
        Ok(())
    }

    /// Seats `session` in `room_id`, as a player if a player seat is free,
    /// otherwise as an observer. Never changes the room's state.
    ///
    /// # Errors
    /// - [`RoomError::SessionInRoom`] if the session is already seated
    /// - [`RoomError::NotFound`] for an unknown room
    /// - [`RoomError::RoomFull`] when every seat is taken
    pub fn join(
        &mut self,
        sessions: &mut SessionRegistry,
        room_id: RoomId,
        session: SessionId,
    ) -> Result<EnterResult, RoomError> {
        ensure_roomless(sessions, session)?;
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        let seat = room.seat(session).ok_or(RoomError::RoomFull(room_id))?;
        sessions.enter_room(session, room_id)?;
        tracing::info!(%room_id, %session, ?seat, "session entered room");
        Ok(seat)
    }

    /// Removes `session` from `room_id`.
    ///
    /// If that leaves the room without players, the room is removed and
    /// every observer is released too.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] for an unknown room
    /// - [`RoomError::NotInRoom`] if the session holds no seat there
    pub fn leave(
        &mut self,
        sessions: &mut SessionRegistry,
        room_id: RoomId,
        session: SessionId,
    ) -> Result<Departure, RoomError> {
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        if !room.unseat(session) {
            return Err(RoomError::NotInRoom(session, room_id));
        }
        sessions.exit_room(session);
        tracing::info!(%room_id, %session, "session left room");

        if room.players().is_empty() {
            self.close(sessions, room_id);
            return Ok(Departure::RoomClosed);
        }
        Ok(Departure::Left)
    }

    /// Starts the match in `room_id` on behalf of one of its players.
    ///
    /// The initiator becomes the first mover and plays black for the rest
    /// of the match.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] for an unknown room
    /// - [`RoomError::NotAPlayer`] if the session holds no player seat
    /// - [`RoomError::NotEnoughPlayers`] unless both player seats are taken
    /// - [`RoomError::AlreadyStarted`] if the match is already running
    pub fn start(
        &mut self,
        room_id: RoomId,
        session: SessionId,
    ) -> Result<StartPlan, RoomError> {
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        if !room.is_player(session) {
            return Err(RoomError::NotAPlayer(session, room_id));
        }
        if !room.is_full() {
            return Err(RoomError::NotEnoughPlayers(room_id));
        }
        if room.state().is_gaming() {
            return Err(RoomError::AlreadyStarted(room_id));
        }

        let second = room
            .players()
            .iter()
            .copied()
            .find(|&p| p != session)
            .ok_or(RoomError::NotEnoughPlayers(room_id))?;
        room.begin(session);
        tracing::info!(%room_id, first = %session, %second, "game started");

        Ok(StartPlan {
            first: session,
            second,
            observers: room.observers().to_vec(),
        })
    }

    /// Plays `color` at `(x, y)` in `room_id`.
    ///
    /// A move that wins or draws closes the room after the audience has
    /// been captured, so the caller can still broadcast the result to
    /// everyone who was watching.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] for an unknown room
    /// - [`RoomError::NotAPlayer`] if the session holds no player seat
    /// - [`RoomError::NotGaming`] before the match has started
    /// - [`RoomError::WrongTurn`] if `color` is not the side to move
    /// - [`RoomError::WrongColor`] if `color` is not the session's own
    /// - [`RoomError::IllegalMove`] if the board refuses the cell
    pub fn place(
        &mut self,
        sessions: &mut SessionRegistry,
        room_id: RoomId,
        session: SessionId,
        color: Stone,
        x: i32,
        y: i32,
    ) -> Result<MoveReport, RoomError> {
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        if !room.is_player(session) {
            return Err(RoomError::NotAPlayer(session, room_id));
        }
        if !room.state().is_gaming() {
            return Err(RoomError::NotGaming(room_id));
        }
        let expected = room.board().turn();
        if color != expected {
            return Err(RoomError::WrongTurn {
                room_id,
                expected,
                got: color,
            });
        }
        if room.color_of(session) != Some(color) {
            return Err(RoomError::WrongColor {
                room_id,
                session,
                color,
            });
        }

        let winner = room
            .board_mut()
            .place(x, y)
            .ok_or(RoomError::IllegalMove { room_id, x, y })?;
        let audience: Vec<SessionId> = room.members().collect();
        tracing::debug!(%room_id, %session, ?color, x, y, "stone placed");

        let room_closed = winner.is_final();
        if room_closed {
            tracing::info!(%room_id, ?winner, "game finished");
            self.close(sessions, room_id);
        }

        Ok(MoveReport {
            winner,
            audience,
            room_closed,
        })
    }

    /// Handles a dropped connection.
    ///
    /// If `session` was seated anywhere, player or observer, its whole room
    /// is closed and every other member released. Returns the closed room,
    /// or `None` if the session was not in one.
    pub fn disconnect(
        &mut self,
        sessions: &mut SessionRegistry,
        session: SessionId,
    ) -> Option<RoomId> {
        let room_id = sessions.get(session)?.room()?;
        if !self.rooms.contains_key(&room_id) {
            tracing::warn!(%session, %room_id, "stale room membership");
            sessions.exit_room(session);
            return None;
        }
        tracing::info!(%room_id, %session, "member disconnected");
        self.close(sessions, room_id);
        Some(room_id)
    }

    /// Removes a room and releases everyone still seated in it.
    fn close(&mut self, sessions: &mut SessionRegistry, room_id: RoomId) {
        if let Some(room) = self.rooms.remove(&room_id) {
            for member in room.members() {
                sessions.exit_room(member);
            }
            tracing::info!(%room_id, "room closed");
        }
    }
}

fn ensure_roomless(
    sessions: &SessionRegistry,
    session: SessionId,
) -> Result<(), RoomError> {
    let current = sessions
        .get(session)
        .ok_or(SessionError::NotFound(session))?;
    match current.room() {
        Some(room_id) => Err(RoomError::SessionInRoom(session, room_id)),
        None => Ok(()),
    }
}
