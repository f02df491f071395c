//! Core protocol types for Gobang's wire format.
//!
//! Every type in this module travels "on the wire": it is encoded to bytes
//! by [`crate::codec`], sent over a TCP stream, and decoded on the other
//! side. The numbering of [`MessageType`] and of the one-byte enums below is
//! part of the protocol and must never be reordered.

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifies one connected client for as long as its connection lives.
///
/// A newtype wrapper so a `SessionId` can't be passed where a [`RoomId`] is
/// expected. It never goes on the wire; clients only ever see room ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// A room number chosen by the client that creates the room.
///
/// Encoded as a little-endian `i32`. Zero is reserved and is never a live
/// room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub i32);

impl RoomId {
    /// Returns `true` if this id may name a live room.
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// MessageType: the 2-byte type tag
// ---------------------------------------------------------------------------

/// The type tag carried in every frame header.
///
/// `None` exists only so that tag `0` has a name: no handler is ever
/// registered for it and frames carrying it are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MessageType {
    None = 0,
    Heartbeat = 1,
    Enroll = 2,
    CreateRoom = 3,
    EnterRoom = 4,
    ExitRoom = 5,
    StartGame = 6,
    PlaceStone = 7,
}

impl TryFrom<u16> for MessageType {
    type Error = u16;

    fn try_from(tag: u16) -> Result<Self, Self::Error> {
        Ok(match tag {
            0 => Self::None,
            1 => Self::Heartbeat,
            2 => Self::Enroll,
            3 => Self::CreateRoom,
            4 => Self::EnterRoom,
            5 => Self::ExitRoom,
            6 => Self::StartGame,
            7 => Self::PlaceStone,
            other => return Err(other),
        })
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ---------------------------------------------------------------------------
// One-byte enumerations
// ---------------------------------------------------------------------------

/// A stone color. `None` doubles as "empty cell" on the board and as "no
/// color" in requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Stone {
    #[default]
    None = 0,
    Black = 1,
    White = 2,
}

impl Stone {
    /// The color that moves after this one. `None` has no opponent.
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
            Self::None => Self::None,
        }
    }
}

impl TryFrom<u8> for Stone {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Black),
            2 => Ok(Self::White),
            other => Err(other),
        }
    }
}

/// The outcome reported after an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Winner {
    /// Nobody has won yet; play continues.
    #[default]
    None = 0,
    Black = 1,
    White = 2,
    /// The board filled up without a line of five.
    Draw = 3,
}

impl Winner {
    /// Returns `true` if this outcome ends the match.
    pub fn is_final(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl From<Stone> for Winner {
    fn from(stone: Stone) -> Self {
        match stone {
            Stone::None => Self::None,
            Stone::Black => Self::Black,
            Stone::White => Self::White,
        }
    }
}

impl TryFrom<u8> for Winner {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Black),
            2 => Ok(Self::White),
            3 => Ok(Self::Draw),
            other => Err(other),
        }
    }
}

/// Which seat an `EnterRoom` request obtained, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum EnterResult {
    /// Rejected.
    #[default]
    None = 0,
    Player = 1,
    Observer = 2,
}

impl TryFrom<u8> for EnterResult {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Player),
            2 => Ok(Self::Observer),
            other => Err(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload schemas
// ---------------------------------------------------------------------------

/// Heartbeat carries no fields in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Heartbeat;

/// Client → Server: "call me this".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnrollRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnrollResponse {
    pub name: String,
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateRoomRequest {
    pub room_id: RoomId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateRoomResponse {
    pub room_id: RoomId,
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnterRoomRequest {
    pub room_id: RoomId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnterRoomResponse {
    pub room_id: RoomId,
    pub result: EnterResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitRoomRequest {
    pub room_id: RoomId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitRoomResponse {
    pub room_id: RoomId,
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartGameRequest {
    pub room_id: RoomId,
}

/// Sent to every player and observer when a match starts, or to the
/// requester alone when the start is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartGameResponse {
    pub room_id: RoomId,
    pub success: bool,
    /// `true` for the player who moves first (black).
    pub is_first_move: bool,
    /// `true` for observers; they get no color.
    pub is_observer: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceStoneRequest {
    pub room_id: RoomId,
    /// The color the client believes it is playing.
    pub color: Stone,
    pub x: i32,
    pub y: i32,
}

/// Broadcast to the whole room on an accepted move; sent to the requester
/// alone on a rejected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceStoneResponse {
    pub room_id: RoomId,
    pub color: Stone,
    pub x: i32,
    pub y: i32,
    pub success: bool,
    pub winner: Winner,
}

// ---------------------------------------------------------------------------
// Direction-typed messages
// ---------------------------------------------------------------------------

/// Everything a client can ask of the server. One variant per handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Heartbeat,
    Enroll(EnrollRequest),
    CreateRoom(CreateRoomRequest),
    EnterRoom(EnterRoomRequest),
    ExitRoom(ExitRoomRequest),
    StartGame(StartGameRequest),
    PlaceStone(PlaceStoneRequest),
}

impl ClientMessage {
    /// The type tag this message is framed with.
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Heartbeat => MessageType::Heartbeat,
            Self::Enroll(_) => MessageType::Enroll,
            Self::CreateRoom(_) => MessageType::CreateRoom,
            Self::EnterRoom(_) => MessageType::EnterRoom,
            Self::ExitRoom(_) => MessageType::ExitRoom,
            Self::StartGame(_) => MessageType::StartGame,
            Self::PlaceStone(_) => MessageType::PlaceStone,
        }
    }
}

/// Everything the server sends back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    Heartbeat,
    Enroll(EnrollResponse),
    CreateRoom(CreateRoomResponse),
    EnterRoom(EnterRoomResponse),
    ExitRoom(ExitRoomResponse),
    StartGame(StartGameResponse),
    PlaceStone(PlaceStoneResponse),
}

impl ServerMessage {
    /// The type tag this message is framed with.
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Heartbeat => MessageType::Heartbeat,
            Self::Enroll(_) => MessageType::Enroll,
            Self::CreateRoom(_) => MessageType::CreateRoom,
            Self::EnterRoom(_) => MessageType::EnterRoom,
            Self::ExitRoom(_) => MessageType::ExitRoom,
            Self::StartGame(_) => MessageType::StartGame,
            Self::PlaceStone(_) => MessageType::PlaceStone,
        }
    }
}
