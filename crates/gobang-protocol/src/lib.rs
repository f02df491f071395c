//! Wire protocol for Gobang.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`MessageType`], [`ClientMessage`], [`ServerMessage`], the
//!   per-message request/response structs): what travels on the wire.
//! - **Codec** ([`encode_frame`], [`decode_header`], [`Envelope`], the
//!   [`Payload`] trait): how those messages become bytes and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing so.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the dispatch
//! worker (typed requests). It knows nothing about sockets or rooms.
//!
//! ```text
//! Transport (frames) → Protocol (ClientMessage) → Dispatch (handlers)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{
    FrameHeader, Envelope, Payload, PayloadReader, PayloadWriter, HEADER_LEN,
    MAX_FRAME_LEN, decode_header, encode_frame,
};
pub use error::ProtocolError;
pub use types::{
    ClientMessage, CreateRoomRequest, CreateRoomResponse, EnrollRequest,
    EnrollResponse, EnterResult, EnterRoomRequest, EnterRoomResponse,
    ExitRoomRequest, ExitRoomResponse, Heartbeat, MessageType,
    PlaceStoneRequest, PlaceStoneResponse, RoomId, ServerMessage, SessionId,
    StartGameRequest, StartGameResponse, Stone, Winner,
};
