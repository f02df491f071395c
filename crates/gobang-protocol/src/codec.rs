//! Binary codec for Gobang frames and payloads.
//!
//! Wire format of every frame, in both directions:
//!
//! ```text
//! [length: u16][type: u16][payload: length - 4 bytes]
//! ```
//!
//! `length` counts the whole frame, header included. All integers are
//! little-endian. Payload fields are written one after another with no
//! padding:
//!
//! - `i32` → 4 bytes LE
//! - `bool` → 1 byte, `0` or `1`
//! - enums → 1 byte discriminant
//! - strings → `u16` LE byte length, then UTF-8 bytes
//!
//! Decoding is strict: short payloads, trailing bytes, unknown enum values
//! and invalid UTF-8 are all [`ProtocolError`]s.

use crate::ProtocolError;
use crate::types::{
    ClientMessage, CreateRoomRequest, CreateRoomResponse, EnrollRequest,
    EnrollResponse, EnterResult, EnterRoomRequest, EnterRoomResponse,
    ExitRoomRequest, ExitRoomResponse, Heartbeat, MessageType,
    PlaceStoneRequest, PlaceStoneResponse, RoomId, ServerMessage,
    StartGameRequest, StartGameResponse, Stone, Winner,
};

/// Size of the frame header: 2-byte length + 2-byte type.
pub const HEADER_LEN: usize = 4;

/// Largest frame the 16-bit length field can describe.
pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

// ---------------------------------------------------------------------------
// Framing
// ---------------------------------------------------------------------------

/// A decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Total frame length, header included. Always `>= HEADER_LEN`.
    pub length: u16,
    /// Raw type tag. May name no known [`MessageType`].
    pub tag: u16,
}

impl FrameHeader {
    /// Number of payload bytes that follow the header.
    pub fn payload_len(&self) -> usize {
        usize::from(self.length) - HEADER_LEN
    }
}

/// Decodes a frame header from exactly four bytes.
///
/// The fixed-size array makes a short header unrepresentable: callers must
/// finish their exact-length read before decoding.
///
/// # Errors
/// Returns [`ProtocolError::InvalidLength`] if the length field is smaller
/// than the header itself.
pub fn decode_header(bytes: &[u8; HEADER_LEN]) -> Result<FrameHeader, ProtocolError> {
    let length = u16::from_le_bytes([bytes[0], bytes[1]]);
    let tag = u16::from_le_bytes([bytes[2], bytes[3]]);
    if usize::from(length) < HEADER_LEN {
        return Err(ProtocolError::InvalidLength(length));
    }
    Ok(FrameHeader { length, tag })
}

/// Frames a payload: `[4 + len][type][payload]`.
///
/// # Errors
/// Returns [`ProtocolError::PayloadTooLarge`] if the frame would exceed
/// [`MAX_FRAME_LEN`].
pub fn encode_frame(
    msg_type: MessageType,
    payload: Option<&[u8]>,
) -> Result<Vec<u8>, ProtocolError> {
    let payload = payload.unwrap_or_default();
    let total = HEADER_LEN + payload.len();
    let length = u16::try_from(total)
        .map_err(|_| ProtocolError::PayloadTooLarge(payload.len()))?;

    let mut buf = Vec::with_capacity(total);
    buf.extend_from_slice(&length.to_le_bytes());
    buf.extend_from_slice(&(msg_type as u16).to_le_bytes());
    buf.extend_from_slice(payload);
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// One framed protocol unit: a type tag plus its opaque payload bytes.
///
/// Fields are private so an envelope can't change after construction, and
/// construction checks that it fits in a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    tag: u16,
    payload: Vec<u8>,
}

impl Envelope {
    /// Builds an envelope from a raw tag, as read off the wire.
    ///
    /// # Errors
    /// Returns [`ProtocolError::PayloadTooLarge`] if the payload doesn't fit.
    pub fn from_raw(tag: u16, payload: Vec<u8>) -> Result<Self, ProtocolError> {
        if HEADER_LEN + payload.len() > MAX_FRAME_LEN {
            return Err(ProtocolError::PayloadTooLarge(payload.len()));
        }
        Ok(Self { tag, payload })
    }

    /// Builds an envelope for a known message type.
    pub fn new(msg_type: MessageType, payload: Vec<u8>) -> Result<Self, ProtocolError> {
        Self::from_raw(msg_type as u16, payload)
    }

    /// The raw type tag.
    pub fn tag(&self) -> u16 {
        self.tag
    }

    /// The message type, or `None` if the tag is unknown.
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::try_from(self.tag).ok()
    }

    /// The payload bytes (without header).
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Total encoded length: header plus payload.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.payload.len()
    }

    /// Encodes the full frame.
    pub fn to_bytes(&self) -> Vec<u8> {
        // `from_raw` already guaranteed the length fits in a u16.
        let length = self.encoded_len() as u16;
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(&length.to_le_bytes());
        buf.extend_from_slice(&self.tag.to_le_bytes());
        buf.extend_from_slice(&self.payload);
        buf
    }
}

// ---------------------------------------------------------------------------
// Field readers/writers
// ---------------------------------------------------------------------------

/// Appends payload fields to a buffer.
#[derive(Debug, Default)]
pub struct PayloadWriter {
    buf: Vec<u8>,
}

impl PayloadWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn put_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a `u16`-length-prefixed UTF-8 string.
    ///
    /// # Errors
    /// Returns [`ProtocolError::PayloadTooLarge`] if the string is longer
    /// than `u16::MAX` bytes.
    pub fn put_string(&mut self, value: &str) -> Result<(), ProtocolError> {
        let len = u16::try_from(value.len())
            .map_err(|_| ProtocolError::PayloadTooLarge(value.len()))?;
        self.buf.extend_from_slice(&len.to_le_bytes());
        self.buf.extend_from_slice(value.as_bytes());
        Ok(())
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Reads payload fields from a byte slice, front to back.
#[derive(Debug)]
pub struct PayloadReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        let available = self.buf.len() - self.pos;
        if available < n {
            return Err(ProtocolError::InsufficientData { needed: n, available });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ProtocolError::MalformedPayload(format!(
                "invalid bool byte {other}"
            ))),
        }
    }

    pub fn read_i32(&mut self) -> Result<i32, ProtocolError> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_string(&mut self) -> Result<String, ProtocolError> {
        let b = self.take(2)?;
        let len = usize::from(u16::from_le_bytes([b[0], b[1]]));
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| ProtocolError::MalformedPayload(format!("invalid UTF-8: {e}")))
    }

    fn read_room_id(&mut self) -> Result<RoomId, ProtocolError> {
        self.read_i32().map(RoomId)
    }

    fn read_stone(&mut self) -> Result<Stone, ProtocolError> {
        let byte = self.read_u8()?;
        Stone::try_from(byte).map_err(|b| {
            ProtocolError::MalformedPayload(format!("unknown stone {b}"))
        })
    }

    fn read_winner(&mut self) -> Result<Winner, ProtocolError> {
        let byte = self.read_u8()?;
        Winner::try_from(byte).map_err(|b| {
            ProtocolError::MalformedPayload(format!("unknown winner {b}"))
        })
    }

    fn read_enter_result(&mut self) -> Result<EnterResult, ProtocolError> {
        let byte = self.read_u8()?;
        EnterResult::try_from(byte).map_err(|b| {
            ProtocolError::MalformedPayload(format!("unknown enter result {b}"))
        })
    }

    /// Succeeds only if every byte has been consumed.
    pub fn finish(self) -> Result<(), ProtocolError> {
        match self.buf.len() - self.pos {
            0 => Ok(()),
            rest => Err(ProtocolError::TrailingBytes(rest)),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload trait
// ---------------------------------------------------------------------------

/// A payload schema with an explicit field-by-field encoding.
pub trait Payload: Sized {
    /// The frame type this payload travels under.
    const MESSAGE_TYPE: MessageType;

    /// Writes this payload's fields in schema order.
    fn write(&self, w: &mut PayloadWriter) -> Result<(), ProtocolError>;

    /// Reads this payload's fields in schema order.
    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ProtocolError>;

    /// Encodes the payload bytes (no header).
    fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut w = PayloadWriter::new();
        self.write(&mut w)?;
        Ok(w.into_inner())
    }

    /// Decodes a complete payload, rejecting trailing bytes.
    fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let mut r = PayloadReader::new(bytes);
        let value = Self::read(&mut r)?;
        r.finish()?;
        Ok(value)
    }

    /// Wraps the encoded payload in an [`Envelope`].
    fn to_envelope(&self) -> Result<Envelope, ProtocolError> {
        Envelope::new(Self::MESSAGE_TYPE, self.encode()?)
    }
}

impl Payload for Heartbeat {
    const MESSAGE_TYPE: MessageType = MessageType::Heartbeat;

    fn write(&self, _w: &mut PayloadWriter) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read(_r: &mut PayloadReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Heartbeat)
    }
}

impl Payload for EnrollRequest {
    const MESSAGE_TYPE: MessageType = MessageType::Enroll;

    fn write(&self, w: &mut PayloadWriter) -> Result<(), ProtocolError> {
        w.put_string(&self.name)
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self { name: r.read_string()? })
    }
}

impl Payload for EnrollResponse {
    const MESSAGE_TYPE: MessageType = MessageType::Enroll;

    fn write(&self, w: &mut PayloadWriter) -> Result<(), ProtocolError> {
        w.put_string(&self.name)?;
        w.put_bool(self.success);
        Ok(())
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            name: r.read_string()?,
            success: r.read_bool()?,
        })
    }
}

impl Payload for CreateRoomRequest {
    const MESSAGE_TYPE: MessageType = MessageType::CreateRoom;

    fn write(&self, w: &mut PayloadWriter) -> Result<(), ProtocolError> {
        w.put_i32(self.room_id.0);
        Ok(())
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self { room_id: r.read_room_id()? })
    }
}

impl Payload for CreateRoomResponse {
    const MESSAGE_TYPE: MessageType = MessageType::CreateRoom;

    fn write(&self, w: &mut PayloadWriter) -> Result<(), ProtocolError> {
        w.put_i32(self.room_id.0);
        w.put_bool(self.success);
        Ok(())
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            room_id: r.read_room_id()?,
            success: r.read_bool()?,
        })
    }
}

impl Payload for EnterRoomRequest {
    const MESSAGE_TYPE: MessageType = MessageType::EnterRoom;

    fn write(&self, w: &mut PayloadWriter) -> Result<(), ProtocolError> {
        w.put_i32(self.room_id.0);
        Ok(())
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self { room_id: r.read_room_id()? })
    }
}

impl Payload for EnterRoomResponse {
    const MESSAGE_TYPE: MessageType = MessageType::EnterRoom;

    fn write(&self, w: &mut PayloadWriter) -> Result<(), ProtocolError> {
        w.put_i32(self.room_id.0);
        w.put_u8(self.result as u8);
        Ok(())
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            room_id: r.read_room_id()?,
            result: r.read_enter_result()?,
        })
    }
}

impl Payload for ExitRoomRequest {
    const MESSAGE_TYPE: MessageType = MessageType::ExitRoom;

    fn write(&self, w: &mut PayloadWriter) -> Result<(), ProtocolError> {
        w.put_i32(self.room_id.0);
        Ok(())
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self { room_id: r.read_room_id()? })
    }
}

impl Payload for ExitRoomResponse {
    const MESSAGE_TYPE: MessageType = MessageType::ExitRoom;

    fn write(&self, w: &mut PayloadWriter) -> Result<(), ProtocolError> {
        w.put_i32(self.room_id.0);
        w.put_bool(self.success);
        Ok(())
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            room_id: r.read_room_id()?,
            success: r.read_bool()?,
        })
    }
}

impl Payload for StartGameRequest {
    const MESSAGE_TYPE: MessageType = MessageType::StartGame;

    fn write(&self, w: &mut PayloadWriter) -> Result<(), ProtocolError> {
        w.put_i32(self.room_id.0);
        Ok(())
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self { room_id: r.read_room_id()? })
    }
}

impl Payload for StartGameResponse {
    const MESSAGE_TYPE: MessageType = MessageType::StartGame;

    fn write(&self, w: &mut PayloadWriter) -> Result<(), ProtocolError> {
        w.put_i32(self.room_id.0);
        w.put_bool(self.success);
        w.put_bool(self.is_first_move);
        w.put_bool(self.is_observer);
        Ok(())
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            room_id: r.read_room_id()?,
            success: r.read_bool()?,
            is_first_move: r.read_bool()?,
            is_observer: r.read_bool()?,
        })
    }
}

impl Payload for PlaceStoneRequest {
    const MESSAGE_TYPE: MessageType = MessageType::PlaceStone;

    fn write(&self, w: &mut PayloadWriter) -> Result<(), ProtocolError> {
        w.put_i32(self.room_id.0);
        w.put_u8(self.color as u8);
        w.put_i32(self.x);
        w.put_i32(self.y);
        Ok(())
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            room_id: r.read_room_id()?,
            color: r.read_stone()?,
            x: r.read_i32()?,
            y: r.read_i32()?,
        })
    }
}

impl Payload for PlaceStoneResponse {
    const MESSAGE_TYPE: MessageType = MessageType::PlaceStone;

    fn write(&self, w: &mut PayloadWriter) -> Result<(), ProtocolError> {
        w.put_i32(self.room_id.0);
        w.put_u8(self.color as u8);
        w.put_i32(self.x);
        w.put_i32(self.y);
        w.put_bool(self.success);
        w.put_u8(self.winner as u8);
        Ok(())
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            room_id: r.read_room_id()?,
            color: r.read_stone()?,
            x: r.read_i32()?,
            y: r.read_i32()?,
            success: r.read_bool()?,
            winner: r.read_winner()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Direction-typed envelopes
// ---------------------------------------------------------------------------

impl ClientMessage {
    /// Decodes a request from a received envelope.
    ///
    /// Returns `Ok(None)` for tags that have no request handler (tag `0`
    /// and unknown tags); the caller drops those frames.
    ///
    /// # Errors
    /// Returns a [`ProtocolError`] if the payload doesn't match the schema.
    pub fn from_envelope(envelope: &Envelope) -> Result<Option<Self>, ProtocolError> {
        let payload = envelope.payload();
        let msg = match envelope.message_type() {
            None | Some(MessageType::None) => return Ok(None),
            Some(MessageType::Heartbeat) => {
                Heartbeat::decode(payload)?;
                Self::Heartbeat
            }
            Some(MessageType::Enroll) => Self::Enroll(EnrollRequest::decode(payload)?),
            Some(MessageType::CreateRoom) => {
                Self::CreateRoom(CreateRoomRequest::decode(payload)?)
            }
            Some(MessageType::EnterRoom) => {
                Self::EnterRoom(EnterRoomRequest::decode(payload)?)
            }
            Some(MessageType::ExitRoom) => Self::ExitRoom(ExitRoomRequest::decode(payload)?),
            Some(MessageType::StartGame) => {
                Self::StartGame(StartGameRequest::decode(payload)?)
            }
            Some(MessageType::PlaceStone) => {
                Self::PlaceStone(PlaceStoneRequest::decode(payload)?)
            }
        };
        Ok(Some(msg))
    }

    /// Encodes this request as an envelope (client side).
    pub fn to_envelope(&self) -> Result<Envelope, ProtocolError> {
        match self {
            Self::Heartbeat => Heartbeat.to_envelope(),
            Self::Enroll(m) => m.to_envelope(),
            Self::CreateRoom(m) => m.to_envelope(),
            Self::EnterRoom(m) => m.to_envelope(),
            Self::ExitRoom(m) => m.to_envelope(),
            Self::StartGame(m) => m.to_envelope(),
            Self::PlaceStone(m) => m.to_envelope(),
        }
    }
}

impl ServerMessage {
    /// Decodes a response from a received envelope (client side).
    ///
    /// Returns `Ok(None)` for tags the server never sends.
    pub fn from_envelope(envelope: &Envelope) -> Result<Option<Self>, ProtocolError> {
        let payload = envelope.payload();
        let msg = match envelope.message_type() {
            None | Some(MessageType::None) => return Ok(None),
            Some(MessageType::Heartbeat) => {
                Heartbeat::decode(payload)?;
                Self::Heartbeat
            }
            Some(MessageType::Enroll) => Self::Enroll(EnrollResponse::decode(payload)?),
            Some(MessageType::CreateRoom) => {
                Self::CreateRoom(CreateRoomResponse::decode(payload)?)
            }
            Some(MessageType::EnterRoom) => {
                Self::EnterRoom(EnterRoomResponse::decode(payload)?)
            }
            Some(MessageType::ExitRoom) => Self::ExitRoom(ExitRoomResponse::decode(payload)?),
            Some(MessageType::StartGame) => {
                Self::StartGame(StartGameResponse::decode(payload)?)
            }
            Some(MessageType::PlaceStone) => {
                Self::PlaceStone(PlaceStoneResponse::decode(payload)?)
            }
        };
        Ok(Some(msg))
    }

    /// Encodes this response as an envelope.
    pub fn to_envelope(&self) -> Result<Envelope, ProtocolError> {
        match self {
            Self::Heartbeat => Heartbeat.to_envelope(),
            Self::Enroll(m) => m.to_envelope(),
            Self::CreateRoom(m) => m.to_envelope(),
            Self::EnterRoom(m) => m.to_envelope(),
            Self::ExitRoom(m) => m.to_envelope(),
            Self::StartGame(m) => m.to_envelope(),
            Self::PlaceStone(m) => m.to_envelope(),
        }
    }
}
