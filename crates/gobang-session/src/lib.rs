//! Session tracking for Gobang.
//!
//! A [`Session`] is one connected client: its display name, the room it
//! occupies (if any), and the outbound channel that feeds its socket writer.
//! The [`SessionRegistry`] holds all of them.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)  ← keeps session room membership in sync
//!     ↕
//! Session Layer (this crate)  ← who is connected, and how to reach them
//!     ↕
//! Protocol Layer (below)  ← provides SessionId, RoomId, ServerMessage
//! ```

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::SessionRegistry;
pub use session::{DEFAULT_NAME, Session, SessionSender};
