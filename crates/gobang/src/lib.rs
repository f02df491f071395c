//! # Gobang
//!
//! Authoritative server for five-in-a-row (Gomoku) on a 15×15 board.
//!
//! Clients connect over TCP, pick a display name, create or enter numbered
//! rooms, and play. The server owns every piece of game state: who is in
//! which room, whose turn it is, and when someone has won.
//!
//! ## Architecture
//!
//! ```text
//! TcpTransport ──→ reader task ──┐
//!                                ├──→ Dispatcher ──→ handlers ──→ writer tasks
//! TcpTransport ──→ reader task ──┘     (owns SessionRegistry + RoomRegistry)
//! ```
//!
//! All state lives in a single [`Dispatcher`] task; connections talk to it
//! only through its command queue.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gobang::prelude::*;
//!
//! # async fn start() -> Result<(), GobangError> {
//! let server = GobangServer::builder()
//!     .config(ServerConfig::default())
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod connection;
mod dispatch;
mod error;
mod handler;
mod server;

pub use config::{DEFAULT_PORT, ServerConfig};
pub use dispatch::{Command, CommandSender, Dispatcher};
pub use error::GobangError;
pub use server::{GobangServer, GobangServerBuilder};

/// Common imports for running a Gobang server or talking to one.
pub mod prelude {
    pub use crate::{GobangError, GobangServer, GobangServerBuilder, ServerConfig};
    pub use gobang_protocol::{
        ClientMessage, Envelope, MessageType, Payload, RoomId, ServerMessage,
        SessionId, Stone, Winner,
    };
}
