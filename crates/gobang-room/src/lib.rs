//! Rooms and the board engine for Gobang.
//!
//! A room holds up to two players and two observers around a single
//! [`Board`]. Rooms are created with a client-chosen id, started by one of
//! their players, and removed when the match ends, the last player
//! leaves, or any member disconnects.
//!
//! # Key types
//!
//! - [`Board`]: the 15×15 grid, turn order, and win/draw detection
//! - [`Room`]: seats, state, and board for one match
//! - [`RoomRegistry`]: every live room, and the operations on them
//! - [`RoomState`]: `Awaiting` or `Gaming`

mod board;
mod error;
mod manager;
mod room;
mod state;

pub use board::{BOARD_SIZE, Board, CELL_COUNT, WIN_LENGTH};
pub use error::RoomError;
pub use manager::{Departure, MoveReport, RoomRegistry, StartPlan};
pub use room::Room;
pub use state::{MAX_OBSERVERS, MAX_PLAYERS, RoomState};
