//! The dispatch worker: the one task that owns all game state.
//!
//! Connections never touch the registries. They push [`Command`]s onto a
//! single unbounded queue, and the [`Dispatcher`] pulls them off one at a
//! time, running each to completion before looking at the next. That gives
//! every handler exclusive access to sessions, rooms, and boards without a
//! lock in sight.
//!
//! ```text
//! conn 1 reader ─┐
//! conn 2 reader ─┼──→ [ Command queue ] ──→ Dispatcher ──→ per-session outbound queues
//! accept loop ───┘
//! ```

use std::net::SocketAddr;

use gobang_protocol::{ClientMessage, SessionId};
use gobang_room::RoomRegistry;
use gobang_session::{Session, SessionRegistry, SessionSender};
use tokio::sync::mpsc;

use crate::ServerConfig;
use crate::handler::handle_request;

/// Something that happened on a connection.
#[derive(Debug)]
pub enum Command {
    /// A connection was accepted. Always queued before any of its requests.
    Connected {
        session: SessionId,
        peer: SocketAddr,
        outbound: SessionSender,
    },

    /// A decoded request from a client.
    Request {
        session: SessionId,
        request: ClientMessage,
    },

    /// The connection failed or closed. May arrive twice (from the reader
    /// and from the writer); the second is ignored.
    Disconnected { session: SessionId, reason: String },
}

/// Sending half of the dispatch queue.
pub type CommandSender = mpsc::UnboundedSender<Command>;

/// Owns the session and room registries and applies commands to them.
pub struct Dispatcher {
    sessions: SessionRegistry,
    rooms: RoomRegistry,
    default_name: String,
    receiver: mpsc::UnboundedReceiver<Command>,
}

impl Dispatcher {
    /// Creates a dispatcher and the sender that feeds it.
    pub fn new(config: &ServerConfig) -> (Self, CommandSender) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let dispatcher = Self {
            sessions: SessionRegistry::new(),
            rooms: RoomRegistry::new(),
            default_name: config.default_name.clone(),
            receiver,
        };
        (dispatcher, sender)
    }

    /// Processes commands until every [`CommandSender`] has been dropped.
    pub async fn run(mut self) {
        tracing::info!("dispatch worker started");
        while let Some(cmd) = self.receiver.recv().await {
            self.handle(cmd);
        }
        tracing::info!("dispatch worker stopped");
    }

    /// Applies one command.
    pub fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Connected {
                session,
                peer,
                outbound,
            } => {
                let new = Session::new(session, peer, self.default_name.clone(), outbound);
                if let Err(e) = self.sessions.register(new) {
                    tracing::warn!(%session, error = %e, "registration failed");
                }
            }
            Command::Request { session, request } => {
                if !self.sessions.contains(session) {
                    tracing::debug!(%session, msg_type = %request.message_type(), "request from unknown session dropped");
                    return;
                }
                let outbox = handle_request(&mut self.sessions, &mut self.rooms, session, request);
                for (recipient, msg) in outbox {
                    if !self.sessions.send(recipient, msg) {
                        tracing::debug!(session = %recipient, "recipient writer closed");
                    }
                }
            }
            Command::Disconnected { session, reason } => {
                if !self.sessions.contains(session) {
                    return;
                }
                if let Some(room_id) = self.rooms.disconnect(&mut self.sessions, session) {
                    tracing::debug!(%session, %room_id, "closed room on disconnect");
                }
                self.sessions.remove(session);
                tracing::info!(%session, %reason, "session disconnected");
            }
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Dispatcher tests drive the worker synchronously through `handle()`
    //! and read what each session would have been sent from its outbound
    //! receiver.

    use gobang_protocol::{
        CreateRoomRequest, EnterResult, EnterRoomRequest, EnterRoomResponse,
        PlaceStoneRequest, RoomId, ServerMessage, StartGameRequest, Stone,
        Winner,
    };
    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;

    const ROOM: RoomId = RoomId(7);

    struct Harness {
        dispatcher: Dispatcher,
        _sender: CommandSender,
        outboxes: Vec<UnboundedReceiver<ServerMessage>>,
    }

    impl Harness {
        /// Registers `count` sessions with ids 1..=count.
        fn new(count: u64) -> Self {
            let (mut dispatcher, sender) = Dispatcher::new(&ServerConfig::default());
            let mut outboxes = Vec::new();
            for id in 1..=count {
                let (outbound, rx) = mpsc::unbounded_channel();
                dispatcher.handle(Command::Connected {
                    session: SessionId(id),
                    peer: "127.0.0.1:2".parse().unwrap(),
                    outbound,
                });
                outboxes.push(rx);
            }
            Self {
                dispatcher,
                _sender: sender,
                outboxes,
            }
        }

        fn request(&mut self, id: u64, request: ClientMessage) {
            self.dispatcher.handle(Command::Request {
                session: SessionId(id),
                request,
            });
        }

        fn disconnect(&mut self, id: u64) {
            self.dispatcher.handle(Command::Disconnected {
                session: SessionId(id),
                reason: "test".into(),
            });
        }

        /// Everything session `id` has been sent since the last drain.
        fn drain(&mut self, id: u64) -> Vec<ServerMessage> {
            let rx = &mut self.outboxes[(id - 1) as usize];
            let mut msgs = Vec::new();
            while let Ok(msg) = rx.try_recv() {
                msgs.push(msg);
            }
            msgs
        }

        fn drain_all(&mut self) {
            for id in 1..=self.outboxes.len() as u64 {
                self.drain(id);
            }
        }

        fn place(&mut self, id: u64, color: Stone, x: i32, y: i32) {
            self.request(
                id,
                ClientMessage::PlaceStone(PlaceStoneRequest {
                    room_id: ROOM,
                    color,
                    x,
                    y,
                }),
            );
        }

        /// Session 1 creates room 7, 2 joins as player, 3 as observer, and
        /// session 1 starts the game.
        fn started_match(&mut self) {
            self.request(1, ClientMessage::CreateRoom(CreateRoomRequest { room_id: ROOM }));
            self.request(2, ClientMessage::EnterRoom(EnterRoomRequest { room_id: ROOM }));
            self.request(3, ClientMessage::EnterRoom(EnterRoomRequest { room_id: ROOM }));
            self.request(1, ClientMessage::StartGame(StartGameRequest { room_id: ROOM }));
            self.drain_all();
        }
    }

    #[test]
    fn test_connected_registers_with_default_name() {
        let harness = Harness::new(1);
        let session = harness.dispatcher.sessions().get(SessionId(1)).unwrap();
        assert_eq!(session.name(), "Player Unknown");
        assert!(!session.in_room());
    }

    #[test]
    fn test_request_from_unknown_session_is_dropped() {
        let mut harness = Harness::new(1);
        harness.request(42, ClientMessage::CreateRoom(CreateRoomRequest { room_id: ROOM }));
        assert!(harness.dispatcher.rooms().is_empty());
        assert!(harness.drain(1).is_empty());
    }

    #[test]
    fn test_enter_replies_only_to_requester() {
        let mut harness = Harness::new(2);
        harness.request(1, ClientMessage::CreateRoom(CreateRoomRequest { room_id: ROOM }));
        harness.drain(1);

        harness.request(2, ClientMessage::EnterRoom(EnterRoomRequest { room_id: ROOM }));
        assert_eq!(
            harness.drain(2),
            vec![ServerMessage::EnterRoom(EnterRoomResponse {
                room_id: ROOM,
                result: EnterResult::Player,
            })]
        );
        assert!(harness.drain(1).is_empty());
    }

    #[test]
    fn test_accepted_move_is_broadcast_to_room() {
        let mut harness = Harness::new(4);
        harness.started_match();

        harness.place(1, Stone::Black, 7, 7);
        for id in 1..=3 {
            let msgs = harness.drain(id);
            assert_eq!(msgs.len(), 1, "session {id}");
            assert!(matches!(
                &msgs[0],
                ServerMessage::PlaceStone(r) if r.success && r.winner == Winner::None
            ));
        }
        assert!(harness.drain(4).is_empty());
    }

    #[test]
    fn test_win_broadcasts_then_removes_room() {
        let mut harness = Harness::new(3);
        harness.started_match();

        for x in 0..4 {
            harness.place(1, Stone::Black, x, 0);
            harness.place(2, Stone::White, x, 1);
        }
        harness.drain_all();
        harness.place(1, Stone::Black, 4, 0);

        for id in 1..=3 {
            let msgs = harness.drain(id);
            assert!(matches!(
                msgs.as_slice(),
                [ServerMessage::PlaceStone(r)] if r.winner == Winner::Black
            ));
            let session = harness.dispatcher.sessions().get(SessionId(id)).unwrap();
            assert!(!session.in_room());
        }
        assert!(!harness.dispatcher.rooms().contains(ROOM));
    }

    #[test]
    fn test_disconnect_observer_closes_room() {
        let mut harness = Harness::new(3);
        harness.started_match();

        harness.disconnect(3);
        assert!(!harness.dispatcher.sessions().contains(SessionId(3)));
        assert!(!harness.dispatcher.rooms().contains(ROOM));
        for id in 1..=2 {
            let session = harness.dispatcher.sessions().get(SessionId(id)).unwrap();
            assert!(!session.in_room());
        }

        // The players can no longer move in the closed room.
        harness.place(1, Stone::Black, 7, 7);
        assert!(matches!(
            harness.drain(1).as_slice(),
            [ServerMessage::PlaceStone(r)] if !r.success
        ));
        assert!(harness.drain(2).is_empty());
    }

    #[test]
    fn test_disconnect_player_mid_game_closes_room() {
        let mut harness = Harness::new(4);
        harness.started_match();
        harness.place(1, Stone::Black, 7, 7);
        harness.drain_all();

        harness.disconnect(2);
        assert!(!harness.dispatcher.rooms().contains(ROOM));
        for id in [1, 3] {
            let session = harness.dispatcher.sessions().get(SessionId(id)).unwrap();
            assert!(!session.in_room());
        }

        harness.request(4, ClientMessage::EnterRoom(EnterRoomRequest { room_id: ROOM }));
        assert_eq!(
            harness.drain(4),
            vec![ServerMessage::EnterRoom(EnterRoomResponse {
                room_id: ROOM,
                result: EnterResult::None,
            })]
        );
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let mut harness = Harness::new(1);
        harness.request(1, ClientMessage::CreateRoom(CreateRoomRequest { room_id: ROOM }));

        harness.disconnect(1);
        harness.disconnect(1);
        assert!(harness.dispatcher.sessions().is_empty());
        assert!(harness.dispatcher.rooms().is_empty());
    }

    #[tokio::test]
    async fn test_run_stops_when_senders_dropped() {
        let (dispatcher, sender) = Dispatcher::new(&ServerConfig::default());
        let worker = tokio::spawn(dispatcher.run());

        let (outbound, mut rx) = mpsc::unbounded_channel();
        sender
            .send(Command::Connected {
                session: SessionId(1),
                peer: "127.0.0.1:3".parse().unwrap(),
                outbound,
            })
            .unwrap();
        sender
            .send(Command::Request {
                session: SessionId(1),
                request: ClientMessage::Heartbeat,
            })
            .unwrap();

        let reply = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
            .await
            .expect("timeout");
        assert_eq!(reply, Some(ServerMessage::Heartbeat));

        drop(sender);
        tokio::time::timeout(std::time::Duration::from_secs(5), worker)
            .await
            .expect("worker should stop")
            .unwrap();
    }
}
