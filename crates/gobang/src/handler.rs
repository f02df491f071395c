//! Request handlers: one function per client message type.
//!
//! Handlers are plain synchronous functions. Each takes the registries,
//! applies one request, and returns the list of messages to deliver.
//! Sending is left to the dispatch worker, which keeps every handler
//! testable without a socket.
//!
//! A rejected request always produces exactly one reply, to the requester,
//! echoing its fields with the failure flag set. Nothing is broadcast and
//! no state changes.

use gobang_protocol::{
    ClientMessage, CreateRoomRequest, CreateRoomResponse, EnrollRequest,
    EnrollResponse, EnterResult, EnterRoomRequest, EnterRoomResponse,
    ExitRoomRequest, ExitRoomResponse, PlaceStoneRequest, PlaceStoneResponse,
    ServerMessage, SessionId, StartGameRequest, StartGameResponse, Winner,
};
use gobang_room::RoomRegistry;
use gobang_session::SessionRegistry;

/// Messages produced by one handler, in delivery order.
pub(crate) type Outbox = Vec<(SessionId, ServerMessage)>;

/// Runs the handler for `request` on behalf of `session`.
pub(crate) fn handle_request(
    sessions: &mut SessionRegistry,
    rooms: &mut RoomRegistry,
    session: SessionId,
    request: ClientMessage,
) -> Outbox {
    match request {
        ClientMessage::Heartbeat => vec![(session, ServerMessage::Heartbeat)],
        ClientMessage::Enroll(req) => handle_enroll(sessions, session, req),
        ClientMessage::CreateRoom(req) => handle_create_room(sessions, rooms, session, req),
        ClientMessage::EnterRoom(req) => handle_enter_room(sessions, rooms, session, req),
        ClientMessage::ExitRoom(req) => handle_exit_room(sessions, rooms, session, req),
        ClientMessage::StartGame(req) => handle_start_game(rooms, session, req),
        ClientMessage::PlaceStone(req) => handle_place_stone(sessions, rooms, session, req),
    }
}

fn handle_enroll(
    sessions: &mut SessionRegistry,
    session: SessionId,
    req: EnrollRequest,
) -> Outbox {
    let success = match sessions.rename(session, req.name.clone()) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(%session, error = %e, "enroll failed");
            false
        }
    };
    let reply = EnrollResponse {
        name: req.name,
        success,
    };
    vec![(session, ServerMessage::Enroll(reply))]
}

fn handle_create_room(
    sessions: &mut SessionRegistry,
    rooms: &mut RoomRegistry,
    session: SessionId,
    req: CreateRoomRequest,
) -> Outbox {
    let success = match rooms.create(sessions, req.room_id, session) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(%session, room_id = %req.room_id, error = %e, "create room rejected");
            false
        }
    };
    let reply = CreateRoomResponse {
        room_id: req.room_id,
        success,
    };
    vec![(session, ServerMessage::CreateRoom(reply))]
}

fn handle_enter_room(
    sessions: &mut SessionRegistry,
    rooms: &mut RoomRegistry,
    session: SessionId,
    req: EnterRoomRequest,
) -> Outbox {
    let result = match rooms.join(sessions, req.room_id, session) {
        Ok(seat) => seat,
        Err(e) => {
            tracing::debug!(%session, room_id = %req.room_id, error = %e, "enter room rejected");
            EnterResult::None
        }
    };
    let reply = EnterRoomResponse {
        room_id: req.room_id,
        result,
    };
    vec![(session, ServerMessage::EnterRoom(reply))]
}

fn handle_exit_room(
    sessions: &mut SessionRegistry,
    rooms: &mut RoomRegistry,
    session: SessionId,
    req: ExitRoomRequest,
) -> Outbox {
    let success = match rooms.leave(sessions, req.room_id, session) {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(%session, room_id = %req.room_id, error = %e, "exit room rejected");
            false
        }
    };
    let reply = ExitRoomResponse {
        room_id: req.room_id,
        success,
    };
    vec![(session, ServerMessage::ExitRoom(reply))]
}

fn handle_start_game(
    rooms: &mut RoomRegistry,
    session: SessionId,
    req: StartGameRequest,
) -> Outbox {
    let room_id = req.room_id;
    let notice = |success, is_first_move, is_observer| {
        ServerMessage::StartGame(StartGameResponse {
            room_id,
            success,
            is_first_move,
            is_observer,
        })
    };

    match rooms.start(room_id, session) {
        Ok(plan) => {
            let mut out = vec![
                (plan.first, notice(true, true, false)),
                (plan.second, notice(true, false, false)),
            ];
            out.extend(
                plan.observers
                    .into_iter()
                    .map(|observer| (observer, notice(true, false, true))),
            );
            out
        }
        Err(e) => {
            tracing::debug!(%session, %room_id, error = %e, "start game rejected");
            vec![(session, notice(false, false, false))]
        }
    }
}

fn handle_place_stone(
    sessions: &mut SessionRegistry,
    rooms: &mut RoomRegistry,
    session: SessionId,
    req: PlaceStoneRequest,
) -> Outbox {
    let PlaceStoneRequest {
        room_id,
        color,
        x,
        y,
    } = req;
    let result = |success, winner| {
        ServerMessage::PlaceStone(PlaceStoneResponse {
            room_id,
            color,
            x,
            y,
            success,
            winner,
        })
    };

    match rooms.place(sessions, room_id, session, color, x, y) {
        Ok(report) => report
            .audience
            .into_iter()
            .map(|member| (member, result(true, report.winner)))
            .collect(),
        Err(e) => {
            tracing::debug!(%session, %room_id, error = %e, "place stone rejected");
            vec![(session, result(false, Winner::None))]
        }
    }
}
