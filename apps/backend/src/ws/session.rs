//! One actor per websocket connection.
//!
//! Connection lifecycle: Connected -> Joined(room) -> Left/Disconnected.
//! Every client request is answered with an `acknowledge` envelope;
//! room-wide effects go through the `RoomRegistry`. Request handling
//! spawns a short-lived task that reads the record, computes, and
//! (for moves and joins) writes it back; nothing game-related lives in
//! the actor between requests.

use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;
use crate::ws::hub::RoomBroadcast;
use crate::ws::protocol::{Acknowledge, ClientEvent, PossibleMovesReply, ServerEvent};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(app_state);
    ws::start(session, &req, stream)
}

struct JoinedRoom {
    game_token: String,
    user_id: String,
}

pub struct WsSession {
    conn_id: Uuid,
    app_state: web::Data<AppState>,
    joined: Option<JoinedRoom>,
    last_heartbeat: Instant,
    heartbeat_handle: Option<actix::SpawnHandle>,
}

impl WsSession {
    fn new(app_state: web::Data<AppState>) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            app_state,
            joined: None,
            last_heartbeat: Instant::now(),
            heartbeat_handle: None,
        }
    }

    fn send_event(ctx: &mut ws::WebsocketContext<Self>, event: &ServerEvent) {
        match serde_json::to_string(event) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound event"),
        }
    }

    fn ack(ctx: &mut ws::WebsocketContext<Self>, ack: Acknowledge) {
        Self::send_event(ctx, &ServerEvent::Acknowledge { data: ack });
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let handle = ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        self.heartbeat_handle = Some(handle);
    }

    fn leave_current_room(&mut self) {
        if let Some(room) = self.joined.take() {
            self.app_state.rooms().leave(&room.game_token, self.conn_id);
            info!(
                conn_id = %self.conn_id,
                game_token = %room.game_token,
                user_id = %room.user_id,
                remaining = self.app_state.rooms().room_size(&room.game_token),
                "[WS SESSION] left room"
            );
        }
    }

    /// True when the payload addresses the room this session joined.
    fn in_room(&self, game_token: &str) -> bool {
        self.joined
            .as_ref()
            .map(|j| j.game_token == game_token)
            .unwrap_or(false)
    }

    /// Terminal rejections are followed by an `end` broadcast so
    /// connected clients learn the game is over.
    fn broadcast_end_if_terminal(
        &self,
        err: &AppError,
        game_token: &str,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        if err.code() != ErrorCode::GameEnded {
            return;
        }
        let service = self.app_state.game_loop();
        let rooms = self.app_state.rooms();
        let token = game_token.to_string();
        ctx.spawn(
            async move {
                let payload = service.end_payload(&token).await;
                (token, payload)
            }
            .into_actor(self)
            .map(move |(token, payload), _actor, _ctx| {
                if let Ok(Some(data)) = payload {
                    rooms.broadcast(&token, ServerEvent::End { data });
                }
            }),
        );
    }

    fn handle_event(&mut self, event: ClientEvent, ctx: &mut ws::WebsocketContext<Self>) {
        match event {
            ClientEvent::Join {
                game_token,
                user_id,
                name,
            } => self.handle_join(game_token, user_id, name, ctx),
            ClientEvent::Leave {
                game_token,
                user_id,
            } => self.handle_leave(game_token, user_id, ctx),
            ClientEvent::Message {
                data,
                game_token,
                user_id,
            } => self.handle_message(data, game_token, user_id, ctx),
            ClientEvent::PossibleMoves {
                data,
                game_token,
                user_id,
            } => self.handle_possible_moves(data, game_token, user_id, ctx),
            ClientEvent::Move {
                data,
                game_token,
                user_id,
            } => self.handle_move(data, game_token, user_id, ctx),
        }
    }

    fn handle_join(
        &mut self,
        game_token: String,
        user_id: String,
        name: Option<String>,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        let service = self.app_state.game_loop();
        let token = game_token.clone();
        ctx.spawn(
            async move {
                let outcome = service.join(&token, &user_id, name.as_deref()).await;
                (token, user_id, outcome)
            }
            .into_actor(self)
            .map(|(token, user_id, outcome), actor, ctx| match outcome {
                Ok(outcome) => {
                    actor.leave_current_room();
                    actor.app_state.rooms().join(
                        &token,
                        actor.conn_id,
                        ctx.address().recipient(),
                    );
                    actor.joined = Some(JoinedRoom {
                        game_token: token.clone(),
                        user_id,
                    });
                    info!(
                        conn_id = %actor.conn_id,
                        game_token = %token,
                        room_size = actor.app_state.rooms().room_size(&token),
                        "[WS SESSION] joined room"
                    );

                    // Ordering guarantee: ack, then the private load,
                    // then the room-wide announcements.
                    Self::ack(
                        ctx,
                        Acknowledge::ok("join", Some(Value::String(token.clone())), "Room joined"),
                    );
                    Self::send_event(ctx, &ServerEvent::Load { data: outcome.load });

                    let rooms = actor.app_state.rooms();
                    rooms.broadcast(&token, ServerEvent::Players { data: outcome.players });
                    if let Some(info) = outcome.started {
                        rooms.broadcast(&token, ServerEvent::Start { data: info });
                    }
                    if let Some(turn) = outcome.turn {
                        rooms.broadcast(&token, ServerEvent::Turn { data: turn });
                    }
                }
                Err(err) => {
                    Self::ack(ctx, Acknowledge::fail("join", err.detail()));
                }
            }),
        );
    }

    fn handle_leave(
        &mut self,
        game_token: String,
        user_id: String,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        if !self.in_room(&game_token) {
            Self::ack(ctx, Acknowledge::fail("leave", "Bad Request"));
            return;
        }
        let service = self.app_state.game_loop();
        let token = game_token.clone();
        ctx.spawn(
            async move { service.leave(&token, &user_id).await }
                .into_actor(self)
                .map(|res, actor, ctx| match res {
                    Ok(()) => {
                        actor.leave_current_room();
                        Self::ack(ctx, Acknowledge::ok("leave", None, "Room left"));
                    }
                    Err(err) => Self::ack(ctx, Acknowledge::fail("leave", err.detail())),
                }),
        );
    }

    fn handle_message(
        &mut self,
        data: Value,
        game_token: String,
        user_id: String,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        if !self.in_room(&game_token) {
            Self::ack(ctx, Acknowledge::fail("message", "Bad Request"));
            return;
        }
        self.app_state.rooms().broadcast(
            &game_token,
            ServerEvent::Message {
                data,
                game_token: game_token.clone(),
                user_id,
            },
        );
        Self::ack(ctx, Acknowledge::ok("message", None, "Message sent"));
    }

    fn handle_possible_moves(
        &mut self,
        query: crate::services::game_loop::PossibleMovesQuery,
        game_token: String,
        user_id: String,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        if !self.in_room(&game_token) {
            Self::ack(ctx, Acknowledge::fail("possible_moves", "Bad Request"));
            return;
        }
        let service = self.app_state.game_loop();
        let token = game_token.clone();
        ctx.spawn(
            async move {
                let moves = service.possible_moves(&token, &user_id, &query).await;
                (token, query, moves)
            }
            .into_actor(self)
            .map(|(token, query, moves), actor, ctx| match moves {
                Ok(moves) => {
                    Self::ack(
                        ctx,
                        Acknowledge::ok("possible_moves", None, "Possible moves computed"),
                    );
                    Self::send_event(
                        ctx,
                        &ServerEvent::PossibleMoves {
                            data: PossibleMovesReply {
                                object_id: query.object_id,
                                possible_moves: moves,
                            },
                        },
                    );
                }
                Err(err) => {
                    Self::ack(ctx, Acknowledge::fail("possible_moves", err.detail()));
                    actor.broadcast_end_if_terminal(&err, &token, ctx);
                }
            }),
        );
    }

    fn handle_move(
        &mut self,
        command: crate::services::game_loop::MoveCommand,
        game_token: String,
        user_id: String,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        if !self.in_room(&game_token) {
            Self::ack(ctx, Acknowledge::fail("move", "Bad Request"));
            return;
        }
        let service = self.app_state.game_loop();
        let token = game_token.clone();
        ctx.spawn(
            async move {
                let outcome = service.apply_move(&token, &user_id, &command).await;
                (token, user_id, command, outcome)
            }
            .into_actor(self)
            .map(
                |(token, user_id, command, outcome), actor, ctx| match outcome {
                    Ok(outcome) => {
                        Self::ack(ctx, Acknowledge::ok("move", None, "Move accepted"));

                        let rooms = actor.app_state.rooms();
                        rooms.broadcast(
                            &token,
                            ServerEvent::Move {
                                data: command,
                                game_token: token.clone(),
                                user_id,
                            },
                        );
                        if let Some(captured) = outcome.captured_objects {
                            rooms.broadcast(
                                &token,
                                ServerEvent::CapturedObjects { data: captured },
                            );
                        }
                        if let Some(end) = outcome.end {
                            rooms.broadcast(&token, ServerEvent::End { data: end });
                        } else if let Some(turn) = outcome.turn {
                            rooms.broadcast(&token, ServerEvent::Turn { data: turn });
                        }
                    }
                    Err(err) => {
                        Self::ack(ctx, Acknowledge::fail("move", err.detail()));
                        actor.broadcast_end_if_terminal(&err, &token, ctx);
                    }
                },
            ),
        );
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] started");
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.leave_current_room();
        info!(conn_id = %self.conn_id, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                // Pull the event name out first so even a malformed
                // payload gets a correctly-labeled acknowledge.
                let raw: Result<Value, _> = serde_json::from_str(&text);
                let Ok(raw) = raw else {
                    Self::ack(ctx, Acknowledge::fail("unknown", "Bad Request"));
                    return;
                };
                let event_name = raw
                    .get("event")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string();

                match serde_json::from_value::<ClientEvent>(raw) {
                    Ok(event) => self.handle_event(event, ctx),
                    Err(err) => {
                        warn!(
                            conn_id = %self.conn_id,
                            event = %event_name,
                            error = %err,
                            "[WS SESSION] malformed client event"
                        );
                        Self::ack(ctx, Acknowledge::fail(&event_name, "Bad Request"));
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                Self::ack(ctx, Acknowledge::fail("unknown", "Bad Request"));
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "[WS SESSION] protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<RoomBroadcast> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: RoomBroadcast, ctx: &mut Self::Context) -> Self::Result {
        Self::send_event(ctx, &msg.event);
    }
}

impl Handler<Shutdown> for WsSession {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        self.leave_current_room();
        if let Some(handle) = self.heartbeat_handle.take() {
            ctx.cancel_future(handle);
        }
        ctx.stop();
    }
}
