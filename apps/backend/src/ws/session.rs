//! Per-connection actor: registers with its league's draft room, forwards
//! pick requests, and writes room broadcasts to the socket.

use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::draft::room::{DraftRoom, Join, Leave, Outbound, SubmitPick};
use crate::entities::leagues::LeagueStatus;
use crate::errors::DraftError;
use crate::state::app_state::AppState;
use crate::ws::protocol::{ClientMsg, ServerMsg};
use crate::AppError;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// `GET /ws/draft/{league_id}` — upgrade and attach to the league's room.
/// Leagues that are not mid-draft get a 404 problem response.
pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let league_id = path.into_inner();

    let league = app_state
        .store
        .league(league_id)
        .await
        .map_err(AppError::from)?;
    if league.status != LeagueStatus::Drafting {
        return Err(AppError::from(DraftError::RoomNotFound).into());
    }

    let room = app_state.rooms.get_or_create(league_id);
    let session = DraftSession::new(league_id, room);
    ws::start(session, &req, stream)
}

pub struct DraftSession {
    conn_id: Uuid,
    league_id: i64,
    room: Addr<DraftRoom>,
    last_heartbeat: Instant,
}

impl DraftSession {
    fn new(league_id: i64, room: Addr<DraftRoom>) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            league_id,
            room,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error(ctx: &mut ws::WebsocketContext<Self>, message: impl Into<String>) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                message: message.into(),
            },
        );
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    league_id = actor.league_id,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn forward_pick(&self, ctx: &mut ws::WebsocketContext<Self>, user_id: i64, movie_id: i64) {
        let request = self.room.send(SubmitPick { user_id, movie_id });
        ctx.spawn(request.into_actor(self).map(|res, actor, ctx| match res {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                // Rejections go to the requesting connection only.
                Self::send_error(ctx, err.to_string());
            }
            Err(err) => {
                warn!(
                    conn_id = %actor.conn_id,
                    league_id = actor.league_id,
                    error = %err,
                    "[WS SESSION] draft room unreachable"
                );
                Self::send_error(ctx, "draft room unavailable");
            }
        }));
    }
}

impl Actor for DraftSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            league_id = self.league_id,
            "[WS SESSION] started"
        );
        self.room.do_send(Join {
            conn_id: self.conn_id,
            recipient: ctx.address().recipient::<Outbound>(),
        });
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.room.do_send(Leave {
            conn_id: self.conn_id,
        });
        info!(
            conn_id = %self.conn_id,
            league_id = self.league_id,
            "[WS SESSION] stopped"
        );
    }
}

impl Handler<Outbound> for DraftSession {
    type Result = ();

    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) -> Self::Result {
        Self::send_json(ctx, &msg.0);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for DraftSession {
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
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(ClientMsg::Pick { movie_id, user_id }) => {
                        self.forward_pick(ctx, user_id, movie_id);
                    }
                    Err(_) => Self::send_error(ctx, "malformed message"),
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                Self::send_error(ctx, "binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    league_id = self.league_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}
