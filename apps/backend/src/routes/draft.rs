//! Draft HTTP routes: starting a draft and inspecting its board. The live
//! pick flow lives on the websocket side, not here.

use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::Serialize;

use crate::error::AppError;
use crate::services::draft_lifecycle;
use crate::state::app_state::AppState;
use crate::store::BoardRow;
use crate::ws;

/// Caller identity comes from the `x-user-id` header. Session middleware is
/// expected to sit in front of this service and vouch for it.
fn current_user(req: &HttpRequest) -> Result<i64, AppError> {
    req.headers()
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| AppError::bad_request("MISSING_USER", "x-user-id header required"))
}

#[derive(Serialize)]
struct StartDraftResponse {
    league_id: i64,
    total_picks: usize,
}

#[derive(Serialize)]
struct PickView {
    round: i32,
    pick_number: i32,
    team_id: i64,
    movie_id: Option<i64>,
}

#[derive(Serialize)]
struct CurrentTurnView {
    team_id: i64,
    pick_number: i32,
    round: i32,
}

#[derive(Serialize)]
struct DraftStatusResponse {
    league_id: i64,
    picks: Vec<PickView>,
    current: Option<CurrentTurnView>,
}

impl From<BoardRow> for PickView {
    fn from(row: BoardRow) -> Self {
        Self {
            round: row.round,
            pick_number: row.pick_number,
            team_id: row.team_id,
            movie_id: row.movie_id,
        }
    }
}

/// POST /api/leagues/{league_id}/draft/start
///
/// Owner-only. Shuffles the draft order, installs the full snake pick
/// sequence, and moves the league to `drafting`.
async fn start_draft(
    http_req: HttpRequest,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let league_id = path.into_inner();
    let user_id = current_user(&http_req)?;

    let started = draft_lifecycle::start_draft(
        app_state.store.as_ref(),
        league_id,
        user_id,
        app_state.draft.rounds,
    )
    .await?;

    Ok(HttpResponse::Ok().json(StartDraftResponse {
        league_id,
        total_picks: started.total_picks,
    }))
}

/// GET /api/leagues/{league_id}/draft/status
async fn draft_status(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let league_id = path.into_inner();
    let status = draft_lifecycle::draft_status(app_state.store.as_ref(), league_id).await?;

    Ok(HttpResponse::Ok().json(DraftStatusResponse {
        league_id,
        picks: status.picks.into_iter().map(PickView::from).collect(),
        current: status.current.map(|turn| CurrentTurnView {
            team_id: turn.team_id,
            pick_number: turn.pick_number,
            round: turn.round,
        }),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/leagues/{league_id}/draft")
            .route("/start", web::post().to(start_draft))
            .route("/status", web::get().to(draft_status)),
    )
    .route("/ws/draft/{league_id}", web::get().to(ws::session::upgrade));
}
