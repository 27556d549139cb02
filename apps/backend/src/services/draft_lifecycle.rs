//! Draft lifecycle entry points: start a league's draft and project its
//! board. Thin reads/writes against the durable store; the live session is
//! the room's job.

use rand::seq::SliceRandom;
use tracing::info;

use crate::domain;
use crate::entities::leagues::LeagueStatus;
use crate::error::AppError;
use crate::errors::DraftError;
use crate::store::{BoardRow, DraftStore, OpenTurn};

#[derive(Debug)]
pub struct StartedDraft {
    pub total_picks: usize,
}

pub struct DraftStatus {
    pub picks: Vec<BoardRow>,
    pub current: Option<OpenTurn>,
}

/// Shuffle the team order once, build the snake pick sequence, and install
/// it atomically. Only the league owner may start, only from `pending`, and
/// only with at least two teams.
pub async fn start_draft(
    store: &dyn DraftStore,
    league_id: i64,
    user_id: i64,
    rounds: u32,
) -> Result<StartedDraft, AppError> {
    let league = store.league(league_id).await.map_err(|err| match err {
        DraftError::RoomNotFound => AppError::not_found("LEAGUE_NOT_FOUND", "League not found"),
        other => other.into(),
    })?;

    if league.owner_id != user_id {
        return Err(AppError::forbidden(
            "Only the league owner can start the draft",
        ));
    }
    if league.status != LeagueStatus::Pending {
        return Err(AppError::bad_request(
            "DRAFT_ALREADY_STARTED",
            "Draft already started or league completed",
        ));
    }

    let mut team_ids = store.team_ids(league_id).await?;
    if team_ids.len() < 2 {
        return Err(AppError::bad_request(
            "NOT_ENOUGH_TEAMS",
            "Need at least 2 teams to draft",
        ));
    }

    // The draft order is fixed here for the whole draft; even rounds reverse
    // it, nothing ever reshuffles it mid-draft.
    team_ids.shuffle(&mut rand::rng());

    let slots = domain::build_pick_sequence(&team_ids, rounds);
    store.install_draft_board(league_id, &slots).await?;

    info!(
        league_id,
        teams = team_ids.len(),
        total_picks = slots.len(),
        "draft started"
    );

    Ok(StartedDraft {
        total_picks: slots.len(),
    })
}

/// Read-only projection of the pick list plus the current open turn.
pub async fn draft_status(store: &dyn DraftStore, league_id: i64) -> Result<DraftStatus, AppError> {
    let picks = store.draft_board(league_id).await?;
    let current = store.next_open_turn(league_id).await?;
    Ok(DraftStatus { picks, current })
}
