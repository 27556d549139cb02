//! Narrow seams between the draft coordinator and its collaborators.
//!
//! The coordinator never owns persistence or notification logic; it consumes
//! these traits. Production wires the sea-orm adapters in `crate::adapters`;
//! tests substitute in-memory doubles.

use async_trait::async_trait;

use crate::entities::leagues::LeagueStatus;
use crate::errors::DraftError;

/// Durable projection of a league row, as much as the coordinator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeagueRow {
    pub id: i64,
    pub owner_id: i64,
    pub status: LeagueStatus,
}

/// The lowest unassigned slot in a league's pick sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenTurn {
    pub pick_id: i64,
    pub team_id: i64,
    pub pick_number: i32,
    pub round: i32,
}

/// One slot of the snake sequence installed at draft start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickSlot {
    pub round: i32,
    pub pick_number: i32,
    pub team_id: i64,
}

/// A movie still rankable for auto-pick in a given league.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMovie {
    pub id: i64,
    pub title: String,
    pub budget: i64,
}

/// Everything one pick commit writes, handed to the store as a unit.
#[derive(Debug, Clone, Copy)]
pub struct PickCommit {
    pub league_id: i64,
    pub pick_id: i64,
    pub team_id: i64,
    pub movie_id: i64,
}

/// Result of a committed pick.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub movie_title: String,
    /// Open turns left after this commit; zero means the draft is complete
    /// and the league status has flipped to active.
    pub remaining: u64,
}

/// One row of the draft-status projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    pub pick_id: i64,
    pub round: i32,
    pub pick_number: i32,
    pub team_id: i64,
    pub team_name: String,
    pub movie_id: Option<i64>,
    pub movie_title: Option<String>,
}

/// Durable draft store. The coordinator reads and writes through it but does
/// not own its schema.
///
/// `commit_pick` and `install_draft_board` are all-or-nothing: either every
/// write they describe lands or none does.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn league(&self, league_id: i64) -> Result<LeagueRow, DraftError>;

    async fn team_ids(&self, league_id: i64) -> Result<Vec<i64>, DraftError>;

    async fn team_owner(&self, team_id: i64) -> Result<i64, DraftError>;

    /// Lowest unassigned pick number, recomputed from durable state on every
    /// call. `None` means no open turn remains.
    async fn next_open_turn(&self, league_id: i64) -> Result<Option<OpenTurn>, DraftError>;

    async fn is_movie_taken(&self, league_id: i64, movie_id: i64) -> Result<bool, DraftError>;

    /// Movies not yet assigned anywhere in this league's picks.
    async fn rankable_catalog(&self, league_id: i64) -> Result<Vec<CatalogMovie>, DraftError>;

    /// Atomically assign the movie to the pick (guarded on the slot still
    /// being empty), insert the roster and transaction records, recount open
    /// turns, and flip the league to active when the count reaches zero.
    ///
    /// A guard miss reports `MovieAlreadyDrafted`.
    async fn commit_pick(&self, commit: PickCommit) -> Result<CommitOutcome, DraftError>;

    /// Atomically insert the full pick sequence and flip the league status
    /// to drafting.
    async fn install_draft_board(
        &self,
        league_id: i64,
        slots: &[PickSlot],
    ) -> Result<(), DraftError>;

    async fn draft_board(&self, league_id: i64) -> Result<Vec<BoardRow>, DraftError>;

    async fn count_open_turns(&self, league_id: i64) -> Result<u64, DraftError>;

    async fn set_league_status(
        &self,
        league_id: i64,
        status: LeagueStatus,
    ) -> Result<(), DraftError>;
}

/// Fire-and-forget notification sink. Callers log and swallow failures; a
/// missed notification never interrupts the draft.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(
        &self,
        user_id: i64,
        kind: &str,
        title: &str,
        body: &str,
        league_id: i64,
    ) -> Result<(), DraftError>;
}
