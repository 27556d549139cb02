//! In-memory doubles for the durable store and the notification sink.
//!
//! Draft room tests exercise the actor against these instead of a real
//! database; failure injection covers the paths a healthy database never
//! takes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use fml_backend::entities::leagues::LeagueStatus;
use fml_backend::store::{
    BoardRow, CatalogMovie, CommitOutcome, DraftStore, LeagueRow, NotificationSink, OpenTurn,
    PickCommit, PickSlot,
};
use fml_backend::DraftError;

#[derive(Debug, Clone)]
pub struct PickRow {
    pub pick_id: i64,
    pub round: i32,
    pub pick_number: i32,
    pub team_id: i64,
    pub movie_id: Option<i64>,
}

struct Inner {
    league: LeagueRow,
    team_owners: HashMap<i64, i64>,
    team_names: HashMap<i64, String>,
    movies: Vec<CatalogMovie>,
    picks: Vec<PickRow>,
    next_pick_id: i64,
}

pub struct InMemoryDraftStore {
    inner: Mutex<Inner>,
    fail_next_commit: AtomicBool,
}

impl InMemoryDraftStore {
    pub fn new(league_id: i64, owner_id: i64, status: LeagueStatus) -> Self {
        Self {
            inner: Mutex::new(Inner {
                league: LeagueRow {
                    id: league_id,
                    owner_id,
                    status,
                },
                team_owners: HashMap::new(),
                team_names: HashMap::new(),
                movies: Vec::new(),
                picks: Vec::new(),
                next_pick_id: 1,
            }),
            fail_next_commit: AtomicBool::new(false),
        }
    }

    pub fn add_team(&self, team_id: i64, user_id: i64, name: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.team_owners.insert(team_id, user_id);
        inner.team_names.insert(team_id, name.to_string());
    }

    pub fn add_movie(&self, id: i64, title: &str, budget: i64) {
        self.inner.lock().unwrap().movies.push(CatalogMovie {
            id,
            title: title.to_string(),
            budget,
        });
    }

    /// The next call to `commit_pick` fails with a storage error.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    pub fn league_status(&self) -> LeagueStatus {
        self.inner.lock().unwrap().league.status
    }

    pub fn picks(&self) -> Vec<PickRow> {
        self.inner.lock().unwrap().picks.clone()
    }

    pub fn assigned_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .picks
            .iter()
            .filter(|p| p.movie_id.is_some())
            .count()
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn league(&self, league_id: i64) -> Result<LeagueRow, DraftError> {
        let inner = self.inner.lock().unwrap();
        if inner.league.id != league_id {
            return Err(DraftError::RoomNotFound);
        }
        Ok(inner.league)
    }

    async fn team_ids(&self, _league_id: i64) -> Result<Vec<i64>, DraftError> {
        let inner = self.inner.lock().unwrap();
        let mut ids: Vec<i64> = inner.team_owners.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn team_owner(&self, team_id: i64) -> Result<i64, DraftError> {
        self.inner
            .lock()
            .unwrap()
            .team_owners
            .get(&team_id)
            .copied()
            .ok_or_else(|| DraftError::Storage(format!("team {team_id} not found")))
    }

    async fn next_open_turn(&self, _league_id: i64) -> Result<Option<OpenTurn>, DraftError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .picks
            .iter()
            .filter(|p| p.movie_id.is_none())
            .min_by_key(|p| p.pick_number)
            .map(|p| OpenTurn {
                pick_id: p.pick_id,
                team_id: p.team_id,
                pick_number: p.pick_number,
                round: p.round,
            }))
    }

    async fn is_movie_taken(&self, _league_id: i64, movie_id: i64) -> Result<bool, DraftError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.picks.iter().any(|p| p.movie_id == Some(movie_id)))
    }

    async fn rankable_catalog(&self, _league_id: i64) -> Result<Vec<CatalogMovie>, DraftError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .movies
            .iter()
            .filter(|m| !inner.picks.iter().any(|p| p.movie_id == Some(m.id)))
            .cloned()
            .collect())
    }

    async fn commit_pick(&self, commit: PickCommit) -> Result<CommitOutcome, DraftError> {
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(DraftError::Storage("injected commit failure".to_string()));
        }

        let mut inner = self.inner.lock().unwrap();
        if inner.picks.iter().any(|p| p.movie_id == Some(commit.movie_id)) {
            return Err(DraftError::MovieAlreadyDrafted);
        }
        let slot = inner
            .picks
            .iter_mut()
            .find(|p| p.pick_id == commit.pick_id)
            .ok_or_else(|| DraftError::Storage(format!("pick {} not found", commit.pick_id)))?;
        if slot.movie_id.is_some() {
            return Err(DraftError::MovieAlreadyDrafted);
        }
        slot.movie_id = Some(commit.movie_id);

        let remaining = inner.picks.iter().filter(|p| p.movie_id.is_none()).count() as u64;
        if remaining == 0 {
            inner.league.status = LeagueStatus::Active;
        }
        let movie_title = inner
            .movies
            .iter()
            .find(|m| m.id == commit.movie_id)
            .map(|m| m.title.clone())
            .unwrap_or_default();

        Ok(CommitOutcome {
            movie_title,
            remaining,
        })
    }

    async fn install_draft_board(
        &self,
        _league_id: i64,
        slots: &[PickSlot],
    ) -> Result<(), DraftError> {
        let mut inner = self.inner.lock().unwrap();
        for slot in slots {
            let pick_id = inner.next_pick_id;
            inner.next_pick_id += 1;
            inner.picks.push(PickRow {
                pick_id,
                round: slot.round,
                pick_number: slot.pick_number,
                team_id: slot.team_id,
                movie_id: None,
            });
        }
        inner.league.status = LeagueStatus::Drafting;
        Ok(())
    }

    async fn draft_board(&self, _league_id: i64) -> Result<Vec<BoardRow>, DraftError> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<BoardRow> = inner
            .picks
            .iter()
            .map(|p| BoardRow {
                pick_id: p.pick_id,
                round: p.round,
                pick_number: p.pick_number,
                team_id: p.team_id,
                team_name: inner
                    .team_names
                    .get(&p.team_id)
                    .cloned()
                    .unwrap_or_default(),
                movie_id: p.movie_id,
                movie_title: p.movie_id.and_then(|id| {
                    inner.movies.iter().find(|m| m.id == id).map(|m| m.title.clone())
                }),
            })
            .collect();
        rows.sort_by_key(|r| r.pick_number);
        Ok(rows)
    }

    async fn count_open_turns(&self, _league_id: i64) -> Result<u64, DraftError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.picks.iter().filter(|p| p.movie_id.is_none()).count() as u64)
    }

    async fn set_league_status(
        &self,
        _league_id: i64,
        status: LeagueStatus,
    ) -> Result<(), DraftError> {
        self.inner.lock().unwrap().league.status = status;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub user_id: i64,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub league_id: i64,
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentNotification>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn notify(
        &self,
        user_id: i64,
        kind: &str,
        title: &str,
        body: &str,
        league_id: i64,
    ) -> Result<(), DraftError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DraftError::Storage("notification sink down".to_string()));
        }
        self.sent.lock().unwrap().push(SentNotification {
            user_id,
            kind: kind.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            league_id,
        });
        Ok(())
    }
}
