//! SeaORM implementation of the durable draft store.
//!
//! Multi-statement operations (`commit_pick`, `install_draft_board`) run
//! inside one `DatabaseTransaction`; either every write lands or none does.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use time::OffsetDateTime;

use crate::entities::leagues::LeagueStatus;
use crate::entities::{draft_picks, leagues, movies, rosters, teams, transactions};
use crate::errors::DraftError;
use crate::store::{
    BoardRow, CatalogMovie, CommitOutcome, DraftStore, LeagueRow, OpenTurn, PickCommit, PickSlot,
};

#[derive(Clone)]
pub struct SeaDraftStore {
    db: DatabaseConnection,
}

impl SeaDraftStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DraftStore for SeaDraftStore {
    async fn league(&self, league_id: i64) -> Result<LeagueRow, DraftError> {
        let league = leagues::Entity::find_by_id(league_id)
            .one(&self.db)
            .await?
            .ok_or(DraftError::RoomNotFound)?;
        Ok(LeagueRow {
            id: league.id,
            owner_id: league.owner_id,
            status: league.status,
        })
    }

    async fn team_ids(&self, league_id: i64) -> Result<Vec<i64>, DraftError> {
        let teams = teams::Entity::find()
            .filter(teams::Column::LeagueId.eq(league_id))
            .order_by_asc(teams::Column::Id)
            .all(&self.db)
            .await?;
        Ok(teams.into_iter().map(|t| t.id).collect())
    }

    async fn team_owner(&self, team_id: i64) -> Result<i64, DraftError> {
        let team = teams::Entity::find_by_id(team_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DraftError::Storage(format!("team {team_id} not found")))?;
        Ok(team.user_id)
    }

    async fn next_open_turn(&self, league_id: i64) -> Result<Option<OpenTurn>, DraftError> {
        let pick = draft_picks::Entity::find()
            .filter(draft_picks::Column::LeagueId.eq(league_id))
            .filter(draft_picks::Column::MovieId.is_null())
            .order_by_asc(draft_picks::Column::PickNumber)
            .one(&self.db)
            .await?;
        Ok(pick.map(|p| OpenTurn {
            pick_id: p.id,
            team_id: p.team_id,
            pick_number: p.pick_number,
            round: p.round,
        }))
    }

    async fn is_movie_taken(&self, league_id: i64, movie_id: i64) -> Result<bool, DraftError> {
        let taken = draft_picks::Entity::find()
            .filter(draft_picks::Column::LeagueId.eq(league_id))
            .filter(draft_picks::Column::MovieId.eq(movie_id))
            .count(&self.db)
            .await?;
        Ok(taken > 0)
    }

    async fn rankable_catalog(&self, league_id: i64) -> Result<Vec<CatalogMovie>, DraftError> {
        let drafted = Query::select()
            .column(draft_picks::Column::MovieId)
            .from(draft_picks::Entity)
            .and_where(Expr::col(draft_picks::Column::LeagueId).eq(league_id))
            .and_where(Expr::col(draft_picks::Column::MovieId).is_not_null())
            .to_owned();

        let available = movies::Entity::find()
            .filter(movies::Column::Id.not_in_subquery(drafted))
            .order_by_desc(movies::Column::Budget)
            .order_by_asc(movies::Column::Id)
            .all(&self.db)
            .await?;

        Ok(available
            .into_iter()
            .map(|m| CatalogMovie {
                id: m.id,
                title: m.title,
                budget: m.budget,
            })
            .collect())
    }

    async fn commit_pick(&self, commit: PickCommit) -> Result<CommitOutcome, DraftError> {
        let txn = self.db.begin().await?;

        // Guard on the slot still being empty; a lost race leaves zero rows
        // affected and nothing else is written.
        let assigned = draft_picks::Entity::update_many()
            .col_expr(draft_picks::Column::MovieId, Expr::value(commit.movie_id))
            .filter(draft_picks::Column::Id.eq(commit.pick_id))
            .filter(draft_picks::Column::MovieId.is_null())
            .exec(&txn)
            .await?;
        if assigned.rows_affected == 0 {
            txn.rollback().await.ok();
            return Err(DraftError::MovieAlreadyDrafted);
        }

        let roster = rosters::ActiveModel {
            id: NotSet,
            team_id: Set(commit.team_id),
            movie_id: Set(commit.movie_id),
            acquisition_type: Set("draft".to_string()),
        };
        rosters::Entity::insert(roster)
            .on_conflict(
                OnConflict::columns([rosters::Column::TeamId, rosters::Column::MovieId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        let record = transactions::ActiveModel {
            id: NotSet,
            league_id: Set(commit.league_id),
            team_id: Set(commit.team_id),
            movie_id: Set(commit.movie_id),
            kind: Set("draft".to_string()),
            created_at: Set(OffsetDateTime::now_utc()),
        };
        record.insert(&txn).await?;

        let remaining = draft_picks::Entity::find()
            .filter(draft_picks::Column::LeagueId.eq(commit.league_id))
            .filter(draft_picks::Column::MovieId.is_null())
            .count(&txn)
            .await?;
        if remaining == 0 {
            leagues::Entity::update_many()
                .col_expr(leagues::Column::Status, Expr::value(LeagueStatus::Active))
                .filter(leagues::Column::Id.eq(commit.league_id))
                .exec(&txn)
                .await?;
        }

        let movie_title = movies::Entity::find_by_id(commit.movie_id)
            .one(&txn)
            .await?
            .map(|m| m.title)
            .unwrap_or_default();

        txn.commit().await?;

        Ok(CommitOutcome {
            movie_title,
            remaining,
        })
    }

    async fn install_draft_board(
        &self,
        league_id: i64,
        slots: &[PickSlot],
    ) -> Result<(), DraftError> {
        let txn = self.db.begin().await?;

        let models = slots.iter().map(|slot| draft_picks::ActiveModel {
            id: NotSet,
            league_id: Set(league_id),
            round: Set(slot.round),
            pick_number: Set(slot.pick_number),
            team_id: Set(slot.team_id),
            movie_id: Set(None),
        });
        draft_picks::Entity::insert_many(models).exec(&txn).await?;

        leagues::Entity::update_many()
            .col_expr(leagues::Column::Status, Expr::value(LeagueStatus::Drafting))
            .filter(leagues::Column::Id.eq(league_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    async fn draft_board(&self, league_id: i64) -> Result<Vec<BoardRow>, DraftError> {
        let picks = draft_picks::Entity::find()
            .filter(draft_picks::Column::LeagueId.eq(league_id))
            .order_by_asc(draft_picks::Column::PickNumber)
            .all(&self.db)
            .await?;

        let team_names: HashMap<i64, String> = teams::Entity::find()
            .filter(teams::Column::LeagueId.eq(league_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();

        let drafted_ids: Vec<i64> = picks.iter().filter_map(|p| p.movie_id).collect();
        let movie_titles: HashMap<i64, String> = if drafted_ids.is_empty() {
            HashMap::new()
        } else {
            movies::Entity::find()
                .filter(movies::Column::Id.is_in(drafted_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|m| (m.id, m.title))
                .collect()
        };

        Ok(picks
            .into_iter()
            .map(|p| BoardRow {
                pick_id: p.id,
                round: p.round,
                pick_number: p.pick_number,
                team_id: p.team_id,
                team_name: team_names.get(&p.team_id).cloned().unwrap_or_default(),
                movie_id: p.movie_id,
                movie_title: p.movie_id.and_then(|id| movie_titles.get(&id).cloned()),
            })
            .collect())
    }

    async fn count_open_turns(&self, league_id: i64) -> Result<u64, DraftError> {
        let remaining = draft_picks::Entity::find()
            .filter(draft_picks::Column::LeagueId.eq(league_id))
            .filter(draft_picks::Column::MovieId.is_null())
            .count(&self.db)
            .await?;
        Ok(remaining)
    }

    async fn set_league_status(
        &self,
        league_id: i64,
        status: LeagueStatus,
    ) -> Result<(), DraftError> {
        leagues::Entity::update_many()
            .col_expr(leagues::Column::Status, Expr::value(status))
            .filter(leagues::Column::Id.eq(league_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
