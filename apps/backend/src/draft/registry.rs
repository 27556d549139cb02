//! Process-wide league-to-room map.
//!
//! Owned by `AppState` and passed into the connection-accepting layer; not a
//! global. The entry API makes concurrent first-connects converge on one
//! room per league, and retiring rooms remove themselves before stopping.

use std::sync::Arc;

use actix::{Actor, Addr};
use dashmap::DashMap;
use tracing::info;

use crate::config::draft::DraftConfig;
use crate::draft::room::DraftRoom;
use crate::store::{DraftStore, NotificationSink};

pub struct RoomRegistry {
    rooms: DashMap<i64, Addr<DraftRoom>>,
    store: Arc<dyn DraftStore>,
    notifier: Arc<dyn NotificationSink>,
    config: DraftConfig,
}

impl RoomRegistry {
    pub fn new(
        store: Arc<dyn DraftStore>,
        notifier: Arc<dyn NotificationSink>,
        config: DraftConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            rooms: DashMap::new(),
            store,
            notifier,
            config,
        })
    }

    /// Idempotent under concurrent first access: exactly one room per league
    /// while that room is alive.
    pub fn get_or_create(self: &Arc<Self>, league_id: i64) -> Addr<DraftRoom> {
        self.rooms
            .entry(league_id)
            .or_insert_with(|| {
                info!(league_id, "creating draft room");
                DraftRoom::new(
                    league_id,
                    self.store.clone(),
                    self.notifier.clone(),
                    self.config,
                    Arc::clone(self),
                )
                .start()
            })
            .clone()
    }

    /// Called by a retiring room just before it stops.
    pub fn remove(&self, league_id: i64) {
        self.rooms.remove(&league_id);
    }

    pub fn contains(&self, league_id: i64) -> bool {
        self.rooms.contains_key(&league_id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
