use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::adapters::{SeaDraftStore, SeaNotificationSink};
use crate::config::draft::DraftConfig;
use crate::draft::registry::RoomRegistry;
use crate::store::{DraftStore, NotificationSink};

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Database connection (absent when collaborators are injected directly).
    pub db: Option<DatabaseConnection>,
    pub store: Arc<dyn DraftStore>,
    pub notifier: Arc<dyn NotificationSink>,
    pub rooms: Arc<RoomRegistry>,
    pub draft: DraftConfig,
}

impl AppState {
    /// Production wiring: sea-orm store and notification sink over one
    /// connection pool.
    pub fn new(db: DatabaseConnection, draft: DraftConfig) -> Self {
        let store: Arc<dyn DraftStore> = Arc::new(SeaDraftStore::new(db.clone()));
        let notifier: Arc<dyn NotificationSink> = Arc::new(SeaNotificationSink::new(db.clone()));
        let rooms = RoomRegistry::new(store.clone(), notifier.clone(), draft);
        Self {
            db: Some(db),
            store,
            notifier,
            rooms,
            draft,
        }
    }

    /// Build state from explicit collaborators; used by tests to substitute
    /// in-memory doubles.
    pub fn with_collaborators(
        store: Arc<dyn DraftStore>,
        notifier: Arc<dyn NotificationSink>,
        draft: DraftConfig,
    ) -> Self {
        let rooms = RoomRegistry::new(store.clone(), notifier.clone(), draft);
        Self {
            db: None,
            store,
            notifier,
            rooms,
            draft,
        }
    }
}
