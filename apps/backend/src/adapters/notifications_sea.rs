//! SeaORM implementation of the notification sink.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, NotSet, Set};
use time::OffsetDateTime;

use crate::entities::notifications;
use crate::errors::DraftError;
use crate::store::NotificationSink;

#[derive(Clone)]
pub struct SeaNotificationSink {
    db: DatabaseConnection,
}

impl SeaNotificationSink {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationSink for SeaNotificationSink {
    async fn notify(
        &self,
        user_id: i64,
        kind: &str,
        title: &str,
        body: &str,
        league_id: i64,
    ) -> Result<(), DraftError> {
        let row = notifications::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            kind: Set(kind.to_string()),
            title: Set(title.to_string()),
            body: Set(body.to_string()),
            league_id: Set(league_id),
            read: Set(false),
            created_at: Set(OffsetDateTime::now_utc()),
        };
        row.insert(&self.db).await?;
        Ok(())
    }
}
