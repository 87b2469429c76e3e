use async_trait::async_trait;
use rail_core::repository::{NotificationRepository, RepoResult};
use rail_shared::Notification;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn insert_notification(&self, notification: &Notification) -> RepoResult<String> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO notifications (id, user_id, is_read, created_at, data) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(&notification.user_id)
        .bind(notification.is_read)
        .bind(notification.created_at)
        .bind(Json(notification))
        .execute(&self.pool)
        .await?;
        Ok(id.to_string())
    }

    async fn list_notifications(&self, user_id: &str) -> RepoResult<Vec<Notification>> {
        let rows: Vec<(Uuid, bool, Json<Notification>)> = sqlx::query_as(
            "SELECT id, is_read, data FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, is_read, Json(mut notification))| {
                notification.id = Some(id.to_string());
                notification.is_read = is_read;
                notification
            })
            .collect())
    }

    async fn mark_read(&self, notification_id: &str) -> RepoResult<()> {
        let id = Uuid::parse_str(notification_id)?;
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, data = jsonb_set(data, '{isRead}', 'true') WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(format!("Notification not found: {}", notification_id).into());
        }
        Ok(())
    }
}
