use std::sync::Arc;

use chrono::Utc;
use futures_util::future::join_all;
use rail_core::repository::{NotificationRepository, RepoError};
use rail_shared::{BookingEvent, Notification, NotificationDraft, NotificationType};
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("{message}")]
    Store {
        message: &'static str,
        #[source]
        source: RepoError,
    },
}

fn store_error(message: &'static str, context: &str, source: RepoError) -> NotificationError {
    error!("{}: {}", context, source);
    NotificationError::Store { message, source }
}

/// Per-user notification feed and unread badge.
#[derive(Clone)]
pub struct NotificationCenter {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationCenter {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, draft: NotificationDraft) -> Result<Notification, NotificationError> {
        let mut notification = draft.into_notification(Utc::now());
        let key = self
            .repo
            .insert_notification(&notification)
            .await
            .map_err(|e| store_error("Failed to create notification.", "Error creating notification", e))?;
        notification.id = Some(key);
        Ok(notification)
    }

    /// Newest first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Notification>, NotificationError> {
        self.repo
            .list_notifications(user_id)
            .await
            .map_err(|e| store_error("Failed to load notifications.", "Error getting notifications", e))
    }

    pub async fn unread_count(&self, user_id: &str) -> Result<usize, NotificationError> {
        Ok(self.list(user_id).await?.iter().filter(|n| !n.is_read).count())
    }

    pub async fn mark_read(&self, notification_id: &str) -> Result<(), NotificationError> {
        self.repo.mark_read(notification_id).await.map_err(|e| {
            store_error(
                "Failed to mark notification as read.",
                "Error marking notification as read",
                e,
            )
        })
    }

    /// One read-flag update per unread notification, issued together. Updates that
    /// succeeded stay committed when another fails; the first failure is returned.
    pub async fn mark_all_as_read(&self, user_id: &str) -> Result<usize, NotificationError> {
        let notifications = self.list(user_id).await?;
        let unread: Vec<&str> = notifications
            .iter()
            .filter(|n| !n.is_read)
            .filter_map(|n| n.id.as_deref())
            .collect();

        let results = join_all(unread.iter().map(|id| self.repo.mark_read(id))).await;
        let updated = results.len();
        if let Some(e) = results.into_iter().find_map(Result::err) {
            return Err(store_error(
                "Failed to mark notifications as read.",
                "Error marking all notifications as read",
                e,
            ));
        }

        debug!("Marked {} notifications read for {}", updated, user_id);
        Ok(updated)
    }

    /// Record the user-facing notification for a booking event.
    pub async fn notify(&self, event: &BookingEvent) -> Result<Notification, NotificationError> {
        self.create(draft_for(event)).await
    }
}

pub fn draft_for(event: &BookingEvent) -> NotificationDraft {
    let (title, message, kind) = match event {
        BookingEvent::Confirmed(e) => (
            "Booking Confirmed!",
            format!("Your booking {} for {} has been confirmed.", e.booking_id, e.train_name),
            NotificationType::Booking,
        ),
        BookingEvent::Cancelled(e) => (
            "Refund Initiated",
            format!(
                "Booking {} has been cancelled. A refund of ₹{} has been initiated.",
                e.booking_id, e.refund_amount
            ),
            NotificationType::Payment,
        ),
        BookingEvent::Extended(e) => (
            "Journey Extended",
            format!(
                "Booking {} has been extended to {}. Your new booking ID is {}.",
                e.original_booking_id,
                e.journey_date.format("%d %b %Y"),
                e.booking_id
            ),
            NotificationType::Booking,
        ),
    };

    NotificationDraft {
        user_id: event.user_id().to_string(),
        title: title.to_string(),
        message,
        kind,
        related_booking_id: Some(event.booking_id().to_string()),
    }
}
