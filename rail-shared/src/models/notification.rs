use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Booking,
    Payment,
    System,
    Alert,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub related_booking_id: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// A notification before the store assigns it a key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub related_booking_id: Option<String>,
}

impl NotificationDraft {
    pub fn into_notification(self, now: DateTime<Utc>) -> Notification {
        Notification {
            id: None,
            user_id: self.user_id,
            title: self.title,
            message: self.message,
            kind: self.kind,
            related_booking_id: self.related_booking_id,
            is_read: false,
            created_at: now,
        }
    }
}
