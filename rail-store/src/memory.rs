use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rail_core::repository::{
    BookingQuery, BookingRepository, NotificationRepository, PatchOutcome, ProfileRepository, RepoResult,
};
use rail_shared::{Booking, BookingPatch, Notification, UserProfile};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local document store backing all three collections.
#[derive(Default)]
pub struct InMemoryStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
    bookings: RwLock<Vec<Booking>>,
    notifications: RwLock<Vec<Notification>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn get_profile(&self, uid: &str) -> RepoResult<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(uid).cloned())
    }

    async fn save_profile(&self, profile: &UserProfile) -> RepoResult<()> {
        let mut profiles = self.profiles.write().await;
        let mut stored = profile.clone();
        if let Some(existing) = profiles.get(&profile.uid) {
            stored.created_at = existing.created_at;
        }
        profiles.insert(stored.uid.clone(), stored);
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn insert_booking(&self, booking: &Booking) -> RepoResult<String> {
        let key = Uuid::new_v4().to_string();
        let mut stored = booking.clone();
        stored.id = Some(key.clone());
        self.bookings.write().await.push(stored);
        Ok(key)
    }

    async fn find_bookings(&self, query: &BookingQuery) -> RepoResult<Vec<Booking>> {
        let mut found: Vec<Booking> = self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| query.matches(b))
            .cloned()
            .collect();
        query.sort(&mut found);
        Ok(found)
    }

    async fn update_booking(&self, booking_id: &str, patch: &BookingPatch) -> RepoResult<PatchOutcome> {
        let mut bookings = self.bookings.write().await;
        let Some(booking) = bookings.iter_mut().find(|b| b.booking_id == booking_id) else {
            return Ok(PatchOutcome::Missing);
        };
        if !patch.permits(booking) {
            return Ok(PatchOutcome::Rejected(booking.clone()));
        }
        patch.apply(booking, Utc::now());
        Ok(PatchOutcome::Applied(booking.clone()))
    }

    async fn delete_booking(&self, booking_id: &str) -> RepoResult<bool> {
        let mut bookings = self.bookings.write().await;
        match bookings.iter().position(|b| b.booking_id == booking_id) {
            Some(index) => {
                bookings.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn insert_notification(&self, notification: &Notification) -> RepoResult<String> {
        let key = Uuid::new_v4().to_string();
        let mut stored = notification.clone();
        stored.id = Some(key.clone());
        self.notifications.write().await.push(stored);
        Ok(key)
    }

    async fn list_notifications(&self, user_id: &str) -> RepoResult<Vec<Notification>> {
        let mut found: Vec<Notification> = self
            .notifications
            .read()
            .await
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn mark_read(&self, notification_id: &str) -> RepoResult<()> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id.as_deref() == Some(notification_id))
            .ok_or_else(|| format!("Notification not found: {}", notification_id))?;
        notification.is_read = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rail_shared::{
        BookingDraft, BookingStatus, FareClass, NotificationDraft, NotificationType, PaymentMethod,
    };

    fn booking(booking_id: &str, user: &str) -> Booking {
        let draft = BookingDraft {
            user_id: user.to_string(),
            train_id: 1,
            train_name: "Rajdhani Express".to_string(),
            train_number: "12301".to_string(),
            from: "Mumbai".to_string(),
            to: "Delhi".to_string(),
            departure: "16:55".to_string(),
            arrival: "08:35".to_string(),
            duration: "15h 40m".to_string(),
            class: FareClass::ThirdAc,
            fare: 2850,
            passengers: vec![],
            selected_seats: vec![],
            total_fare: 2850,
            journey_date: Utc::now() + Duration::days(2),
            payment_method: PaymentMethod::Card,
            extended: false,
            original_booking_id: None,
        };
        Booking::from_draft(draft, booking_id.to_string(), "9876543210".to_string(), Utc::now())
    }

    #[tokio::test]
    async fn test_profile_upsert_keeps_created_at() {
        let store = InMemoryStore::new();
        let first = UserProfile::initial("uid-1", "asha@example.com", "Asha", Utc::now() - Duration::days(3));
        store.save_profile(&first).await.unwrap();

        let mut second = first.clone();
        second.display_name = "Asha R".to_string();
        second.created_at = Utc::now();
        store.save_profile(&second).await.unwrap();

        let read = store.get_profile("uid-1").await.unwrap().unwrap();
        assert_eq!(read.display_name, "Asha R");
        assert_eq!(read.created_at, first.created_at);
    }

    #[tokio::test]
    async fn test_booking_update_and_delete() {
        let store = InMemoryStore::new();
        let key = store.insert_booking(&booking("BKAAAA00001", "u1")).await.unwrap();

        let found = store
            .find_bookings(&BookingQuery::by_booking_id("BKAAAA00001"))
            .await
            .unwrap();
        assert_eq!(found[0].id.as_deref(), Some(key.as_str()));

        let patch = BookingPatch::cancellation(2565, Utc::now());
        let PatchOutcome::Applied(updated) = store.update_booking("BKAAAA00001", &patch).await.unwrap() else {
            panic!("cancellation should apply to a confirmed booking");
        };
        assert_eq!(updated.status, BookingStatus::Cancelled);
        assert!(matches!(
            store.update_booking("BKMISSING00", &patch).await.unwrap(),
            PatchOutcome::Missing
        ));

        assert!(store.delete_booking("BKAAAA00001").await.unwrap());
        assert!(!store.delete_booking("BKAAAA00001").await.unwrap());
    }

    #[tokio::test]
    async fn test_second_cancellation_is_rejected_without_writing() {
        let store = InMemoryStore::new();
        store.insert_booking(&booking("BKAAAA00002", "u1")).await.unwrap();
        let first_at = Utc::now() - Duration::minutes(5);

        let first = store
            .update_booking("BKAAAA00002", &BookingPatch::cancellation(2565, first_at))
            .await
            .unwrap();
        assert!(matches!(first, PatchOutcome::Applied(_)));

        let second = store
            .update_booking("BKAAAA00002", &BookingPatch::cancellation(1000, Utc::now()))
            .await
            .unwrap();
        let PatchOutcome::Rejected(current) = second else {
            panic!("a cancelled booking must not be cancelled again");
        };
        assert_eq!(current.refund_date, Some(first_at));
        assert_eq!(current.refund_amount, Some(2565));
    }

    #[tokio::test]
    async fn test_notifications_newest_first() {
        let store = InMemoryStore::new();
        for (i, title) in ["older", "newer"].iter().enumerate() {
            let mut n = NotificationDraft {
                user_id: "u1".to_string(),
                title: title.to_string(),
                message: String::new(),
                kind: NotificationType::System,
                related_booking_id: None,
            }
            .into_notification(Utc::now());
            n.created_at = Utc::now() + Duration::seconds(i as i64);
            store.insert_notification(&n).await.unwrap();
        }

        let feed = store.list_notifications("u1").await.unwrap();
        assert_eq!(feed[0].title, "newer");

        store.mark_read(feed[0].id.as_deref().unwrap()).await.unwrap();
        assert!(store.mark_read("missing").await.is_err());
        let feed = store.list_notifications("u1").await.unwrap();
        assert!(feed[0].is_read && !feed[1].is_read);
    }
}
