use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rail_core::repository::{BookingQuery, BookingRepository, NotificationRepository, PatchOutcome, RepoResult};
use rail_shared::{
    BerthType, Booking, BookingDraft, BookingPatch, FareClass, Notification, Passenger, PaymentMethod,
};
use tokio::sync::Mutex;
use uuid::Uuid;

pub(crate) fn draft(user_id: &str, journey_date: DateTime<Utc>, total_fare: i32) -> BookingDraft {
    BookingDraft {
        user_id: user_id.to_string(),
        train_id: 2,
        train_name: "Shatabdi Express".to_string(),
        train_number: "12002".to_string(),
        from: "Mumbai".to_string(),
        to: "Delhi".to_string(),
        departure: "06:25".to_string(),
        arrival: "14:30".to_string(),
        duration: "8h 5m".to_string(),
        class: FareClass::ChairCar,
        fare: total_fare / 2,
        passengers: vec![
            Passenger::for_seat(1, BerthType::Seat, "C1", "1A"),
            Passenger::for_seat(2, BerthType::Seat, "C1", "1B"),
        ],
        selected_seats: vec![1, 2],
        total_fare,
        journey_date,
        payment_method: PaymentMethod::Upi,
        extended: false,
        original_booking_id: None,
    }
}

pub(crate) fn booking_at(journey_date: DateTime<Utc>, total_fare: i32) -> Booking {
    Booking::from_draft(
        draft("user-1", journey_date, total_fare),
        "BKTEST00001".to_string(),
        "1234567890".to_string(),
        Utc::now(),
    )
}

#[derive(Default)]
pub(crate) struct MemoryBookings {
    pub(crate) docs: Mutex<Vec<Booking>>,
    pub(crate) fail: bool,
}

impl MemoryBookings {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl BookingRepository for MemoryBookings {
    async fn insert_booking(&self, booking: &Booking) -> RepoResult<String> {
        if self.fail {
            return Err("store unavailable".into());
        }
        let key = Uuid::new_v4().to_string();
        let mut stored = booking.clone();
        stored.id = Some(key.clone());
        self.docs.lock().await.push(stored);
        Ok(key)
    }

    async fn find_bookings(&self, query: &BookingQuery) -> RepoResult<Vec<Booking>> {
        if self.fail {
            return Err("store unavailable".into());
        }
        let mut found: Vec<Booking> = self
            .docs
            .lock()
            .await
            .iter()
            .filter(|b| query.matches(b))
            .cloned()
            .collect();
        query.sort(&mut found);
        Ok(found)
    }

    async fn update_booking(&self, booking_id: &str, patch: &BookingPatch) -> RepoResult<PatchOutcome> {
        if self.fail {
            return Err("store unavailable".into());
        }
        let mut docs = self.docs.lock().await;
        let Some(booking) = docs.iter_mut().find(|b| b.booking_id == booking_id) else {
            return Ok(PatchOutcome::Missing);
        };
        if !patch.permits(booking) {
            return Ok(PatchOutcome::Rejected(booking.clone()));
        }
        patch.apply(booking, Utc::now());
        Ok(PatchOutcome::Applied(booking.clone()))
    }

    async fn delete_booking(&self, booking_id: &str) -> RepoResult<bool> {
        let mut docs = self.docs.lock().await;
        let before = docs.len();
        docs.retain(|b| b.booking_id != booking_id);
        Ok(docs.len() != before)
    }
}

#[derive(Default)]
pub(crate) struct MemoryNotifications {
    pub(crate) docs: Mutex<HashMap<String, Notification>>,
    pub(crate) mark_read_calls: AtomicUsize,
    pub(crate) unwritable: Mutex<Option<String>>,
}

impl MemoryNotifications {
    pub(crate) fn mark_read_calls(&self) -> usize {
        self.mark_read_calls.load(Ordering::SeqCst)
    }

    /// Every later `mark_read` on `notification_id` fails.
    pub(crate) async fn reject_mark_read(&self, notification_id: &str) {
        *self.unwritable.lock().await = Some(notification_id.to_string());
    }
}

#[async_trait]
impl NotificationRepository for MemoryNotifications {
    async fn insert_notification(&self, notification: &Notification) -> RepoResult<String> {
        let key = Uuid::new_v4().to_string();
        let mut stored = notification.clone();
        stored.id = Some(key.clone());
        self.docs.lock().await.insert(key.clone(), stored);
        Ok(key)
    }

    async fn list_notifications(&self, user_id: &str) -> RepoResult<Vec<Notification>> {
        let mut found: Vec<Notification> = self
            .docs
            .lock()
            .await
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn mark_read(&self, notification_id: &str) -> RepoResult<()> {
        self.mark_read_calls.fetch_add(1, Ordering::SeqCst);
        if self.unwritable.lock().await.as_deref() == Some(notification_id) {
            return Err(format!("write rejected for {}", notification_id).into());
        }
        match self.docs.lock().await.get_mut(notification_id) {
            Some(n) => {
                n.is_read = true;
                Ok(())
            }
            None => Err(format!("no notification {}", notification_id).into()),
        }
    }
}
